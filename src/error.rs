#![allow(missing_docs)]

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, QuiverError>;

/// Errors surfaced by graph construction and query evaluation.
///
/// Validation happens at the boundary of each operation and fails fast;
/// there is no partial state to roll back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuiverError {
    /// A vertex id fell outside the graph's declared range.
    #[error("vertex {vertex} out of bounds (graph has {vertex_count} vertices)")]
    VertexOutOfBounds { vertex: u32, vertex_count: u32 },
    /// A label id fell outside the graph's declared range.
    #[error("label {label} out of bounds (graph has {label_count} labels)")]
    LabelOutOfBounds { label: u32, label_count: u32 },
    /// An operation was invoked outside its legal lifecycle phase.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}
