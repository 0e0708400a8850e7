//! Quiver evaluates reachability and path queries (RPQ, CPQ, CQ) against
//! a static in-memory directed edge-labelled graph.
//!
//! The database graph is packed once into a two-level CSR encoding
//! ([`graph::DatabaseGraph`]); queries arrive as a closed AST
//! ([`ast::PathExpr`]) and are evaluated recursively into an unlabeled
//! (source, target) relation ([`relation::Relation`]) by the
//! [`eval::Evaluator`]. Parsing the query languages, generating
//! workloads, and serializing results live outside this crate.
//!
//! ```
//! use std::sync::Arc;
//!
//! use quiver::{Evaluator, GraphBuilder, LabelId, PathExpr, Query, VertexId};
//!
//! let mut builder = GraphBuilder::new(3, 1);
//! builder.add_edge(VertexId(0), VertexId(1), LabelId(0))?;
//! builder.add_edge(VertexId(1), VertexId(2), LabelId(0))?;
//! let graph = Arc::new(builder.build());
//!
//! let mut evaluator = Evaluator::new();
//! evaluator.prepare(graph);
//! let result = evaluator.evaluate(&Query::new(PathExpr::kleene(PathExpr::edge(LabelId(0)))))?;
//! assert_eq!(result.card_stat().pairs, 3);
//! # Ok::<(), quiver::QuiverError>(())
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod eval;
pub mod graph;
pub mod relation;
pub mod types;

pub use ast::{PathExpr, Query};
pub use error::{QuiverError, Result};
pub use eval::Evaluator;
pub use graph::{DatabaseGraph, GraphBuilder};
pub use relation::{Pairs, Relation, RelationBuilder};
pub use types::{CardStat, LabelId, Predicate, SourceTargetPair, VertexId};
