//! Identifier newtypes and the value types crossing the crate boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Vertex identifier in `[0, vertex_count)`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub u32);

/// Edge label identifier in `[0, label_count)`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(pub u32);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for VertexId {
    fn from(value: u32) -> Self {
        VertexId(value)
    }
}

impl From<VertexId> for u32 {
    fn from(value: VertexId) -> Self {
        value.0
    }
}

impl From<u32> for LabelId {
    fn from(value: u32) -> Self {
        LabelId(value)
    }
}

impl From<LabelId> for u32 {
    fn from(value: LabelId) -> Self {
        value.0
    }
}

/// A label paired with a traversal direction.
///
/// Every label carries an implicit inverse direction; the flag selects
/// which encoding the database graph consults and transposes the
/// orientation of the emitted pairs.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Predicate {
    /// Label to select edges by.
    pub label: LabelId,
    /// Follow edges against their direction when set.
    pub inverse: bool,
}

impl Predicate {
    /// Predicate following `label` edges in their stored direction.
    pub fn forward(label: LabelId) -> Self {
        Self {
            label,
            inverse: false,
        }
    }

    /// Predicate following `label` edges against their stored direction.
    pub fn inverse(label: LabelId) -> Self {
        Self {
            label,
            inverse: true,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse {
            write!(f, "{}^-", self.label)
        } else {
            write!(f, "{}", self.label)
        }
    }
}

/// A single (source, target) answer pair.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub struct SourceTargetPair {
    /// Source endpoint of the matched path.
    pub source: VertexId,
    /// Target endpoint of the matched path.
    pub target: VertexId,
}

impl SourceTargetPair {
    /// Pair with source and target swapped.
    pub fn transposed(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }
}

impl fmt::Display for SourceTargetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.source, self.target)
    }
}

/// Cardinality summary of a relation.
///
/// `pairs` counts stored entries and reflects whatever dedup guarantee
/// the producing operations left in place; it is never re-deduplicated
/// here.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct CardStat {
    /// Sources with at least one stored target.
    pub distinct_sources: u64,
    /// Total stored (source, target) entries.
    pub pairs: u64,
    /// Distinct values appearing as a target anywhere.
    pub distinct_targets: u64,
}

impl fmt::Display for CardStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.distinct_sources, self.pairs, self.distinct_targets
        )
    }
}
