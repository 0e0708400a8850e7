//! The unlabeled (source, target) relation backing all intermediate and
//! final query results.
//!
//! A relation lives in CSR form: an offsets array of `vertex_count + 1`
//! entries and a flat target array. Construction goes through
//! [`RelationBuilder`] so the mutation window is confined to a single
//! call site; the sealed [`Relation`] only exposes pure operations that
//! return fresh relations.
//!
//! Duplicate handling is part of each operation's contract and is pinned
//! by the test suite: [`Relation::join`] never deduplicates,
//! [`Relation::union`] keeps the left operand's internal duplicates while
//! [`Relation::distinct_union`] collapses everything, and
//! [`Relation::transitive_closure`] rejoins the full closure against the
//! base relation every round.

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::types::{CardStat, SourceTargetPair, VertexId};

/// Append-once builder for a [`Relation`].
///
/// Every source in `0..vertex_count` must be activated exactly once, in
/// strictly increasing order, empty sources included; targets append to
/// the most recently activated source. `seal` freezes the buffers. The
/// buffers grow by plain `Vec` push; the frozen content reflects the
/// append sequence exactly.
#[derive(Debug)]
pub struct RelationBuilder {
    vertex_count: u32,
    offsets: Vec<u32>,
    targets: Vec<u32>,
}

impl RelationBuilder {
    /// Builder for a relation over `vertex_count` vertices.
    pub fn new(vertex_count: u32) -> Self {
        Self {
            vertex_count,
            offsets: Vec::with_capacity(vertex_count as usize + 1),
            targets: Vec::new(),
        }
    }

    /// Starts the target run for `source`.
    pub fn activate(&mut self, source: VertexId) {
        debug_assert_eq!(
            source.0 as usize,
            self.offsets.len(),
            "sources must be activated in strictly increasing order from 0"
        );
        self.offsets.push(self.targets.len() as u32);
    }

    /// Appends `target` under the currently active source.
    pub fn append(&mut self, target: VertexId) {
        debug_assert!(!self.offsets.is_empty(), "append before first activate");
        self.targets.push(target.0);
    }

    /// Freezes the buffers into an immutable relation.
    pub fn seal(mut self) -> Relation {
        debug_assert_eq!(
            self.offsets.len(),
            self.vertex_count as usize,
            "every source must be activated before sealing"
        );
        self.offsets.push(self.targets.len() as u32);
        Relation {
            vertex_count: self.vertex_count,
            offsets: self.offsets,
            targets: self.targets,
        }
    }
}

/// Sealed set of (source, target) pairs.
///
/// No global dedup guarantee is carried; each producing operation states
/// its own contract.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Relation {
    vertex_count: u32,
    offsets: Vec<u32>,
    targets: Vec<u32>,
}

impl Relation {
    /// Relation over `vertex_count` vertices with no pairs.
    pub fn empty(vertex_count: u32) -> Self {
        let mut builder = RelationBuilder::new(vertex_count);
        for v in 0..vertex_count {
            builder.activate(VertexId(v));
        }
        builder.seal()
    }

    /// Number of vertices the relation's id space covers.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of stored pairs, duplicates included.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when no pairs are stored.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Targets stored under `source`, in append order.
    pub fn targets_of(&self, source: VertexId) -> &[u32] {
        self.run(source.0)
    }

    fn run(&self, source: u32) -> &[u32] {
        let v = source as usize;
        if v >= self.vertex_count as usize {
            return &[];
        }
        &self.targets[self.offsets[v] as usize..self.offsets[v + 1] as usize]
    }

    /// Set union.
    ///
    /// All of `self`'s targets are copied first (internal duplicates
    /// preserved) while a per-source membership set records them; only
    /// `other`'s targets not already recorded for that source are then
    /// appended. Pre-existing duplicates inside either operand are not
    /// retroactively removed.
    pub fn union(&self, other: &Relation) -> Relation {
        let vertex_count = self.vertex_count.max(other.vertex_count);
        let mut builder = RelationBuilder::new(vertex_count);
        let mut seen = FxHashSet::default();
        for v in 0..vertex_count {
            builder.activate(VertexId(v));
            seen.clear();
            for &target in self.run(v) {
                builder.append(VertexId(target));
                seen.insert(target);
            }
            for &target in other.run(v) {
                if seen.insert(target) {
                    builder.append(VertexId(target));
                }
            }
        }
        builder.seal()
    }

    /// Deduplicating union used by the closure fixpoint.
    ///
    /// Unlike [`Relation::union`] this collapses duplicates from both
    /// operands, and it reports how many pairs `other` contributed that
    /// `self` did not already hold.
    pub fn distinct_union(&self, other: &Relation) -> (Relation, u64) {
        let vertex_count = self.vertex_count.max(other.vertex_count);
        let mut builder = RelationBuilder::new(vertex_count);
        let mut seen = FxHashSet::default();
        let mut added = 0u64;
        for v in 0..vertex_count {
            builder.activate(VertexId(v));
            seen.clear();
            for &target in self.run(v) {
                if seen.insert(target) {
                    builder.append(VertexId(target));
                }
            }
            for &target in other.run(v) {
                if seen.insert(target) {
                    builder.append(VertexId(target));
                    added += 1;
                }
            }
        }
        (builder.seal(), added)
    }

    /// Set intersection; emits each common target once per source.
    pub fn intersection(&self, other: &Relation) -> Relation {
        let vertex_count = self.vertex_count.max(other.vertex_count);
        let mut builder = RelationBuilder::new(vertex_count);
        let mut left = Vec::new();
        let mut right = Vec::new();
        for v in 0..vertex_count {
            builder.activate(VertexId(v));
            left.clear();
            left.extend_from_slice(self.run(v));
            left.sort_unstable();
            right.clear();
            right.extend_from_slice(other.run(v));
            right.sort_unstable();
            let (mut i, mut j) = (0usize, 0usize);
            while i < left.len() && j < right.len() {
                match left[i].cmp(&right[j]) {
                    std::cmp::Ordering::Less => i += 1,
                    std::cmp::Ordering::Greater => j += 1,
                    std::cmp::Ordering::Equal => {
                        let target = left[i];
                        builder.append(VertexId(target));
                        while i < left.len() && left[i] == target {
                            i += 1;
                        }
                        while j < right.len() && right[j] == target {
                            j += 1;
                        }
                    }
                }
            }
        }
        builder.seal()
    }

    /// Relational join (path concatenation): for every (s, m) here and
    /// every (m, t) in `other`, emits (s, t).
    ///
    /// Deliberately performs no deduplication; chained joins can grow
    /// combinatorially. The disjunction and closure operations carry the
    /// dedup contracts instead.
    pub fn join(&self, other: &Relation) -> Relation {
        let vertex_count = self.vertex_count.max(other.vertex_count);
        let mut builder = RelationBuilder::new(vertex_count);
        for s in 0..vertex_count {
            builder.activate(VertexId(s));
            for &mid in self.run(s) {
                for &target in other.run(mid) {
                    builder.append(VertexId(target));
                }
            }
        }
        builder.seal()
    }

    /// Transitive closure of one or more steps, by fixpoint iteration.
    ///
    /// Starts from a duplicate-free copy of `self`, then repeats
    /// `tc = tc ∪ tc ⋈ self` (distinct union) until a round contributes
    /// nothing. Each round rejoins the full closure against the base
    /// relation rather than only the previous round's delta; the pair set
    /// is bounded by V² so the loop terminates.
    pub fn transitive_closure(&self) -> Relation {
        let (mut tc, _) = Relation::empty(self.vertex_count).distinct_union(self);
        let mut round = 0u32;
        loop {
            round += 1;
            let (next, added) = tc.distinct_union(&tc.join(self));
            trace!(round, added, pairs = next.len(), "closure round");
            if added == 0 {
                return next;
            }
            tc = next;
        }
    }

    /// Pairs whose source is `source`.
    pub fn select_source(&self, source: VertexId) -> Relation {
        let mut builder = RelationBuilder::new(self.vertex_count);
        for v in 0..self.vertex_count {
            builder.activate(VertexId(v));
            if v == source.0 {
                for &target in self.run(v) {
                    builder.append(VertexId(target));
                }
            }
        }
        builder.seal()
    }

    /// Pairs whose target is `target`; scans every source.
    pub fn select_target(&self, target: VertexId) -> Relation {
        let mut builder = RelationBuilder::new(self.vertex_count);
        for v in 0..self.vertex_count {
            builder.activate(VertexId(v));
            for &candidate in self.run(v) {
                if candidate == target.0 {
                    builder.append(VertexId(candidate));
                }
            }
        }
        builder.seal()
    }

    /// Restartable iterator over the stored pairs, in (source, append)
    /// order. Nothing is cached; calling `pairs` again restarts from the
    /// beginning.
    pub fn pairs(&self) -> Pairs<'_> {
        Pairs {
            relation: self,
            source: 0,
            index: 0,
        }
    }

    /// Cardinality summary: sources with at least one target, stored
    /// pairs, and distinct target values.
    pub fn card_stat(&self) -> CardStat {
        let mut distinct_sources = 0u64;
        for v in 0..self.vertex_count as usize {
            if self.offsets[v] < self.offsets[v + 1] {
                distinct_sources += 1;
            }
        }
        let mut targets = FxHashSet::default();
        targets.extend(self.targets.iter().copied());
        CardStat {
            distinct_sources,
            pairs: self.targets.len() as u64,
            distinct_targets: targets.len() as u64,
        }
    }
}

/// Cursor over a relation's pairs.
pub struct Pairs<'a> {
    relation: &'a Relation,
    source: u32,
    index: usize,
}

impl Iterator for Pairs<'_> {
    type Item = SourceTargetPair;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.relation.targets.len() {
            return None;
        }
        while self.relation.offsets[self.source as usize + 1] as usize <= self.index {
            self.source += 1;
        }
        let pair = SourceTargetPair {
            source: VertexId(self.source),
            target: VertexId(self.relation.targets[self.index]),
        };
        self.index += 1;
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.relation.targets.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Pairs<'_> {}
