//! The immutable database graph and its two-level packed CSR encoding.
//!
//! Mirrored forward and reverse encodings share one layout. `base` holds
//! `vertex_count + 1` positions into a single packed array; a vertex with
//! no edges in that direction has `base[v] == base[v + 1]`, otherwise
//! `base[v]` points at the head of its block. The block starts with a
//! `label_count + 1` entry label directory whose entries are absolute
//! positions in the same array, and label l's sorted, duplicate-free
//! neighbor list occupies `[dir[l], dir[l + 1])`. This gives O(1) lookup
//! of "edges from v with label l" in O(V + E) space.

use smallvec::SmallVec;
use tracing::debug;

use crate::error::{QuiverError, Result};
use crate::relation::{Relation, RelationBuilder};
use crate::types::{LabelId, Predicate, VertexId};

/// Per-vertex (label, neighbor) scratch list collected before packing.
/// Most vertices in the target workloads carry only a handful of edges.
type EdgeList = SmallVec<[(u32, u32); 4]>;

/// Collects labelled edges and packs them into a [`DatabaseGraph`].
#[derive(Debug)]
pub struct GraphBuilder {
    vertex_count: u32,
    label_count: u32,
    outgoing: Vec<EdgeList>,
    incoming: Vec<EdgeList>,
    edges_seen: u64,
}

impl GraphBuilder {
    /// Builder for a graph with fixed vertex and label universes.
    pub fn new(vertex_count: u32, label_count: u32) -> Self {
        Self {
            vertex_count,
            label_count,
            outgoing: vec![EdgeList::new(); vertex_count as usize],
            incoming: vec![EdgeList::new(); vertex_count as usize],
            edges_seen: 0,
        }
    }

    /// Records a directed labelled edge.
    ///
    /// Duplicate edges are tolerated; `build` keeps one copy per
    /// (source, label, target). All three ids are bounds-checked.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId, label: LabelId) -> Result<()> {
        self.check_vertex(source)?;
        self.check_vertex(target)?;
        if label.0 >= self.label_count {
            return Err(QuiverError::LabelOutOfBounds {
                label: label.0,
                label_count: self.label_count,
            });
        }
        self.outgoing[source.0 as usize].push((label.0, target.0));
        self.incoming[target.0 as usize].push((label.0, source.0));
        self.edges_seen += 1;
        Ok(())
    }

    fn check_vertex(&self, vertex: VertexId) -> Result<()> {
        if vertex.0 >= self.vertex_count {
            return Err(QuiverError::VertexOutOfBounds {
                vertex: vertex.0,
                vertex_count: self.vertex_count,
            });
        }
        Ok(())
    }

    /// Packs both encodings and freezes the graph.
    pub fn build(mut self) -> DatabaseGraph {
        let mut label_tallies = vec![0u64; self.label_count as usize];
        let forward = pack(
            &mut self.outgoing,
            self.label_count,
            Some(label_tallies.as_mut_slice()),
        );
        let reverse = pack(&mut self.incoming, self.label_count, None);
        let edge_count = label_tallies.iter().sum();
        debug!(
            vertices = self.vertex_count,
            labels = self.label_count,
            edges = edge_count,
            raw_edges = self.edges_seen,
            "database graph packed"
        );
        DatabaseGraph {
            vertex_count: self.vertex_count,
            label_count: self.label_count,
            forward,
            reverse,
            label_tallies,
            edge_count,
        }
    }
}

/// One direction of the packed CSR encoding.
#[derive(Debug)]
struct Encoding {
    base: Vec<u32>,
    data: Vec<u32>,
}

impl Encoding {
    /// Neighbors of `v` under `label`, sorted ascending and duplicate-free.
    fn neighbors(&self, v: u32, label: u32) -> &[u32] {
        let start = self.base[v as usize] as usize;
        if start == self.base[v as usize + 1] as usize {
            return &[];
        }
        let lo = self.data[start + label as usize] as usize;
        let hi = self.data[start + label as usize + 1] as usize;
        &self.data[lo..hi]
    }
}

/// Sorts each vertex's scratch list by (label, neighbor), then sweeps it
/// once into the packed array, writing directory boundaries and skipping
/// duplicates.
fn pack(
    adjacency: &mut [EdgeList],
    label_count: u32,
    mut tallies: Option<&mut [u64]>,
) -> Encoding {
    let directory_len = label_count as usize + 1;
    let mut base = Vec::with_capacity(adjacency.len() + 1);
    let mut data = Vec::new();
    for list in adjacency.iter_mut() {
        base.push(data.len() as u32);
        if list.is_empty() {
            continue;
        }
        list.sort_unstable();
        list.dedup();
        let dir_start = data.len();
        data.resize(dir_start + directory_len, 0);
        let mut idx = 0usize;
        for label in 0..label_count {
            data[dir_start + label as usize] = data.len() as u32;
            let begin = idx;
            while idx < list.len() && list[idx].0 == label {
                idx += 1;
            }
            for &(_, neighbor) in &list[begin..idx] {
                data.push(neighbor);
            }
            if let Some(tallies) = tallies.as_mut() {
                tallies[label as usize] += (idx - begin) as u64;
            }
        }
        data[dir_start + label_count as usize] = data.len() as u32;
    }
    base.push(data.len() as u32);
    Encoding { base, data }
}

/// Immutable directed edge-labelled graph, the queryable database.
///
/// Never mutated after [`GraphBuilder::build`]; safe to share read-only
/// across threads.
#[derive(Debug)]
pub struct DatabaseGraph {
    vertex_count: u32,
    label_count: u32,
    forward: Encoding,
    reverse: Encoding,
    label_tallies: Vec<u64>,
    edge_count: u64,
}

impl DatabaseGraph {
    /// Number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of labels.
    pub fn label_count(&self) -> u32 {
        self.label_count
    }

    /// Total distinct labelled edges.
    pub fn edge_count(&self) -> u64 {
        self.edge_count
    }

    /// Distinct edges carrying `label`.
    pub fn label_edge_count(&self, label: LabelId) -> Result<u64> {
        self.check_label(label)?;
        Ok(self.label_tallies[label.0 as usize])
    }

    /// Number of distinct `label` edges leaving `vertex`.
    pub fn out_degree(&self, vertex: VertexId, label: LabelId) -> Result<usize> {
        self.check_vertex(vertex)?;
        self.check_label(label)?;
        Ok(self.forward.neighbors(vertex.0, label.0).len())
    }

    /// Number of distinct `label` edges entering `vertex`.
    pub fn in_degree(&self, vertex: VertexId, label: LabelId) -> Result<usize> {
        self.check_vertex(vertex)?;
        self.check_label(label)?;
        Ok(self.reverse.neighbors(vertex.0, label.0).len())
    }

    pub(crate) fn check_vertex(&self, vertex: VertexId) -> Result<()> {
        if vertex.0 >= self.vertex_count {
            return Err(QuiverError::VertexOutOfBounds {
                vertex: vertex.0,
                vertex_count: self.vertex_count,
            });
        }
        Ok(())
    }

    fn check_label(&self, label: LabelId) -> Result<()> {
        if label.0 >= self.label_count {
            return Err(QuiverError::LabelOutOfBounds {
                label: label.0,
                label_count: self.label_count,
            });
        }
        Ok(())
    }

    /// All edges matching `predicate`, as a relation.
    ///
    /// A forward predicate copies every vertex's target range for the
    /// label; an inverse predicate reads the reverse encoding, so the
    /// stored edge sources become relation targets under the current
    /// vertex. Either way the result is deduplicated because the packed
    /// neighbor lists are.
    pub fn select_label(&self, predicate: Predicate) -> Result<Relation> {
        self.check_label(predicate.label)?;
        let encoding = if predicate.inverse {
            &self.reverse
        } else {
            &self.forward
        };
        let mut builder = RelationBuilder::new(self.vertex_count);
        for v in 0..self.vertex_count {
            builder.activate(VertexId(v));
            for &neighbor in encoding.neighbors(v, predicate.label.0) {
                builder.append(VertexId(neighbor));
            }
        }
        Ok(builder.seal())
    }

    /// The identity relation: `(v, v)` for every vertex.
    pub fn select_identity(&self) -> Relation {
        let mut builder = RelationBuilder::new(self.vertex_count);
        for v in 0..self.vertex_count {
            builder.activate(VertexId(v));
            builder.append(VertexId(v));
        }
        builder.seal()
    }
}
