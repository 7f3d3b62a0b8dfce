//! Weighted multigraph assembled from line segments.

use hashbrown::HashMap;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};

use crate::model::StationId;

/// Collects stations and segment edges from any number of lines.
///
/// Vertices are deduplicated by `StationId`. Edges are not: two lines
/// running between the same stations contribute two parallel edges.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: UnGraph<StationId, u64>,
    index: HashMap<StationId, NodeIndex>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent.
    pub fn add_station(&mut self, station: StationId) -> NodeIndex {
        let graph = &mut self.graph;
        *self.index.entry(station).or_insert_with(|| graph.add_node(station))
    }

    /// Undirected edge between `a` and `b`, registering both as vertices.
    pub fn add_edge(&mut self, a: StationId, b: StationId, weight: u64) -> EdgeIndex {
        let a = self.add_station(a);
        let b = self.add_station(b);
        self.graph.add_edge(a, b, weight)
    }

    pub fn station_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub(crate) fn into_parts(self) -> (UnGraph<StationId, u64>, HashMap<StationId, NodeIndex>) {
        (self.graph, self.index)
    }
}
