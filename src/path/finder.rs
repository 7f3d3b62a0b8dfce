//! Shortest-distance exploration across all lines.

use hashbrown::HashMap;
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::debug;

use super::{ExploredResult, GraphBuilder};
use crate::model::{Line, StationId, validate_not_same_station, validate_path_found};
use crate::Result;

/// A snapshot graph of a set of lines.
///
/// Built once from the lines handed in and never refers back to them, so
/// later line mutations do not affect an existing finder.
#[derive(Debug)]
pub struct PathFinder {
    graph: UnGraph<StationId, u64>,
    index: HashMap<StationId, NodeIndex>,
}

impl PathFinder {
    pub fn build<'a>(lines: impl IntoIterator<Item = &'a Line>) -> Self {
        let mut builder = GraphBuilder::new();
        for line in lines {
            line.contribute_to_graph(&mut builder);
        }
        Self::from_builder(builder)
    }

    pub fn from_builder(builder: GraphBuilder) -> Self {
        let (graph, index) = builder.into_parts();
        debug!(stations = graph.node_count(), edges = graph.edge_count(), "exploration graph built");
        Self { graph, index }
    }

    /// Minimum total distance route from `source` to `target`.
    ///
    /// A station that no line touches is treated like one in another
    /// component: `StationsNotConnected`.
    pub fn explore(&self, source: StationId, target: StationId) -> Result<ExploredResult> {
        validate_not_same_station(source, target)?;

        let found = match (self.index.get(&source), self.index.get(&target)) {
            (Some(&from), Some(&to)) => {
                // Zero heuristic: plain Dijkstra that also returns the path.
                astar(&self.graph, from, |n| n == to, |e| *e.weight(), |_| 0)
            }
            _ => None,
        };
        let (distance, nodes) = validate_path_found(found, source, target)?;

        Ok(ExploredResult {
            stations: nodes.into_iter().map(|n| self.graph[n]).collect(),
            distance,
        })
    }

    pub fn contains(&self, station: StationId) -> bool {
        self.index.contains_key(&station)
    }

    pub fn station_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
