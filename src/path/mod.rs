//! # Exploration
//!
//! Shortest-path queries over the union of every line's segments.
//! The graph is rebuilt from a snapshot of lines for each `PathFinder`;
//! nothing here holds on to mutable line state.

pub mod graph;
pub mod finder;

use serde::{Deserialize, Serialize};

use crate::model::{Station, StationId};

pub use graph::GraphBuilder;
pub use finder::PathFinder;

/// Outcome of an exploration: stations from source to target inclusive,
/// and the summed distance of the edges between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploredResult {
    pub stations: Vec<StationId>,
    pub distance: u64,
}

impl ExploredResult {
    pub fn source(&self) -> Option<StationId> {
        self.stations.first().copied()
    }

    pub fn target(&self) -> Option<StationId> {
        self.stations.last().copied()
    }

    /// Number of segments travelled.
    pub fn hops(&self) -> usize {
        self.stations.len().saturating_sub(1)
    }
}

/// An explored route with its stations resolved from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub stations: Vec<Station>,
    pub distance: u64,
}

impl Route {
    pub fn station_names(&self) -> Vec<&str> {
        self.stations.iter().map(|s| s.name.as_str()).collect()
    }
}
