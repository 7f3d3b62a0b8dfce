//! # subway-rs — Transit Network Topology and Exploration
//!
//! Lines are chains of directed segments between stations; routes are the
//! minimum-distance paths across the union of every line.
//!
//! ## Design Principles
//!
//! 1. **A line is always one simple path**: every insertion splices, every
//!    removal merges, and the chain never branches, loops or empties
//! 2. **Ids, not references**: segments and lines name stations by
//!    `StationId`, so nothing owns anything it points at
//! 3. **Exploration is a pure function of a snapshot**: `PathFinder` builds
//!    its graph from the lines handed in and never looks back
//! 4. **Trait-first storage**: `NetworkStore` is the only contract with
//!    whatever keeps stations and lines
//!
//! ## Quick Start
//!
//! ```rust
//! use subway_rs::Network;
//!
//! # fn example() -> subway_rs::Result<()> {
//! let network = Network::open_memory();
//!
//! let gangnam = network.create_station("Gangnam")?;
//! let gyodae = network.create_station("Gyodae")?;
//! let seocho = network.create_station("Seocho")?;
//!
//! let line = network.create_line("Line 2", "green", gangnam.id, gyodae.id, 6)?;
//! network.add_segment(line.id, gyodae.id, seocho.id, 4)?;
//!
//! let route = network.explore(gangnam.id, seocho.id)?;
//! assert_eq!(route.distance, 10);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod path;
pub mod storage;
pub mod export;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{
    Station, StationId, Line, LineId, Segment, SegmentChain, Distance,
};
pub use path::{ExploredResult, GraphBuilder, PathFinder, Route};
pub use storage::{NetworkStore, MemoryStore};
pub use export::NetworkSnapshot;

use parking_lot::Mutex;
use tracing::info;

// ============================================================================
// Top-level Network handle
// ============================================================================

/// The primary entry point. A `Network` wraps a store and runs every line
/// mutation as load, mutate, save.
///
/// Mutations hold a network-wide write lock, so each line has a single
/// writer at a time. Reads and explorations take no lock beyond the
/// store's own.
pub struct Network<S: NetworkStore> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: NetworkStore> Network<S> {
    /// Create a Network over the given store.
    pub fn with_store(store: S) -> Self {
        Self { store, write_lock: Mutex::new(()) }
    }

    /// Access the underlying store (for advanced use).
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Stations
    // ========================================================================

    pub fn create_station(&self, name: &str) -> Result<Station> {
        let station = self.store.create_station(name)?;
        info!(station = %station.id, name = %station.name, "station created");
        Ok(station)
    }

    pub fn station(&self, id: StationId) -> Result<Station> {
        self.store.require_station(id)
    }

    /// Fails with `StationInUse` while a line still passes through it.
    pub fn delete_station(&self, id: StationId) -> Result<bool> {
        let _guard = self.write_lock.lock();
        let removed = self.store.delete_station(id)?;
        if removed {
            info!(station = %id, "station deleted");
        }
        Ok(removed)
    }

    // ========================================================================
    // Lines
    // ========================================================================

    pub fn create_line(
        &self,
        name: &str,
        color: &str,
        up: StationId,
        down: StationId,
        distance: i64,
    ) -> Result<Line> {
        let distance = model::validate_distance(distance)?;
        let _guard = self.write_lock.lock();
        let line = self.store.create_line(name, color, up, down, distance)?;
        info!(line = %line.id, name = %line.name, up = %up, down = %down, "line created");
        Ok(line)
    }

    pub fn line(&self, id: LineId) -> Result<Line> {
        self.store.require_line(id)
    }

    pub fn lines(&self) -> Result<Vec<Line>> {
        self.store.all_lines()
    }

    pub fn update_line(&self, id: LineId, name: Option<String>, color: Option<String>) -> Result<Line> {
        self.mutate_line(id, |line| {
            line.update(name, color);
            Ok(())
        })
    }

    pub fn delete_line(&self, id: LineId) -> Result<bool> {
        let _guard = self.write_lock.lock();
        let removed = self.store.delete_line(id)?;
        if removed {
            info!(line = %id, "line deleted");
        }
        Ok(removed)
    }

    /// Attach `up -> down` to a line, splicing it into any segment it overlaps.
    pub fn add_segment(&self, line: LineId, up: StationId, down: StationId, distance: i64) -> Result<Line> {
        self.store.require_station(up)?;
        self.store.require_station(down)?;
        self.mutate_line(line, |l| l.add_segment(up, down, distance))
    }

    /// Take a station off a line, merging its neighbours if it was interior.
    pub fn remove_station(&self, line: LineId, station: StationId) -> Result<Line> {
        self.store.require_station(station)?;
        self.mutate_line(line, |l| l.remove_station(station))
    }

    /// The stations of a line, up end first.
    pub fn line_stations(&self, id: LineId) -> Result<Vec<Station>> {
        let line = self.store.require_line(id)?;
        self.resolve(&line.stations()?)
    }

    fn mutate_line<F>(&self, id: LineId, mutate: F) -> Result<Line>
    where
        F: FnOnce(&mut Line) -> Result<()>,
    {
        let _guard = self.write_lock.lock();
        let mut line = self.store.require_line(id)?;
        mutate(&mut line)?;
        self.store.save_line(line.clone())?;
        Ok(line)
    }

    // ========================================================================
    // Exploration
    // ========================================================================

    /// A path finder over a snapshot of every line in the store.
    pub fn path_finder(&self) -> Result<PathFinder> {
        let lines = self.store.all_lines()?;
        Ok(PathFinder::build(&lines))
    }

    /// Shortest route between two stations across all lines.
    pub fn explore(&self, source: StationId, target: StationId) -> Result<Route> {
        self.store.require_station(source)?;
        self.store.require_station(target)?;
        let explored = self.path_finder()?.explore(source, target)?;
        Ok(Route {
            stations: self.resolve(&explored.stations)?,
            distance: explored.distance,
        })
    }

    fn resolve(&self, ids: &[StationId]) -> Result<Vec<Station>> {
        ids.iter().map(|&id| self.store.require_station(id)).collect()
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    pub fn snapshot(&self) -> Result<NetworkSnapshot> {
        export::export_snapshot(&self.store)
    }
}

/// In-memory network for testing and embedding.
impl Network<MemoryStore> {
    pub fn open_memory() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// Seed an in-memory network from a snapshot, validating every line.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Self> {
        Ok(Self::with_store(MemoryStore::from_snapshot(snapshot)?))
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid distance: {0} (must be between 1 and 2147483647)")]
    InvalidDistance(i64),

    #[error("Stations {up} and {down} are both already on the line")]
    BothStationsAlreadyOnLine { up: StationId, down: StationId },

    #[error("Neither station {up} nor {down} is on the line")]
    NeitherStationOnLine { up: StationId, down: StationId },

    #[error("Line {0} has only one segment left")]
    LastSegmentRemaining(LineId),

    #[error("Station {station} is not on line {line}")]
    StationNotOnLine { line: LineId, station: StationId },

    #[error("No segment matches station {0}")]
    NoMatchingSegment(StationId),

    #[error("Segment {up} -> {down} is not part of the line")]
    SegmentNotFound { up: StationId, down: StationId },

    #[error("Segment cannot start and end at station {0}")]
    DegenerateSegment(StationId),

    #[error("Segment belongs to line {owner}, not line {line}")]
    ForeignSegment { line: LineId, owner: LineId },

    #[error("Source and target are the same station {0}")]
    SameStation(StationId),

    #[error("Stations {from} and {to} are not connected")]
    StationsNotConnected { from: StationId, to: StationId },

    #[error("Station {station} is still used by line {line}")]
    StationInUse { station: StationId, line: LineId },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failed internal lookups that mean a chain is already broken.
    /// These are programming defects, not bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Error::NoMatchingSegment(_) | Error::SegmentNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
