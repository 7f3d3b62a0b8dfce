//! # Network Store Trait
//!
//! The contract between the topology core and whatever keeps stations and
//! lines around. The core never depends on how a store is implemented; it
//! only needs create/find/list/delete plus `save_line` to write back a
//! mutated line.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryStore` | `memory` | In-memory, for tests and embedding |

pub mod memory;

use crate::model::*;
use crate::{Error, Result};

pub use memory::MemoryStore;

/// CRUD over stations and lines.
///
/// Stores own uniqueness of station and line names and refuse to delete a
/// station that some line still passes through.
pub trait NetworkStore: Send + Sync + 'static {
    // ========================================================================
    // Stations
    // ========================================================================

    /// Create a station. Fails with `ConstraintViolation` on a duplicate name.
    fn create_station(&self, name: &str) -> Result<Station>;

    /// Get a station by ID. Returns None if not found.
    fn get_station(&self, id: StationId) -> Result<Option<Station>>;

    /// All stations, ordered by id.
    fn all_stations(&self) -> Result<Vec<Station>>;

    /// Delete a station. Returns true if it existed.
    /// Fails with `StationInUse` while any line references it.
    fn delete_station(&self, id: StationId) -> Result<bool>;

    // ========================================================================
    // Lines
    // ========================================================================

    /// Create a line with its initial segment. Fails with
    /// `ConstraintViolation` on a duplicate name.
    fn create_line(
        &self,
        name: &str,
        color: &str,
        up: StationId,
        down: StationId,
        distance: Distance,
    ) -> Result<Line>;

    /// Get a line by ID. Returns None if not found.
    fn get_line(&self, id: LineId) -> Result<Option<Line>>;

    /// All lines, ordered by id.
    fn all_lines(&self) -> Result<Vec<Line>>;

    /// Replace a stored line with its mutated copy.
    fn save_line(&self, line: Line) -> Result<()>;

    /// Delete a line and its segments. Returns true if it existed.
    fn delete_line(&self, id: LineId) -> Result<bool>;

    // ========================================================================
    // Provided lookups
    // ========================================================================

    fn require_station(&self, id: StationId) -> Result<Station> {
        self.get_station(id)?
            .ok_or_else(|| Error::NotFound(format!("Station {id}")))
    }

    fn require_line(&self, id: LineId) -> Result<Line> {
        self.get_line(id)?
            .ok_or_else(|| Error::NotFound(format!("Line {id}")))
    }

    /// Lines passing through `station`.
    ///
    /// Default: scans every line.
    fn lines_through(&self, station: StationId) -> Result<Vec<Line>> {
        Ok(self
            .all_lines()?
            .into_iter()
            .filter(|line| line.has_station(station))
            .collect())
    }
}
