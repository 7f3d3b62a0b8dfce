//! # Network Model
//!
//! Stations, segments, segment chains and lines, plus the validators that
//! guard every line mutation. Entities refer to each other by id only:
//! a segment names its line and its two stations, it does not hold them.
//!
//! This module is pure data and topology. No I/O, no locking.

pub mod station;
pub mod segment;
pub mod chain;
pub mod line;
pub mod validate;

pub use station::{Station, StationId};
pub use segment::{Distance, Segment};
pub use chain::SegmentChain;
pub use line::{Line, LineId};
pub use validate::{
    MAXIMUM_DISTANCE, validate_distance, validate_exactly_one_endpoint_exists, validate_not_last_segment,
    validate_not_same_station, validate_path_found, validate_station_on_line,
};
