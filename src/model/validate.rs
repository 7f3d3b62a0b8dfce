//! Precondition checks for line mutation and exploration.
//!
//! Pure functions with no hidden state. Each mutation entry point calls
//! the ones it needs before touching a chain.

use super::{Distance, Line, StationId};
use crate::{Error, Result};

const MINIMUM_DISTANCE: i64 = 0;
/// Upper bound for any single segment, merged segments included. Keeps
/// path sums far from `u64` overflow and every distance readable as `i64`.
pub const MAXIMUM_DISTANCE: i64 = i32::MAX as i64;
const ONE_SEGMENT: usize = 1;

/// Fails with `InvalidDistance` unless `0 < raw <= MAXIMUM_DISTANCE`.
pub fn validate_distance(raw: i64) -> Result<Distance> {
    if raw <= MINIMUM_DISTANCE || raw > MAXIMUM_DISTANCE {
        return Err(Error::InvalidDistance(raw));
    }
    Ok(Distance::from_positive(raw.unsigned_abs()))
}

/// A new segment must attach to the line through exactly one of its stations.
pub fn validate_exactly_one_endpoint_exists(line: &Line, up: StationId, down: StationId) -> Result<()> {
    match (line.has_station(up), line.has_station(down)) {
        (true, true) => Err(Error::BothStationsAlreadyOnLine { up, down }),
        (false, false) => Err(Error::NeitherStationOnLine { up, down }),
        _ => Ok(()),
    }
}

/// A line may never lose its last segment.
pub fn validate_not_last_segment(line: &Line) -> Result<()> {
    if line.segment_count() == ONE_SEGMENT {
        return Err(Error::LastSegmentRemaining(line.id));
    }
    Ok(())
}

pub fn validate_station_on_line(line: &Line, station: StationId) -> Result<()> {
    if !line.has_station(station) {
        return Err(Error::StationNotOnLine { line: line.id, station });
    }
    Ok(())
}

pub fn validate_not_same_station(source: StationId, target: StationId) -> Result<()> {
    if source == target {
        return Err(Error::SameStation(source));
    }
    Ok(())
}

/// Turns a missing search result into `StationsNotConnected`.
pub fn validate_path_found<T>(found: Option<T>, source: StationId, target: StationId) -> Result<T> {
    found.ok_or(Error::StationsNotConnected { from: source, to: target })
}
