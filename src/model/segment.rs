//! Directed, weighted stretch of track between two stations.

use serde::{Deserialize, Serialize};

use super::{LineId, StationId};
use super::validate::validate_distance;
use crate::{Error, Result};

/// Positive track distance between two stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct Distance(u64);

impl Distance {
    /// Validate a raw distance coming from outside the core.
    pub fn new(raw: i64) -> Result<Self> {
        validate_distance(raw)
    }

    pub(crate) fn from_positive(raw: u64) -> Self {
        debug_assert!(raw > 0);
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    fn signed(self) -> i64 {
        i64::try_from(self.0).unwrap_or(i64::MAX)
    }

    /// `self - other`, used when a longer segment is split by a shorter one.
    /// A remainder of zero or less is `InvalidDistance`.
    pub fn checked_remainder(self, other: Distance) -> Result<Distance> {
        match self.0.checked_sub(other.0) {
            Some(rest) if rest > 0 => Ok(Self(rest)),
            _ => Err(Error::InvalidDistance(self.signed().saturating_sub(other.signed()))),
        }
    }

    /// `self + other`, used when two segments are merged. The sum is held to
    /// the same bound as any other distance.
    pub fn checked_add(self, other: Distance) -> Result<Distance> {
        validate_distance(self.signed().saturating_add(other.signed()))
    }
}

impl TryFrom<i64> for Distance {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<Distance> for u64 {
    fn from(d: Distance) -> u64 {
        d.0
    }
}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A segment owned by exactly one line: `up -> down` with a distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub line: LineId,
    pub up: StationId,
    pub down: StationId,
    pub distance: Distance,
}

impl Segment {
    pub fn new(line: LineId, up: StationId, down: StationId, distance: Distance) -> Result<Self> {
        if up == down {
            return Err(Error::DegenerateSegment(up));
        }
        Ok(Self { line, up, down, distance })
    }

    pub fn has_up_station(&self, station: StationId) -> bool {
        self.up == station
    }

    pub fn has_down_station(&self, station: StationId) -> bool {
        self.down == station
    }

    pub fn has_station(&self, station: StationId) -> bool {
        self.has_up_station(station) || self.has_down_station(station)
    }
}
