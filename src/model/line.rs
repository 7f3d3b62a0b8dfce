//! Line — a named path of segments with cached endpoint stations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::validate::{
    validate_distance, validate_exactly_one_endpoint_exists, validate_not_last_segment,
    validate_station_on_line,
};
use super::{Distance, Segment, SegmentChain, StationId};
use crate::path::GraphBuilder;
use crate::{Error, Result};

/// Opaque line identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineId(pub u64);

impl std::fmt::Display for LineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A transit line.
///
/// `up_station` and `down_station` are always the two ends of the chain,
/// and the chain is always one simple path between them with at least one
/// segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub color: String,
    up_station: StationId,
    down_station: StationId,
    chain: SegmentChain,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Line {
    /// A new line always starts with exactly one segment.
    pub fn new(
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
        up_station: StationId,
        down_station: StationId,
        distance: Distance,
    ) -> Result<Self> {
        let mut chain = SegmentChain::new();
        chain.add(Segment::new(id, up_station, down_station, distance)?);
        let now = Utc::now();
        Ok(Self {
            id,
            name: name.into(),
            color: color.into(),
            up_station,
            down_station,
            chain,
            created_at: now,
            modified_at: now,
        })
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Validated entry point: attach `up -> down` to this line.
    ///
    /// Exactly one of the two stations must already be on the line.
    pub fn add_segment(&mut self, up: StationId, down: StationId, distance: i64) -> Result<()> {
        let distance = validate_distance(distance)?;
        validate_exactly_one_endpoint_exists(self, up, down)?;
        let segment = Segment::new(self.id, up, down, distance)?;
        self.insert_segment(segment)
    }

    /// Splice `segment` into the chain.
    ///
    /// A segment that ends at the current up station (or starts at the
    /// current down station) extends the line. A segment that shares an end
    /// with an existing, longer segment splits it; the leftover distance
    /// becomes a new segment. All splits are checked before anything is
    /// mutated, so a failure leaves the line as it was.
    pub fn insert_segment(&mut self, segment: Segment) -> Result<()> {
        if segment.line != self.id {
            return Err(Error::ForeignSegment { line: self.id, owner: segment.line });
        }

        let up_split = match self.chain.find_same_up_different_down(&segment) {
            Some(old) => {
                let rest = old.distance.checked_remainder(segment.distance)?;
                Some((old, Segment::new(self.id, segment.down, old.down, rest)?))
            }
            None => None,
        };
        let down_split = match self.chain.find_same_down_different_up(&segment) {
            Some(old) => {
                let rest = old.distance.checked_remainder(segment.distance)?;
                Some((old, Segment::new(self.id, old.up, segment.up, rest)?))
            }
            None => None,
        };

        if self.is_up_station(segment.down) {
            debug!(line = %self.id, from = %self.up_station, to = %segment.up, "up station extended");
            self.up_station = segment.up;
        }
        if self.is_down_station(segment.up) {
            debug!(line = %self.id, from = %self.down_station, to = %segment.down, "down station extended");
            self.down_station = segment.down;
        }

        for (old, remainder) in up_split.into_iter().chain(down_split) {
            debug!(
                line = %self.id,
                old_up = %old.up, old_down = %old.down, old_distance = %old.distance,
                rest_up = %remainder.up, rest_down = %remainder.down, rest_distance = %remainder.distance,
                "segment split"
            );
            self.chain.remove(&old)?;
            self.chain.add(remainder);
        }

        self.chain.add(segment);
        self.touch();
        Ok(())
    }

    /// Take `station` off the line.
    ///
    /// An endpoint drops its one segment and the neighbour becomes the new
    /// endpoint. An interior station's two segments are merged into one
    /// spanning both, with their distances summed.
    pub fn remove_station(&mut self, station: StationId) -> Result<()> {
        validate_not_last_segment(self)?;
        validate_station_on_line(self, station)?;

        if self.is_down_station(station) {
            let target = self.chain.find_segment_by_down_station(station)?;
            self.chain.remove(&target)?;
            debug!(line = %self.id, from = %station, to = %target.up, "down station removed");
            self.down_station = target.up;
        } else if self.is_up_station(station) {
            let target = self.chain.find_segment_by_up_station(station)?;
            self.chain.remove(&target)?;
            debug!(line = %self.id, from = %station, to = %target.down, "up station removed");
            self.up_station = target.down;
        } else {
            self.remove_interior_station(station)?;
        }

        self.touch();
        Ok(())
    }

    /// Both touching segments must run through the station: one ending
    /// there and one starting there. Anything else means the chain is
    /// already broken and is reported as `NoMatchingSegment`.
    fn remove_interior_station(&mut self, station: StationId) -> Result<()> {
        if self.chain.find_segments_touching(station).len() != 2 {
            return Err(Error::NoMatchingSegment(station));
        }
        let incoming = self.chain.find_segment_by_down_station(station)?;
        let outgoing = self.chain.find_segment_by_up_station(station)?;
        let merged = Segment::new(
            self.id,
            incoming.up,
            outgoing.down,
            incoming.distance.checked_add(outgoing.distance)?,
        )?;

        self.chain.remove(&incoming)?;
        self.chain.remove(&outgoing)?;
        debug!(
            line = %self.id,
            station = %station,
            up = %merged.up, down = %merged.down, distance = %merged.distance,
            "segments merged"
        );
        self.chain.add(merged);
        Ok(())
    }

    /// Rename and/or recolor. `None` or an unchanged value leaves the field alone.
    pub fn update(&mut self, name: Option<String>, color: Option<String>) {
        let mut changed = false;
        if let Some(name) = name.filter(|n| *n != self.name) {
            self.name = name;
            changed = true;
        }
        if let Some(color) = color.filter(|c| *c != self.color) {
            self.color = color;
            changed = true;
        }
        if changed {
            self.touch();
        }
    }

    fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn up_station(&self) -> StationId {
        self.up_station
    }

    pub fn down_station(&self) -> StationId {
        self.down_station
    }

    pub fn is_up_station(&self, station: StationId) -> bool {
        self.up_station == station
    }

    pub fn is_down_station(&self, station: StationId) -> bool {
        self.down_station == station
    }

    pub fn has_station(&self, station: StationId) -> bool {
        self.chain.has_station(station)
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.chain.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.chain.iter()
    }

    pub fn find_segment_by_down_station(&self, station: StationId) -> Result<Segment> {
        self.chain.find_segment_by_down_station(station)
    }

    /// Stations from the up end to the down end.
    pub fn stations(&self) -> Result<Vec<StationId>> {
        self.chain.stations_in_path_order(self.up_station)
    }

    /// Full consistency check: the chain walks from `up_station` through
    /// every segment and ends at `down_station`.
    pub fn check_chain(&self) -> Result<()> {
        let stations = self.stations()?;
        match stations.last() {
            Some(&last) if last == self.down_station => Ok(()),
            _ => Err(Error::NoMatchingSegment(self.down_station)),
        }
    }

    pub fn contribute_to_graph(&self, builder: &mut GraphBuilder) {
        self.chain.contribute_to_graph(builder);
    }
}
