//! SegmentChain — the segments of one line.
//!
//! The backing collection is unordered. Path order is rebuilt on demand by
//! walking from the line's up station, which doubles as the check that the
//! chain is still a single simple path.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{Segment, StationId};
use crate::path::GraphBuilder;
use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentChain {
    segments: Vec<Segment>,
}

impl SegmentChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append without any overlap resolution. Splicing lives on `Line`.
    pub fn add(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn remove(&mut self, segment: &Segment) -> Result<()> {
        let pos = self
            .segments
            .iter()
            .position(|s| s == segment)
            .ok_or(Error::SegmentNotFound { up: segment.up, down: segment.down })?;
        self.segments.remove(pos);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn has_station(&self, station: StationId) -> bool {
        self.segments.iter().any(|s| s.has_station(station))
    }

    /// Existing segment leaving the same up station towards a different
    /// down station: the new segment branches off it.
    pub fn find_same_up_different_down(&self, segment: &Segment) -> Option<Segment> {
        self.segments
            .iter()
            .find(|old| old.has_up_station(segment.up) && !old.has_down_station(segment.down))
            .copied()
    }

    pub fn find_same_down_different_up(&self, segment: &Segment) -> Option<Segment> {
        self.segments
            .iter()
            .find(|old| old.has_down_station(segment.down) && !old.has_up_station(segment.up))
            .copied()
    }

    pub fn find_segment_by_up_station(&self, station: StationId) -> Result<Segment> {
        self.segments
            .iter()
            .find(|s| s.has_up_station(station))
            .copied()
            .ok_or(Error::NoMatchingSegment(station))
    }

    pub fn find_segment_by_down_station(&self, station: StationId) -> Result<Segment> {
        self.segments
            .iter()
            .find(|s| s.has_down_station(station))
            .copied()
            .ok_or(Error::NoMatchingSegment(station))
    }

    /// Every segment with `station` at either end. On a valid chain this is
    /// one segment for an endpoint and two for an interior station.
    pub fn find_segments_touching(&self, station: StationId) -> SmallVec<[Segment; 2]> {
        self.segments.iter().filter(|s| s.has_station(station)).copied().collect()
    }

    /// Stations from `start` to the far end, following up -> down links.
    ///
    /// Fails with `NoMatchingSegment` when the walk gets stuck before every
    /// segment is consumed or comes back to a station it already visited,
    /// i.e. the chain is not one simple path starting at `start`.
    pub fn stations_in_path_order(&self, start: StationId) -> Result<Vec<StationId>> {
        let mut remaining = self.segments.clone();
        let mut stations = Vec::with_capacity(remaining.len() + 1);
        let mut visited = HashSet::with_capacity(remaining.len() + 1);
        let mut current = start;

        while !remaining.is_empty() {
            let pos = remaining
                .iter()
                .position(|s| s.has_up_station(current))
                .ok_or(Error::NoMatchingSegment(current))?;
            let segment = remaining.swap_remove(pos);
            visited.insert(segment.up);
            stations.push(segment.up);
            current = segment.down;
            if visited.contains(&current) {
                return Err(Error::NoMatchingSegment(current));
            }
        }

        stations.push(current);
        Ok(stations)
    }

    /// Register both ends of every segment and an undirected edge weighted
    /// by its distance.
    pub fn contribute_to_graph(&self, builder: &mut GraphBuilder) {
        for segment in &self.segments {
            builder.add_edge(segment.up, segment.down, segment.distance.get());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Distance, LineId};
    use pretty_assertions::assert_eq;

    fn seg(up: u64, down: u64, d: i64) -> Segment {
        Segment::new(LineId(1), StationId(up), StationId(down), Distance::new(d).unwrap()).unwrap()
    }

    fn ids(raw: &[u64]) -> Vec<StationId> {
        raw.iter().copied().map(StationId).collect()
    }

    #[test]
    fn test_path_order_from_unordered_segments() {
        let mut chain = SegmentChain::new();
        chain.add(seg(3, 4, 2));
        chain.add(seg(1, 2, 5));
        chain.add(seg(2, 3, 1));

        assert_eq!(chain.stations_in_path_order(StationId(1)).unwrap(), ids(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_path_order_detects_branch() {
        let mut chain = SegmentChain::new();
        chain.add(seg(1, 2, 5));
        chain.add(seg(1, 3, 5));

        let err = chain.stations_in_path_order(StationId(1)).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn test_path_order_detects_cycle() {
        let mut chain = SegmentChain::new();
        chain.add(seg(1, 2, 5));
        chain.add(seg(2, 3, 5));
        chain.add(seg(3, 1, 5));

        assert!(matches!(
            chain.stations_in_path_order(StationId(1)),
            Err(Error::NoMatchingSegment(StationId(1)))
        ));
    }

    #[test]
    fn test_path_order_wrong_start() {
        let mut chain = SegmentChain::new();
        chain.add(seg(1, 2, 5));
        chain.add(seg(2, 3, 5));

        assert!(matches!(
            chain.stations_in_path_order(StationId(2)),
            Err(Error::NoMatchingSegment(StationId(3)))
        ));
    }

    #[test]
    fn test_remove_missing_segment() {
        let mut chain = SegmentChain::new();
        chain.add(seg(1, 2, 5));

        assert!(matches!(chain.remove(&seg(1, 2, 6)), Err(Error::SegmentNotFound { .. })));
        chain.remove(&seg(1, 2, 5)).unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_overlap_lookups() {
        let mut chain = SegmentChain::new();
        chain.add(seg(1, 2, 10));

        assert_eq!(chain.find_same_up_different_down(&seg(1, 3, 4)), Some(seg(1, 2, 10)));
        assert_eq!(chain.find_same_up_different_down(&seg(2, 3, 4)), None);
        assert_eq!(chain.find_same_down_different_up(&seg(3, 2, 4)), Some(seg(1, 2, 10)));
        assert_eq!(chain.find_same_down_different_up(&seg(1, 2, 4)), None);
    }

    #[test]
    fn test_endpoint_lookups() {
        let mut chain = SegmentChain::new();
        chain.add(seg(1, 2, 10));
        chain.add(seg(2, 3, 4));

        assert_eq!(chain.find_segment_by_up_station(StationId(2)).unwrap(), seg(2, 3, 4));
        assert_eq!(chain.find_segment_by_down_station(StationId(2)).unwrap(), seg(1, 2, 10));
        assert!(matches!(
            chain.find_segment_by_up_station(StationId(3)),
            Err(Error::NoMatchingSegment(StationId(3)))
        ));
        assert_eq!(chain.find_segments_touching(StationId(2)).len(), 2);
        assert_eq!(chain.find_segments_touching(StationId(3)).len(), 1);
        assert!(chain.find_segments_touching(StationId(9)).is_empty());
    }
}
