//! In-memory network store.
//!
//! This is the reference implementation of `NetworkStore`.
//! It uses hash maps protected by `RwLock`.
//!
//! ## Limitations
//!
//! - **No transactions**: every call applies immediately.
//! - **Single-writer per line**: `get_line` hands out a copy and
//!   `save_line` overwrites. Two writers mutating the same line
//!   concurrently lose one update; `Network` serializes its mutations to
//!   avoid that.
//!
//! Lock order is always `lines` before `stations`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::warn;

use super::NetworkStore;
use crate::export::NetworkSnapshot;
use crate::model::*;
use crate::{Error, Result};

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory station and line storage.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    stations: RwLock<HashMap<StationId, Station>>,
    lines: RwLock<HashMap<LineId, Line>>,
    next_station_id: AtomicU64,
    next_line_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_contents(HashMap::new(), HashMap::new())
    }

    fn with_contents(stations: HashMap<StationId, Station>, lines: HashMap<LineId, Line>) -> Self {
        let next_station_id = stations.keys().map(|id| id.0).max().unwrap_or(0) + 1;
        let next_line_id = lines.keys().map(|id| id.0).max().unwrap_or(0) + 1;
        Self {
            inner: Arc::new(MemoryInner {
                stations: RwLock::new(stations),
                lines: RwLock::new(lines),
                next_station_id: AtomicU64::new(next_station_id),
                next_line_id: AtomicU64::new(next_line_id),
            }),
        }
    }

    /// Seed a store from a snapshot.
    ///
    /// Every line is re-checked before it is accepted: its segments must
    /// belong to it, name known stations, and walk as one path from its up
    /// station to its down station. Names must be unique.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Self> {
        let mut stations = HashMap::with_capacity(snapshot.stations.len());
        for station in snapshot.stations {
            if stations.values().any(|s: &Station| s.name == station.name) {
                return Err(Error::ConstraintViolation(format!(
                    "Station name '{}' already exists",
                    station.name
                )));
            }
            if stations.insert(station.id, station).is_some() {
                return Err(Error::ConstraintViolation("Duplicate station id in snapshot".into()));
            }
        }

        let mut lines = HashMap::with_capacity(snapshot.lines.len());
        for line in snapshot.lines {
            if let Err(err) = check_snapshot_line(&line, &stations) {
                warn!(line = %line.id, name = %line.name, error = %err, "rejecting snapshot line");
                return Err(err);
            }
            if lines.values().any(|l: &Line| l.name == line.name) {
                return Err(Error::ConstraintViolation(format!(
                    "Line name '{}' already exists",
                    line.name
                )));
            }
            if lines.insert(line.id, line).is_some() {
                return Err(Error::ConstraintViolation("Duplicate line id in snapshot".into()));
            }
        }

        Ok(Self::with_contents(stations, lines))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_snapshot_line(line: &Line, stations: &HashMap<StationId, Station>) -> Result<()> {
    for segment in line.segments() {
        if segment.line != line.id {
            return Err(Error::ForeignSegment { line: line.id, owner: segment.line });
        }
        for station in [segment.up, segment.down] {
            if !stations.contains_key(&station) {
                return Err(Error::NotFound(format!("Station {station}")));
            }
        }
    }
    if line.is_empty() {
        return Err(Error::LastSegmentRemaining(line.id));
    }
    line.check_chain()
}

fn check_stations_exist(stations: &HashMap<StationId, Station>, ids: &[StationId]) -> Result<()> {
    match ids.iter().find(|id| !stations.contains_key(*id)) {
        Some(missing) => Err(Error::NotFound(format!("Station {missing}"))),
        None => Ok(()),
    }
}

fn check_line_name_free(lines: &HashMap<LineId, Line>, name: &str, except: Option<LineId>) -> Result<()> {
    if lines.values().any(|l| l.name == name && Some(l.id) != except) {
        return Err(Error::ConstraintViolation(format!("Line name '{name}' already exists")));
    }
    Ok(())
}

// ============================================================================
// NetworkStore impl
// ============================================================================

impl NetworkStore for MemoryStore {
    fn create_station(&self, name: &str) -> Result<Station> {
        let mut stations = self.inner.stations.write();
        if stations.values().any(|s| s.name == name) {
            return Err(Error::ConstraintViolation(format!("Station name '{name}' already exists")));
        }

        let id = StationId(self.inner.next_station_id.fetch_add(1, Ordering::Relaxed));
        let station = Station::new(id, name);
        stations.insert(id, station.clone());
        Ok(station)
    }

    fn get_station(&self, id: StationId) -> Result<Option<Station>> {
        Ok(self.inner.stations.read().get(&id).cloned())
    }

    fn all_stations(&self) -> Result<Vec<Station>> {
        let mut all: Vec<Station> = self.inner.stations.read().values().cloned().collect();
        all.sort_by_key(|s| s.id);
        Ok(all)
    }

    fn delete_station(&self, id: StationId) -> Result<bool> {
        let lines = self.inner.lines.read();
        if let Some(line) = lines.values().find(|l| l.has_station(id)) {
            return Err(Error::StationInUse { station: id, line: line.id });
        }
        Ok(self.inner.stations.write().remove(&id).is_some())
    }

    fn create_line(
        &self,
        name: &str,
        color: &str,
        up: StationId,
        down: StationId,
        distance: Distance,
    ) -> Result<Line> {
        let mut lines = self.inner.lines.write();
        check_line_name_free(&lines, name, None)?;
        check_stations_exist(&self.inner.stations.read(), &[up, down])?;

        let id = LineId(self.inner.next_line_id.fetch_add(1, Ordering::Relaxed));
        let line = Line::new(id, name, color, up, down, distance)?;
        lines.insert(id, line.clone());
        Ok(line)
    }

    fn get_line(&self, id: LineId) -> Result<Option<Line>> {
        Ok(self.inner.lines.read().get(&id).cloned())
    }

    fn all_lines(&self) -> Result<Vec<Line>> {
        let mut all: Vec<Line> = self.inner.lines.read().values().cloned().collect();
        all.sort_by_key(|l| l.id);
        Ok(all)
    }

    fn save_line(&self, line: Line) -> Result<()> {
        let mut lines = self.inner.lines.write();
        if !lines.contains_key(&line.id) {
            return Err(Error::NotFound(format!("Line {}", line.id)));
        }
        check_line_name_free(&lines, &line.name, Some(line.id))?;
        {
            let stations = self.inner.stations.read();
            for segment in line.segments() {
                check_stations_exist(&stations, &[segment.up, segment.down])?;
            }
        }
        lines.insert(line.id, line);
        Ok(())
    }

    fn delete_line(&self, id: LineId) -> Result<bool> {
        Ok(self.inner.lines.write().remove(&id).is_some())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(d: i64) -> Distance {
        Distance::new(d).unwrap()
    }

    #[test]
    fn test_create_and_get_station() {
        let store = MemoryStore::new();
        let station = store.create_station("Gangnam").unwrap();

        let found = store.get_station(station.id).unwrap().unwrap();
        assert_eq!(found.name, "Gangnam");
        assert!(store.get_station(StationId(99)).unwrap().is_none());
    }

    #[test]
    fn test_station_names_are_unique() {
        let store = MemoryStore::new();
        store.create_station("Gangnam").unwrap();
        assert!(matches!(store.create_station("Gangnam"), Err(Error::ConstraintViolation(_))));
    }

    #[test]
    fn test_create_line_requires_known_stations() {
        let store = MemoryStore::new();
        let a = store.create_station("A").unwrap();

        let err = store.create_line("L1", "red", a.id, StationId(77), distance(5)).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(store.all_lines().unwrap().is_empty());
    }

    #[test]
    fn test_line_names_are_unique() {
        let store = MemoryStore::new();
        let a = store.create_station("A").unwrap();
        let b = store.create_station("B").unwrap();
        let c = store.create_station("C").unwrap();

        store.create_line("L1", "red", a.id, b.id, distance(5)).unwrap();
        assert!(matches!(
            store.create_line("L1", "blue", b.id, c.id, distance(5)),
            Err(Error::ConstraintViolation(_))
        ));
    }

    #[test]
    fn test_cannot_delete_station_in_use() {
        let store = MemoryStore::new();
        let a = store.create_station("A").unwrap();
        let b = store.create_station("B").unwrap();
        let c = store.create_station("C").unwrap();
        let line = store.create_line("L1", "red", a.id, b.id, distance(5)).unwrap();

        assert!(matches!(
            store.delete_station(a.id),
            Err(Error::StationInUse { line: l, .. }) if l == line.id
        ));
        assert!(store.delete_station(c.id).unwrap());
        assert!(!store.delete_station(c.id).unwrap());

        assert!(store.delete_line(line.id).unwrap());
        assert!(store.delete_station(a.id).unwrap());
    }

    #[test]
    fn test_save_line_round_trip() {
        let store = MemoryStore::new();
        let a = store.create_station("A").unwrap();
        let b = store.create_station("B").unwrap();
        let c = store.create_station("C").unwrap();
        let mut line = store.create_line("L1", "red", a.id, b.id, distance(5)).unwrap();

        line.add_segment(b.id, c.id, 3).unwrap();
        store.save_line(line.clone()).unwrap();

        let stored = store.require_line(line.id).unwrap();
        assert_eq!(stored.stations().unwrap(), vec![a.id, b.id, c.id]);
        assert_eq!(store.lines_through(c.id).unwrap().len(), 1);
    }

    #[test]
    fn test_save_unknown_line() {
        let store = MemoryStore::new();
        let line = Line::new(LineId(5), "Ghost", "grey", StationId(1), StationId(2), distance(1)).unwrap();
        assert!(matches!(store.save_line(line), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_ids_are_sequential() {
        let store = MemoryStore::new();
        let a = store.create_station("A").unwrap();
        let b = store.create_station("B").unwrap();
        assert_eq!(a.id, StationId(1));
        assert_eq!(b.id, StationId(2));
        assert_eq!(
            store.all_stations().unwrap().iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![a.id, b.id]
        );
    }
}
