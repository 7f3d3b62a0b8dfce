//! Snapshot round-trip tests.
//!
//! Builds a network, exports it to JSON, seeds a fresh in-memory network
//! from that JSON, and checks that topology and exploration survive.
//! Broken snapshots must be refused rather than loaded.

use pretty_assertions::assert_eq;
use subway_rs::export::{read_json, write_json};
use subway_rs::{Error, Network, NetworkSnapshot};

// ============================================================================
// Helper
// ============================================================================

fn build_network() -> Network<subway_rs::MemoryStore> {
    let network = Network::open_memory();
    let [a, b, c, d, e, f] =
        ["A", "B", "C", "D", "E", "F"].map(|name| network.create_station(name).unwrap().id);

    let l1 = network.create_line("L1", "green", a, b, 6).unwrap();
    network.add_segment(l1.id, b, c, 4).unwrap();
    let l2 = network.create_line("L2", "orange", b, d, 11).unwrap();
    network.add_segment(l2.id, b, e, 7).unwrap();
    let l3 = network.create_line("L3", "red", a, f, 16).unwrap();
    network.add_segment(l3.id, e, f, 6).unwrap();
    network
}

fn to_json(snapshot: &NetworkSnapshot) -> Vec<u8> {
    let mut out = Vec::new();
    write_json(snapshot, &mut out).unwrap();
    out
}

// ============================================================================
// 1. Round trip
// ============================================================================

#[test]
fn test_roundtrip_preserves_network() {
    let original = build_network();
    let snapshot = original.snapshot().unwrap();
    assert_eq!(snapshot.stations.len(), 6);
    assert_eq!(snapshot.lines.len(), 3);
    assert_eq!(snapshot.segment_count(), 6);

    let restored = Network::from_snapshot(read_json(to_json(&snapshot).as_slice()).unwrap()).unwrap();

    assert_eq!(restored.snapshot().unwrap(), snapshot);
    for line in original.lines().unwrap() {
        assert_eq!(
            restored.line(line.id).unwrap().stations().unwrap(),
            line.stations().unwrap(),
            "line {} order changed",
            line.name,
        );
    }

    let a = snapshot.stations[0].id;
    let d = snapshot.stations[3].id;
    assert_eq!(restored.explore(a, d).unwrap().distance, 14);
}

#[test]
fn test_restored_network_keeps_allocating_fresh_ids() {
    let original = build_network();
    let restored = Network::from_snapshot(original.snapshot().unwrap()).unwrap();

    let g = restored.create_station("G").unwrap();
    assert_eq!(g.id.0, 7);
    assert!(matches!(restored.create_station("A"), Err(Error::ConstraintViolation(_))));
}

// ============================================================================
// 2. Broken snapshots are refused
// ============================================================================

#[test]
fn test_snapshot_with_branched_line_is_rejected() {
    let snapshot = build_network().snapshot().unwrap();
    let mut json: serde_json::Value = serde_json::from_slice(&to_json(&snapshot)).unwrap();

    // Point L1's second segment back at A: A->B and A->C branch.
    json["lines"][0]["chain"][1]["up"] = serde_json::json!(1);

    let tampered: NetworkSnapshot = serde_json::from_value(json).unwrap();
    let err = Network::from_snapshot(tampered).err().unwrap();
    assert!(err.is_invariant_violation(), "got {err}");
}

#[test]
fn test_snapshot_with_unknown_station_is_rejected() {
    let mut snapshot = build_network().snapshot().unwrap();
    snapshot.stations.retain(|s| s.name != "C");

    assert!(matches!(Network::from_snapshot(snapshot), Err(Error::NotFound(_))));
}

#[test]
fn test_snapshot_with_duplicate_line_name_is_rejected() {
    let mut snapshot = build_network().snapshot().unwrap();
    snapshot.lines[1].name = snapshot.lines[0].name.clone();

    assert!(matches!(Network::from_snapshot(snapshot), Err(Error::ConstraintViolation(_))));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(read_json("{ not json".as_bytes()), Err(Error::Serialization(_))));
}
