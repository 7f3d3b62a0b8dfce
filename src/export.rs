//! Network snapshots — dump a store as JSON, and read it back.
//!
//! A snapshot carries every station and every line with its segments.
//! It is the seeding path for `MemoryStore::from_snapshot`, which
//! re-validates each line before accepting it.
//!
//! ```text
//! NetworkStore → export_snapshot() → write_json() → file / fixture
//!   → read_json() → MemoryStore::from_snapshot()
//! ```

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::model::{Line, Station};
use crate::storage::NetworkStore;
use crate::Result;

/// Every station and line of a network at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub stations: Vec<Station>,
    pub lines: Vec<Line>,
}

impl NetworkSnapshot {
    pub fn segment_count(&self) -> usize {
        self.lines.iter().map(Line::segment_count).sum()
    }
}

/// Capture the current contents of a store, ordered by id.
pub fn export_snapshot<S: NetworkStore + ?Sized>(store: &S) -> Result<NetworkSnapshot> {
    Ok(NetworkSnapshot {
        stations: store.all_stations()?,
        lines: store.all_lines()?,
    })
}

/// Write a snapshot as pretty-printed JSON followed by a newline.
pub fn write_json(snapshot: &NetworkSnapshot, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, snapshot)?;
    writeln!(writer)?;
    Ok(())
}

pub fn read_json(reader: impl Read) -> Result<NetworkSnapshot> {
    Ok(serde_json::from_reader(reader)?)
}
