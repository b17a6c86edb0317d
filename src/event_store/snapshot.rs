//! Persistence adapters
//!
//! The whole ledger state is written as one JSON document after every
//! mutation. `JsonFileStore` writes it atomically and keeps the previous
//! document as a backup that `load()` falls back to when the primary is
//! missing or corrupted.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ledger::{LedgerState, RecentHistory, VictoryLedger};
use crate::types::ScoreEvent;
use crate::utils::{atomic_write_with, remove_stale_temp};

use super::store::{EventStore, PersistenceError, PersistenceResult};

/// Version of the on-disk document format
pub const FORMAT_VERSION: u32 = 1;

/// Durable snapshot/restore of the full ledger state
pub trait PersistenceAdapter: Send + Sync {
    /// Reconstruct the last flushed state, `None` if nothing was ever flushed
    fn load(&self, history_capacity: usize) -> PersistenceResult<Option<LedgerState>>;

    /// Write the entire state; must never leave a truncated document behind
    fn flush(&self, state: &LedgerState) -> PersistenceResult<()>;

    /// Short storage label reported by the health endpoint
    fn kind(&self) -> &'static str;
}

/// Per-player section of the document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerDocument {
    /// Recent history, oldest first
    #[serde(default)]
    pub score_stack: Vec<ScoreEvent>,
    /// Victories, oldest first
    #[serde(default)]
    pub victory_list: Vec<ScoreEvent>,
}

/// The persisted document (format version 1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub format_version: u32,
    pub next_sequence: u64,
    pub saved_at: DateTime<Utc>,
    /// Every event, ordered by sequence
    pub events: Vec<ScoreEvent>,
    #[serde(default)]
    pub players: BTreeMap<String, PlayerDocument>,
}

impl StoreDocument {
    /// Capture a state
    pub fn from_state(state: &LedgerState) -> Self {
        let players = state
            .player_ids()
            .into_iter()
            .map(|player_id| {
                let doc = PlayerDocument {
                    score_stack: state.recent.oldest_first(&player_id).cloned().collect(),
                    victory_list: state.victories.to_list(&player_id),
                };
                (player_id, doc)
            })
            .collect();

        Self {
            format_version: FORMAT_VERSION,
            next_sequence: state.events.next_sequence(),
            saved_at: Utc::now(),
            events: state.events.to_events(),
            players,
        }
    }

    /// Rebuild the state
    ///
    /// A `score_stack` longer than `history_capacity` loses its oldest entries.
    pub fn into_state(self, history_capacity: usize) -> PersistenceResult<LedgerState> {
        if self.format_version != FORMAT_VERSION {
            return Err(PersistenceError::Corrupted(format!(
                "unsupported format_version {}",
                self.format_version
            )));
        }

        let events = EventStore::from_events(self.events, self.next_sequence)?;
        let mut state = LedgerState {
            events,
            recent: RecentHistory::new(history_capacity),
            victories: VictoryLedger::new(),
        };

        for (player_id, doc) in self.players {
            state.ensure_player(&player_id);

            for event in doc.score_stack {
                check_owner(&player_id, &event)?;
                state.recent.push(&player_id, event);
            }
            for event in doc.victory_list {
                check_owner(&player_id, &event)?;
                state.victories.restore(&player_id, event);
            }
        }

        // Ledgers are created on first submission, so every player with events has one
        let with_events: Vec<String> = state.events.player_ids().map(str::to_string).collect();
        for player_id in with_events {
            state.ensure_player(&player_id);
        }

        Ok(state)
    }
}

fn check_owner(player_id: &str, event: &ScoreEvent) -> PersistenceResult<()> {
    if event.player_id == player_id {
        Ok(())
    } else {
        Err(PersistenceError::Corrupted(format!(
            "event {} of '{}' stored under player '{}'",
            event.sequence, event.player_id, player_id
        )))
    }
}

/// JSON document on disk with atomic rename and a `.bak` fallback
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the primary document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the previous document (`<file>.bak`)
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Remove the temp file left behind by an interrupted flush
    pub fn cleanup(&self) -> PersistenceResult<bool> {
        Ok(remove_stale_temp(&self.path)?)
    }

    fn read_document(path: &Path) -> PersistenceResult<StoreDocument> {
        let file = File::open(path)?;
        let document = serde_json::from_reader(BufReader::new(file))?;
        Ok(document)
    }

    fn load_from(path: &Path, history_capacity: usize) -> PersistenceResult<LedgerState> {
        Self::read_document(path)?.into_state(history_capacity)
    }
}

impl PersistenceAdapter for JsonFileStore {
    fn load(&self, history_capacity: usize) -> PersistenceResult<Option<LedgerState>> {
        let backup = self.backup_path();

        if self.path.exists() {
            match Self::load_from(&self.path, history_capacity) {
                Ok(state) => {
                    info!(
                        path = %self.path.display(),
                        events = state.events.len(),
                        players = state.player_ids().len(),
                        "Loaded score document"
                    );
                    return Ok(Some(state));
                }
                Err(primary_err) => {
                    warn!(
                        path = %self.path.display(),
                        error = %primary_err,
                        "Score document unreadable, trying backup"
                    );
                    if !backup.exists() {
                        return Err(primary_err);
                    }
                    return match Self::load_from(&backup, history_capacity) {
                        Ok(state) => {
                            warn!(path = %backup.display(), "Recovered from backup document");
                            Ok(Some(state))
                        }
                        Err(backup_err) => {
                            warn!(path = %backup.display(), error = %backup_err, "Backup unreadable too");
                            Err(primary_err)
                        }
                    };
                }
            }
        }

        // Crash between moving the old document aside and renaming the new one
        if backup.exists() {
            warn!(path = %backup.display(), "Primary document missing, loading backup");
            return Self::load_from(&backup, history_capacity).map(Some);
        }

        info!(path = %self.path.display(), "No score document yet, starting empty");
        Ok(None)
    }

    fn flush(&self, state: &LedgerState) -> PersistenceResult<()> {
        let document = StoreDocument::from_state(state);
        let backup = self.backup_path();

        atomic_write_with(&self.path, Some(&backup), |file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &document)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            writer.write_all(b"\n")?;
            writer.flush()
        })?;

        debug!(
            path = %self.path.display(),
            events = document.events.len(),
            next_sequence = document.next_sequence,
            "Flushed score document"
        );
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "json_file"
    }
}

/// Keeps the serialized document in memory (ephemeral mode and tests)
#[derive(Default)]
pub struct MemoryStore {
    document: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last flushed document, if any
    pub fn document(&self) -> Option<String> {
        self.document.lock().clone()
    }
}

impl PersistenceAdapter for MemoryStore {
    fn load(&self, history_capacity: usize) -> PersistenceResult<Option<LedgerState>> {
        match self.document.lock().as_deref() {
            Some(json) => {
                let document: StoreDocument = serde_json::from_str(json)?;
                document.into_state(history_capacity).map(Some)
            }
            None => Ok(None),
        }
    }

    fn flush(&self, state: &LedgerState) -> PersistenceResult<()> {
        let json = serde_json::to_string(&StoreDocument::from_state(state))?;
        *self.document.lock() = Some(json);
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
