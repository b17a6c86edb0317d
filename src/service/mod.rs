//! Score service - the single owner of ledger state
//!
//! `ScoreService` is built once at startup and shared (behind an `Arc`) by
//! every request handler. State is published as an immutable
//! `Arc<LedgerState>` snapshot:
//!
//! - readers clone the pointer and never wait on disk I/O
//! - writers serialize on a mutex, mutate a private copy, flush it, and only
//!   then swap the pointer
//!
//! A flush failure drops the copy, so memory never runs ahead of the store.

mod submission;

pub use submission::{parse_score, resolve_player_id, SubmitScore, ValidSubmission, MAX_PLAYER_ID_LEN};

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::aggregate::{global_stats, Aggregator};
use crate::config::{ServiceConfig, StorageKind};
use crate::error::{ScoreError, ScoreResult};
use crate::event_store::{
    clamp_limit, ActivityCounters, ActivitySnapshot, JsonFileStore, MemoryStore,
    PersistenceAdapter, PersistenceError,
};
use crate::ledger::{LedgerState, ResetReport};
use crate::types::{wide_total, GlobalStats, LeaderboardEntry, ScoreEvent, SortOrder, Summary};

/// Result of an accepted submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub event: ScoreEvent,
    /// Sum of the player's recent history after the submission
    pub current_total_score: i64,
    pub total_victories: usize,
    /// Events recorded for the player in the event store
    pub total_games: usize,
}

/// Victory list of one player, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct VictoryReport {
    pub victories: Vec<ScoreEvent>,
    pub total_victories: usize,
}

/// Figures reported by the health endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub storage: &'static str,
    pub total_players: usize,
    pub total_games: usize,
    pub activity: ActivitySnapshot,
}

/// Guarded state container plus every use case of the score ledger
pub struct ScoreService {
    config: ServiceConfig,
    aggregator: Aggregator,
    adapter: Arc<dyn PersistenceAdapter>,
    writer: Mutex<()>,
    state: RwLock<Arc<LedgerState>>,
    counters: ActivityCounters,
}

impl ScoreService {
    /// Open the storage named by the config and load whatever it holds
    pub fn open(config: ServiceConfig) -> ScoreResult<Self> {
        let adapter: Arc<dyn PersistenceAdapter> = match config.storage {
            StorageKind::JsonFile => {
                let store = JsonFileStore::new(&config.data_file);
                if store.cleanup()? {
                    info!(path = %store.path().display(), "Removed stale temp file");
                }
                Arc::new(store)
            }
            StorageKind::Memory => Arc::new(MemoryStore::new()),
        };
        Self::with_adapter(config, adapter)
    }

    /// Build the service over an explicit adapter
    pub fn with_adapter(
        config: ServiceConfig,
        adapter: Arc<dyn PersistenceAdapter>,
    ) -> ScoreResult<Self> {
        let state = adapter
            .load(config.history_capacity)?
            .unwrap_or_else(|| LedgerState::new(config.history_capacity));

        info!(
            storage = adapter.kind(),
            players = state.recent.player_ids().count(),
            events = state.events.len(),
            summary_source = %config.summary_source,
            "Score service ready"
        );

        Ok(Self {
            aggregator: Aggregator::new(config.summary_source),
            config,
            adapter,
            writer: Mutex::new(()),
            state: RwLock::new(Arc::new(state)),
            counters: ActivityCounters::new(),
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Current published state
    pub fn snapshot(&self) -> Arc<LedgerState> {
        self.state.read().clone()
    }

    /// Resolve an optional player id, applying the configured default
    pub fn player_id(&self, player_id: Option<String>) -> ScoreResult<String> {
        resolve_player_id(player_id, &self.config.default_player_id)
    }

    fn limit(&self, limit: Option<usize>, default: usize) -> usize {
        clamp_limit(limit.unwrap_or(default), self.config.max_query_limit)
    }

    /// Apply `change` to a copy of the state, flush it, then publish it
    fn mutate<T, F>(&self, change: F) -> ScoreResult<T>
    where
        F: FnOnce(&mut LedgerState) -> ScoreResult<T>,
    {
        let _writer = self.writer.lock();

        let mut next = LedgerState::clone(&self.snapshot());
        let output = change(&mut next)?;

        if let Err(e) = self.adapter.flush(&next) {
            self.counters.record_flush(false);
            error!(storage = self.adapter.kind(), error = %e, "Flush failed, mutation discarded");
            return Err(e.into());
        }
        self.counters.record_flush(true);

        *self.state.write() = Arc::new(next);
        self.counters.record_mutation();
        Ok(output)
    }

    /// Validate and record one score
    pub fn submit_score(&self, submission: SubmitScore) -> ScoreResult<SubmitOutcome> {
        let valid = ValidSubmission::validate(
            submission,
            &self.config.default_player_id,
            &self.config.default_game_type,
        )?;

        let outcome = self.mutate(|state| {
            if !state.events.has_capacity() {
                return Err(PersistenceError::Corrupted(
                    "event sequence numbers exhausted".to_string(),
                )
                .into());
            }
            let event = state.record(&valid.player_id, valid.score, &valid.game_type);
            let player = valid.player_id.as_str();
            if overflows(state.events.events_for(player))
                || overflows(state.recent.oldest_first(player))
            {
                return Err(ScoreError::validation("Score would overflow the player's total"));
            }
            Ok(SubmitOutcome {
                current_total_score: state.recent.total(&valid.player_id),
                total_victories: state.victories.total_wins(&valid.player_id),
                total_games: state.events.events_for(&valid.player_id).len(),
                event,
            })
        })?;

        self.counters.record_submission();
        debug!(
            player_id = %outcome.event.player_id,
            score = outcome.event.score,
            sequence = outcome.event.sequence,
            "Score recorded"
        );
        Ok(outcome)
    }

    /// Recent history, newest first
    pub fn recent_scores(&self, player_id: &str, limit: Option<usize>) -> Vec<ScoreEvent> {
        let limit = self.limit(limit, self.config.default_limit);
        self.snapshot().recent.latest(player_id, limit)
    }

    /// Full event history from the event store
    pub fn score_history(
        &self,
        player_id: &str,
        limit: Option<usize>,
        order: SortOrder,
    ) -> Vec<ScoreEvent> {
        let limit = self.limit(limit, self.config.default_limit);
        self.snapshot().events.query(player_id, limit, order)
    }

    pub fn victories(&self, player_id: &str) -> VictoryReport {
        let state = self.snapshot();
        VictoryReport {
            victories: state.victories.to_list(player_id),
            total_victories: state.victories.total_wins(player_id),
        }
    }

    pub fn player_stats(&self, player_id: &str) -> ScoreResult<Summary> {
        self.aggregator
            .summarize(&self.snapshot(), player_id)
            .ok_or_else(|| ScoreError::not_found(player_id))
    }

    pub fn leaderboard(&self, limit: Option<usize>) -> Vec<LeaderboardEntry> {
        let limit = self.limit(limit, self.config.leaderboard_size);
        self.aggregator.leaderboard(&self.snapshot(), limit)
    }

    /// Clear recent history, keep victories
    pub fn reset_scores(&self, player_id: &str) -> ScoreResult<ResetReport> {
        let report = self.mutate(|state| {
            state
                .reset_scores(player_id)
                .ok_or_else(|| ScoreError::not_found(player_id))
        })?;
        info!(player_id, cleared = report.scores_cleared, "Scores reset");
        Ok(report)
    }

    /// Clear recent history and victories
    pub fn reset_all(&self, player_id: &str) -> ScoreResult<ResetReport> {
        let report = self.mutate(|state| {
            state
                .reset_all(player_id)
                .ok_or_else(|| ScoreError::not_found(player_id))
        })?;
        info!(
            player_id,
            cleared = report.scores_cleared,
            victories_cleared = report.victories_cleared,
            "Scores and victories reset"
        );
        Ok(report)
    }

    /// Remove every event of the player; returns how many were removed
    pub fn delete_scores(&self, player_id: &str) -> ScoreResult<usize> {
        let removed = self.mutate(|state| {
            state
                .purge(player_id)
                .ok_or_else(|| ScoreError::not_found(player_id))
        })?;
        info!(player_id, removed, "Player scores deleted");
        Ok(removed)
    }

    /// One event by its sequence number, wherever it sits in the log
    pub fn score_by_sequence(&self, sequence: u64) -> ScoreResult<ScoreEvent> {
        self.snapshot()
            .events
            .get(sequence)
            .cloned()
            .ok_or(ScoreError::EventNotFound(sequence))
    }

    pub fn players(&self) -> Vec<String> {
        self.snapshot().player_ids()
    }

    pub fn global_stats(&self) -> GlobalStats {
        global_stats(&self.snapshot().events)
    }

    /// Best events across all players, optionally within `[min, max]`
    pub fn top_scores(
        &self,
        min_score: Option<i64>,
        max_score: Option<i64>,
        limit: Option<usize>,
    ) -> ScoreResult<Vec<ScoreEvent>> {
        let range = match (min_score, max_score) {
            (None, None) => None,
            (min, max) => {
                let min = min.unwrap_or(i64::MIN);
                let max = max.unwrap_or(i64::MAX);
                if min > max {
                    return Err(ScoreError::validation(
                        "min_score must not be greater than max_score",
                    ));
                }
                Some(min..=max)
            }
        };

        let limit = self.limit(limit, self.config.default_limit);
        Ok(self.snapshot().events.top_scores(range, limit))
    }

    pub fn health(&self) -> HealthReport {
        let state = self.snapshot();
        HealthReport {
            storage: self.adapter.kind(),
            total_players: state.recent.player_ids().count(),
            total_games: state.events.len(),
            activity: self.counters.snapshot(),
        }
    }
}

/// True when the events no longer sum inside `i64`
fn overflows<'a, I>(events: I) -> bool
where
    I: IntoIterator<Item = &'a ScoreEvent>,
{
    i64::try_from(wide_total(events)).is_err()
}
