//! Formation state store
//!
//! One store per open board. It owns the lineup plus the saved/loading flags,
//! commits engine results, and decides when a snapshot should be written.
//! Time is passed in by the caller so the debounce is deterministic under test.

pub mod scheduler;
pub mod seeding;

use chrono::Utc;
use serde::Serialize;
use std::time::Instant;

use crate::config::BoardConfig;
use crate::engine::{self, MoveDescriptor, MoveOutcome};
use crate::error::Result;
use crate::models::{Lineup, PersistedFormation, PlayerId, PlayerRef, TeamId};
use crate::persistence::{FormationRepository, RepositoryError, SaveJob, SaveOutcome};
use crate::presets;

pub use scheduler::SaveScheduler;
pub use seeding::{hydrate, placeholder_roster, remap_to_preset, seed_lineup, Remap};

#[derive(Debug, Clone, PartialEq)]
pub struct FormationState {
    pub lineup: Lineup,
    /// Lineup matches the last successful write (or was never edited)
    pub saved: bool,
    pub loading: bool,
}

/// What the host should show next to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    Saved,
    Unsaved,
    Saving,
    /// Last write for the current lineup failed ("changes not saved")
    Failed,
}

/// Where the current lineup came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineupSource {
    Persisted,
    Placeholder,
    Roster,
}

/// Outcome of `change_preset`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresetChange {
    pub changed: bool,
    pub demoted: Vec<PlayerId>,
    /// Bench overflow; these players are now unassigned
    pub evicted: Vec<PlayerId>,
}

pub struct FormationStore {
    team: TeamId,
    config: BoardConfig,
    state: FormationState,
    source: LineupSource,
    revision: u64,
    scheduler: SaveScheduler,
    in_flight: Option<u64>,
    last_failure: Option<(u64, RepositoryError)>,
}

impl FormationStore {
    /// Empty store; call `reload` (or use `init`) before showing it
    pub fn new(team: TeamId, config: BoardConfig) -> Self {
        let scheduler = SaveScheduler::new(config.save_debounce());
        let placeholder = Lineup::empty(config.default_preset.clone());
        Self {
            team,
            config,
            state: FormationState { lineup: placeholder, saved: true, loading: false },
            source: LineupSource::Placeholder,
            revision: 0,
            scheduler,
            in_flight: None,
            last_failure: None,
        }
    }

    /// Create the store for `team` and load its saved formation.
    pub fn init(
        team: TeamId,
        config: BoardConfig,
        repository: &dyn FormationRepository,
    ) -> Result<Self> {
        let mut store = Self::new(team, config);
        store.reload(repository)?;
        Ok(store)
    }

    /// Replace local state with the saved formation, or a placeholder lineup
    /// when none is saved or the load fails. Unsaved local changes are dropped.
    pub fn reload(&mut self, repository: &dyn FormationRepository) -> Result<LineupSource> {
        self.state.loading = true;
        let capacity = self.config.bench_capacity;

        let loaded = match repository.load_formation(&self.team) {
            Ok(Some(persisted)) => Some(hydrate(&persisted, &self.config.default_preset, capacity)),
            Ok(None) | Err(RepositoryError::NotFound { .. }) => {
                tracing::info!(team = %self.team, "no saved formation, using placeholder lineup");
                None
            }
            Err(err) => {
                tracing::warn!(team = %self.team, error = %err, "formation load failed, using placeholder lineup");
                None
            }
        };

        let (lineup, source) = match loaded {
            Some(Ok(lineup)) => (lineup, LineupSource::Persisted),
            Some(Err(err)) => {
                self.state.loading = false;
                return Err(err);
            }
            None => {
                let preset = presets::preset(&self.config.default_preset)?;
                (seed_lineup(preset, &placeholder_roster(preset), capacity), LineupSource::Placeholder)
            }
        };

        self.state = FormationState { lineup, saved: true, loading: false };
        self.source = source;
        self.discard_pending_saves();
        tracing::info!(team = %self.team, preset = %self.state.lineup.preset, ?source, "formation loaded");
        Ok(source)
    }

    /// Bulk replace from the real roster, using the placeholder seeding rules
    /// against the default preset.
    pub fn map_players_to_positions(&mut self, players: &[PlayerRef]) -> Result<()> {
        let preset = presets::preset(&self.config.default_preset)?;
        self.state.lineup = seed_lineup(preset, players, self.config.bench_capacity);
        self.state.saved = true;
        self.source = LineupSource::Roster;
        self.discard_pending_saves();
        tracing::info!(team = %self.team, players = players.len(), "lineup seeded from roster");
        Ok(())
    }

    pub fn change_preset(&mut self, name: &str, now: Instant) -> Result<PresetChange> {
        let preset = presets::preset(name)?;
        if self.state.lineup.preset == preset.name {
            return Ok(PresetChange::default());
        }

        let remap = remap_to_preset(&self.state.lineup, preset, self.config.bench_capacity)?;
        if !remap.evicted.is_empty() {
            tracing::warn!(count = remap.evicted.len(), "bench overflow after preset change");
        }
        tracing::info!(
            team = %self.team,
            from = %self.state.lineup.preset,
            to = name,
            demoted = remap.demoted.len(),
            "preset changed"
        );
        self.commit(remap.lineup, now);
        Ok(PresetChange { changed: true, demoted: remap.demoted, evicted: remap.evicted })
    }

    /// Run a move through the engine and commit it if it changes anything.
    /// A rejected move leaves the store exactly as it was.
    pub fn apply(&mut self, mv: &MoveDescriptor, now: Instant) -> Result<MoveOutcome> {
        let outcome = engine::apply_move(&self.state.lineup, mv, self.config.bench_capacity)?;
        if let MoveOutcome::Applied(lineup) = &outcome {
            self.commit(lineup.clone(), now);
        }
        Ok(outcome)
    }

    /// Local state was replaced wholesale: outcomes of writes already in
    /// flight describe a lineup that no longer exists.
    fn discard_pending_saves(&mut self) {
        self.revision += 1;
        self.in_flight = None;
        self.scheduler.cancel();
        self.last_failure = None;
    }

    fn commit(&mut self, lineup: Lineup, now: Instant) {
        self.state.lineup = lineup;
        self.state.saved = false;
        self.revision += 1;
        self.scheduler.note_change(now);
    }

    /// Snapshot to write, once the debounce window has passed
    pub fn poll_save(&mut self, now: Instant) -> Option<SaveJob> {
        if self.state.saved || !self.scheduler.take_due(now) {
            return None;
        }
        self.in_flight = Some(self.revision);
        Some(SaveJob {
            team: self.team.clone(),
            revision: self.revision,
            formation: PersistedFormation::from_lineup(&self.state.lineup, Utc::now()),
        })
    }

    /// Apply a write result. Results for older revisions never mark the
    /// current lineup saved; a failure never rolls the lineup back.
    pub fn complete_save(&mut self, outcome: SaveOutcome) {
        if self.in_flight == Some(outcome.revision) {
            self.in_flight = None;
        }

        match outcome.result {
            Ok(()) => {
                if outcome.revision == self.revision {
                    self.state.saved = true;
                }
                if matches!(&self.last_failure, Some((failed, _)) if *failed <= outcome.revision) {
                    self.last_failure = None;
                }
            }
            Err(err) if outcome.revision == self.revision => {
                if err.is_recoverable() {
                    tracing::warn!(team = %self.team, revision = outcome.revision, error = %err, "changes not saved");
                } else {
                    tracing::error!(team = %self.team, revision = outcome.revision, error = %err, "changes not saved, retry will not help");
                }
                self.last_failure = Some((outcome.revision, err));
            }
            Err(err) => {
                tracing::debug!(revision = outcome.revision, error = %err, "stale save failure ignored");
            }
        }
    }

    /// Ask for an immediate write of unsaved changes
    pub fn retry_save(&mut self, now: Instant) -> bool {
        if self.state.saved {
            return false;
        }
        self.scheduler.force(now);
        true
    }

    pub fn status(&self) -> SaveStatus {
        if self.state.saved {
            SaveStatus::Saved
        } else if self.in_flight == Some(self.revision) {
            SaveStatus::Saving
        } else if self.last_failure.is_some() {
            SaveStatus::Failed
        } else {
            SaveStatus::Unsaved
        }
    }

    pub fn state(&self) -> &FormationState {
        &self.state
    }

    pub fn lineup(&self) -> &Lineup {
        &self.state.lineup
    }

    pub fn team(&self) -> &TeamId {
        &self.team
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn source(&self) -> LineupSource {
        self.source
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn last_failure(&self) -> Option<&RepositoryError> {
        self.last_failure.as_ref().map(|(_, err)| err)
    }

    pub fn save_pending(&self) -> bool {
        self.scheduler.is_pending()
    }
}
