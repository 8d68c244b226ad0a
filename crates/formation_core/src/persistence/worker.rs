//! Fire-and-forget formation writes
//!
//! The board hands a snapshot to the worker and keeps going. Results come back
//! through a channel and are applied the next time the board polls, so the
//! event loop never waits on the backend.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::{FormationRepository, RepositoryError};
use crate::models::{PersistedFormation, TeamId};

/// A snapshot to write, tagged with the store revision it was taken at
#[derive(Debug, Clone)]
pub struct SaveJob {
    pub team: TeamId,
    pub revision: u64,
    pub formation: PersistedFormation,
}

#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub revision: u64,
    pub result: Result<(), RepositoryError>,
}

#[derive(Debug, Clone)]
pub enum DispatchMode {
    /// Write on the calling thread before `submit` returns
    Inline,
    /// Write on the runtime's blocking pool
    Background(Handle),
}

pub struct SaveWorker {
    repository: Arc<dyn FormationRepository>,
    mode: DispatchMode,
    outcomes_tx: UnboundedSender<SaveOutcome>,
    outcomes_rx: UnboundedReceiver<SaveOutcome>,
}

fn run(repository: &dyn FormationRepository, job: SaveJob) -> SaveOutcome {
    let result = repository.save_formation(&job.team, &job.formation);
    match &result {
        Ok(()) => tracing::info!(team = %job.team, revision = job.revision, "formation saved"),
        Err(err) => {
            tracing::warn!(team = %job.team, revision = job.revision, error = %err, "formation save failed")
        }
    }
    SaveOutcome { revision: job.revision, result }
}

impl SaveWorker {
    pub fn new(repository: Arc<dyn FormationRepository>, mode: DispatchMode) -> Self {
        let (outcomes_tx, outcomes_rx) = unbounded_channel();
        Self { repository, mode, outcomes_tx, outcomes_rx }
    }

    pub fn repository(&self) -> &Arc<dyn FormationRepository> {
        &self.repository
    }

    pub fn submit(&self, job: SaveJob) {
        match &self.mode {
            DispatchMode::Inline => {
                let outcome = run(self.repository.as_ref(), job);
                // The receiver lives in `self`, so this cannot fail.
                let _ = self.outcomes_tx.send(outcome);
            }
            DispatchMode::Background(handle) => {
                let repository = Arc::clone(&self.repository);
                let tx = self.outcomes_tx.clone();
                handle.spawn_blocking(move || {
                    let outcome = run(repository.as_ref(), job);
                    let _ = tx.send(outcome);
                });
            }
        }
    }

    /// Outcomes that arrived since the last call, in completion order
    pub fn drain(&mut self) -> Vec<SaveOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Wait for the next outcome (used by async hosts)
    pub async fn next_outcome(&mut self) -> Option<SaveOutcome> {
        self.outcomes_rx.recv().await
    }
}
