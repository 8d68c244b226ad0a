//! Seams to the roster/formation backend and the auth collaborator
//!
//! The board never talks to a database or HTTP API directly; it is handed an
//! implementation of these traits when it is mounted.

pub mod error;
pub mod file;
pub mod memory;
pub mod worker;

pub use error::RepositoryError;
pub use file::FileRepository;
pub use memory::InMemoryRepository;
pub use worker::{DispatchMode, SaveJob, SaveOutcome, SaveWorker};

use crate::models::{PersistedFormation, PlayerRef, TeamId};

/// Storage of saved formations and team rosters
pub trait FormationRepository: Send + Sync {
    /// `Ok(None)` when the team has never saved a formation
    fn load_formation(&self, team: &TeamId) -> Result<Option<PersistedFormation>, RepositoryError>;

    fn save_formation(
        &self,
        team: &TeamId,
        formation: &PersistedFormation,
    ) -> Result<(), RepositoryError>;

    fn list_roster_players(&self, team: &TeamId) -> Result<Vec<PlayerRef>, RepositoryError>;
}

/// Role/permission check owned by the auth collaborator
pub trait EditPermission: Send + Sync {
    fn can_edit_formation(&self, team: &TeamId, actor: &str) -> bool;
}

/// Permission table for hosts without an auth service: listed actors may edit
#[derive(Debug, Clone, Default)]
pub struct ManagerList {
    managers: Vec<(TeamId, String)>,
}

impl ManagerList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, team: impl Into<TeamId>, actor: impl Into<String>) -> Self {
        self.managers.push((team.into(), actor.into()));
        self
    }
}

impl EditPermission for ManagerList {
    fn can_edit_formation(&self, team: &TeamId, actor: &str) -> bool {
        self.managers.iter().any(|(t, a)| t == team && a == actor)
    }
}
