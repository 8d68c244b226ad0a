use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{FormationRepository, RepositoryError};
use crate::models::{PersistedFormation, PlayerRef, TeamId};

/// Process-local repository.
///
/// Used by hosts that keep formations in memory and by tests, which can make
/// loads or saves fail on demand.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    formations: Mutex<HashMap<TeamId, PersistedFormation>>,
    rosters: Mutex<HashMap<TeamId, Vec<PlayerRef>>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    save_calls: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(self, team: impl Into<TeamId>, players: Vec<PlayerRef>) -> Self {
        lock(&self.rosters).insert(team.into(), players);
        self
    }

    pub fn with_formation(self, team: impl Into<TeamId>, formation: PersistedFormation) -> Self {
        lock(&self.formations).insert(team.into(), formation);
        self
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Save attempts so far, failed ones included
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self, team: &TeamId) -> Option<PersistedFormation> {
        lock(&self.formations).get(team).cloned()
    }
}

impl FormationRepository for InMemoryRepository {
    fn load_formation(&self, team: &TeamId) -> Result<Option<PersistedFormation>, RepositoryError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Backend("load failed".to_string()));
        }
        Ok(lock(&self.formations).get(team).cloned())
    }

    fn save_formation(
        &self,
        team: &TeamId,
        formation: &PersistedFormation,
    ) -> Result<(), RepositoryError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::Backend("save failed".to_string()));
        }
        lock(&self.formations).insert(team.clone(), formation.clone());
        Ok(())
    }

    fn list_roster_players(&self, team: &TeamId) -> Result<Vec<PlayerRef>, RepositoryError> {
        Ok(lock(&self.rosters).get(team).cloned().unwrap_or_default())
    }
}
