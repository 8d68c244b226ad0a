//! JSON-file repository
//!
//! Layout under the root directory:
//! ```text
//! <root>/<team>/formation.json   PersistedFormation
//! <root>/<team>/roster.json      [PlayerRef]
//! ```

use std::fs::{self, rename, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{FormationRepository, RepositoryError};
use crate::models::{PersistedFormation, PlayerRef, TeamId};

const FORMATION_FILE: &str = "formation.json";
const ROSTER_FILE: &str = "roster.json";

#[derive(Debug)]
pub struct FileRepository {
    root: PathBuf,
    // Background saves may overlap; one writer at a time keeps the temp file ours.
    write_lock: Mutex<()>,
}

impl FileRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), write_lock: Mutex::new(()) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn team_dir(&self, team: &TeamId) -> Result<PathBuf, RepositoryError> {
        let name = team.as_str();
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
        {
            return Err(RepositoryError::Backend(format!("invalid team id '{}'", name)));
        }
        Ok(self.root.join(name))
    }

    pub fn save_roster(&self, team: &TeamId, players: &[PlayerRef]) -> Result<(), RepositoryError> {
        let path = self.team_dir(team)?.join(ROSTER_FILE);
        let data = serde_json::to_vec_pretty(players)?;
        self.write_atomic(&path, &data)?;
        log::info!("Roster for {} saved ({} players)", team, players.len());
        Ok(())
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Atomic save: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(data)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, path)?;

        log::debug!("Wrote {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, RepositoryError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

impl FormationRepository for FileRepository {
    fn load_formation(&self, team: &TeamId) -> Result<Option<PersistedFormation>, RepositoryError> {
        let path = self.team_dir(team)?.join(FORMATION_FILE);
        let formation = Self::read_json(&path)?;
        if formation.is_some() {
            log::debug!("Loaded formation for {} from {:?}", team, path);
        }
        Ok(formation)
    }

    fn save_formation(
        &self,
        team: &TeamId,
        formation: &PersistedFormation,
    ) -> Result<(), RepositoryError> {
        let path = self.team_dir(team)?.join(FORMATION_FILE);
        let data = serde_json::to_vec_pretty(formation)?;
        self.write_atomic(&path, &data)?;
        log::info!("Formation for {} saved ({})", team, formation.preset);
        Ok(())
    }

    fn list_roster_players(&self, team: &TeamId) -> Result<Vec<PlayerRef>, RepositoryError> {
        let path = self.team_dir(team)?.join(ROSTER_FILE);
        Ok(Self::read_json(&path)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lineup;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_missing_formation_is_none() {
        let dir = TempDir::new().unwrap();
        let repo = FileRepository::new(dir.path());
        assert_eq!(repo.load_formation(&"lions".into()).unwrap(), None);
        assert!(repo.list_roster_players(&"lions".into()).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let repo = FileRepository::new(dir.path());
        let team = TeamId::from("lions");

        let mut lineup = Lineup::empty("4-4-2");
        lineup.starters.insert("gk".into(), "keeper".into());
        lineup.subs = vec![None, Some("spare".into())];
        let formation = PersistedFormation::from_lineup(&lineup, Utc::now());

        repo.save_formation(&team, &formation).unwrap();
        assert_eq!(repo.load_formation(&team).unwrap(), Some(formation));

        // Temp file should not exist
        assert!(!dir.path().join("lions").join("formation.tmp").exists());
    }

    #[test]
    fn test_roster_written_and_listed() {
        let dir = TempDir::new().unwrap();
        let repo = FileRepository::new(dir.path());
        let team = TeamId::from("lions");
        let players = vec![PlayerRef::new("a", "Ana").with_jersey(1)];

        repo.save_roster(&team, &players).unwrap();
        assert_eq!(repo.list_roster_players(&team).unwrap(), players);
    }

    #[test]
    fn test_corrupt_file_is_json_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("lions")).unwrap();
        fs::write(dir.path().join("lions").join(FORMATION_FILE), "{not json").unwrap();

        let repo = FileRepository::new(dir.path());
        let err = repo.load_formation(&"lions".into()).unwrap_err();
        assert!(matches!(err, RepositoryError::Json(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_team_id_cannot_escape_root() {
        let dir = TempDir::new().unwrap();
        let repo = FileRepository::new(dir.path());
        assert!(repo.load_formation(&"../etc".into()).is_err());
        assert!(repo.load_formation(&"..".into()).is_err());
    }
}
