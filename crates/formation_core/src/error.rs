use thiserror::Error;

use crate::config::ConfigError;
use crate::models::{Location, PlayerId, PositionId};
use crate::persistence::RepositoryError;

#[derive(Error, Debug)]
pub enum FormationError {
    /// Preset name not in the catalog. Always a caller bug.
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Bench is full ({capacity} players)")]
    BenchFull { capacity: usize },

    #[error("Invalid drop target: {0}")]
    InvalidDropTarget(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Player {player} is not at {claimed} (found at {actual})")]
    StaleOrigin { player: PlayerId, claimed: Location, actual: Location },

    #[error("Move rejected: {0}")]
    InvariantViolation(#[from] InvariantViolation),

    #[error("Board is read-only")]
    ReadOnly,

    #[error("Changes not saved: {0}")]
    PersistenceFailure(#[from] RepositoryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl FormationError {
    /// Errors the board reports to the user as a transient notice
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            FormationError::BenchFull { .. } => Some("Bench is full"),
            FormationError::PersistenceFailure(_) => Some("Changes not saved"),
            FormationError::ReadOnly => Some("You cannot edit this formation"),
            _ => None,
        }
    }

    /// Rejections that only need a visual snap-back
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            FormationError::InvalidDropTarget(_) | FormationError::StaleOrigin { .. }
        )
    }
}

/// A lineup that breaks the one-player-one-place rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("player {0} is placed more than once")]
    DuplicatePlayer(PlayerId),

    #[error("slot {0} does not exist in the active preset")]
    UnknownSlot(PositionId),

    #[error("bench has {len} cells, capacity is {capacity}")]
    BenchOverCapacity { len: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, FormationError>;
