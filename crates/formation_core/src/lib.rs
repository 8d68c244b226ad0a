//! # formation_core - Team Formation Board Engine
//!
//! Arranges a team's starters and substitutes on a pitch diagram and keeps the
//! arrangement saved.
//!
//! ## Layers
//! - `presets`: built-in formation layouts (slots with normalized coordinates)
//! - `engine`: pure move transitions over a `Lineup`
//! - `store`: per-board state, preset switching, debounced saves
//! - `board`: pitch geometry, drag/drop protocol, render model
//! - `persistence`: repository and permission seams, save worker

// Drag outcomes carry the engine result inline
#![allow(clippy::large_enum_variant)]

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod persistence;
pub mod presets;
pub mod store;

pub use board::{BoardMount, BoardView, Clock, DragOutcome, DropTarget, FormationBoard, Point, SystemClock};
pub use config::BoardConfig;
pub use engine::{apply_move, MoveDescriptor, MoveOutcome};
pub use error::{FormationError, InvariantViolation, Result};
pub use models::{Lineup, Location, PersistedFormation, PlayerId, PlayerRef, PositionId, TeamId};
pub use persistence::{
    DispatchMode, EditPermission, FileRepository, FormationRepository, InMemoryRepository,
    ManagerList, RepositoryError, SaveWorker,
};
pub use store::{FormationState, FormationStore, LineupSource, PresetChange, SaveStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
