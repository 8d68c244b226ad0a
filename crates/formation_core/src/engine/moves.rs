use serde::{Deserialize, Serialize};

use crate::models::{Lineup, Location, PlayerId, PositionId};

/// A requested reassignment.
///
/// `origin` is where the caller believes the player was when the gesture
/// started; the engine refuses the move if the lineup disagrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "move")]
pub enum MoveDescriptor {
    /// Drop onto a pitch slot. An occupant trades places with the mover.
    MoveToSlot { player: PlayerId, target: PositionId, origin: Location },
    /// Drop onto a bench cell. An occupant trades places with the mover.
    MoveToSubSlot { player: PlayerId, target_index: usize, origin: Location },
    /// Drop one chip onto another: exchange their locations.
    SwapPlayers { a: PlayerId, b: PlayerId },
    /// Drop a starter onto the bench area: first free bench cell.
    DemoteToSubsGeneral { player: PlayerId, origin_position: PositionId },
}

impl MoveDescriptor {
    pub fn kind(&self) -> &'static str {
        match self {
            MoveDescriptor::MoveToSlot { .. } => "move_to_slot",
            MoveDescriptor::MoveToSubSlot { .. } => "move_to_sub_slot",
            MoveDescriptor::SwapPlayers { .. } => "swap_players",
            MoveDescriptor::DemoteToSubsGeneral { .. } => "demote_to_subs",
        }
    }

    /// The player who started the gesture
    pub fn mover(&self) -> &PlayerId {
        match self {
            MoveDescriptor::MoveToSlot { player, .. }
            | MoveDescriptor::MoveToSubSlot { player, .. }
            | MoveDescriptor::DemoteToSubsGeneral { player, .. } => player,
            MoveDescriptor::SwapPlayers { a, .. } => a,
        }
    }
}

/// Result of a move that was not rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied(Lineup),
    /// Valid request that changes nothing (e.g. dropped back on its own slot)
    Unchanged,
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied(_))
    }
}
