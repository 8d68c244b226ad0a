//! Drag and drop protocol
//!
//! `Idle -> Dragging -> Dropped* -> Idle`. A gesture is a `DragHandle` while
//! in flight; the drop point is resolved to a `DropTarget`, and the target is
//! turned into a `MoveDescriptor` for the engine. Nothing in here mutates the
//! lineup.

use serde::Serialize;

use super::layout::{PitchLayout, Point};
use crate::engine::{MoveDescriptor, MoveOutcome};
use crate::error::{FormationError, Result};
use crate::models::{Lineup, Location, PlayerId, PositionId};
use crate::presets::Slot;

/// An in-flight drag gesture
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragHandle {
    pub player: PlayerId,
    /// Where the player was when the drag started
    pub origin: Location,
    /// Chip position to snap back to
    pub start: Point,
    pub pointer: Point,
    /// Target under the pointer after the last `drag_to`
    pub hover: Option<DropTarget>,
}

impl DragHandle {
    pub fn new(player: PlayerId, origin: Location, start: Point, pointer: Point) -> Self {
        Self { player, origin, start, pointer, hover: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum DropTarget {
    /// Another player's chip, on the pitch or the bench
    Player(PlayerId),
    Slot(PositionId),
    SubCell(usize),
    /// Bench strip outside any cell
    Bench,
}

/// How a gesture ended. Every variant but `DroppedInvalid` went through the
/// engine and carries its verdict.
#[derive(Debug)]
pub enum DragOutcome {
    DroppedOnSlot { target: PositionId, result: Result<MoveOutcome> },
    DroppedOnSub { index: usize, result: Result<MoveOutcome> },
    DroppedOnPlayer { other: PlayerId, result: Result<MoveOutcome> },
    DroppedOnBench { result: Result<MoveOutcome> },
    /// Nothing under the pointer; the chip returns to `snap_back`
    DroppedInvalid { snap_back: Point },
}

impl DragOutcome {
    pub fn result(&self) -> Option<&Result<MoveOutcome>> {
        match self {
            DragOutcome::DroppedOnSlot { result, .. }
            | DragOutcome::DroppedOnSub { result, .. }
            | DragOutcome::DroppedOnPlayer { result, .. }
            | DragOutcome::DroppedOnBench { result } => Some(result),
            DragOutcome::DroppedInvalid { .. } => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.result(), Some(Ok(outcome)) if outcome.is_applied())
    }

    pub fn error(&self) -> Option<&FormationError> {
        self.result().and_then(|result| result.as_ref().err())
    }
}

/// Chip of a placed player other than `dragging` under `point`
fn player_at(
    layout: &PitchLayout,
    slots: &[Slot],
    lineup: &Lineup,
    dragging: Option<&PlayerId>,
    point: Point,
) -> Option<PlayerId> {
    let radius = layout.chip_radius();
    if radius <= 0.0 {
        return None;
    }
    let starters = lineup
        .starters
        .iter()
        .map(|(position, player)| (player, Location::Slot(position.clone())));
    let bench = lineup
        .subs
        .iter()
        .enumerate()
        .filter_map(|(index, cell)| cell.as_ref().map(|player| (player, Location::Bench(index))));

    starters
        .chain(bench)
        .filter(|(player, _)| Some(*player) != dragging)
        .filter_map(|(player, location)| {
            layout
                .chip_point(slots, &location)
                .map(|center| (player, center.distance(point)))
        })
        .filter(|(_, distance)| *distance <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(player, _)| player.clone())
}

/// What lies under `point`, by priority: another player's chip, a slot
/// marker, a bench cell, the bench strip.
pub fn resolve_target(
    layout: &PitchLayout,
    slots: &[Slot],
    lineup: &Lineup,
    dragging: Option<&PlayerId>,
    point: Point,
) -> Option<DropTarget> {
    if let Some(player) = player_at(layout, slots, lineup, dragging, point) {
        return Some(DropTarget::Player(player));
    }
    if let Some(slot) = layout.slot_at(slots, point) {
        return Some(DropTarget::Slot(slot.position_id.clone()));
    }
    if let Some(index) = layout.bench_cell_at(point) {
        return Some(DropTarget::SubCell(index));
    }
    if layout.in_bench(point) {
        return Some(DropTarget::Bench);
    }
    None
}

/// Engine request for dropping `handle` on `target`.
///
/// `Ok(None)` means the drop is valid but there is nothing to do (a substitute
/// dropped on the bench strip).
pub fn move_for(
    handle: &DragHandle,
    target: &DropTarget,
    lineup: &Lineup,
    bench_capacity: usize,
) -> Result<Option<MoveDescriptor>> {
    let player = handle.player.clone();
    let origin = handle.origin.clone();
    let mv = match target {
        DropTarget::Player(other) => MoveDescriptor::SwapPlayers { a: player, b: other.clone() },
        DropTarget::Slot(position) => {
            MoveDescriptor::MoveToSlot { player, target: position.clone(), origin }
        }
        DropTarget::SubCell(index) => {
            MoveDescriptor::MoveToSubSlot { player, target_index: *index, origin }
        }
        DropTarget::Bench => match origin {
            Location::Slot(origin_position) => {
                MoveDescriptor::DemoteToSubsGeneral { player, origin_position }
            }
            Location::Bench(_) => return Ok(None),
            Location::Unassigned => match lineup.open_bench_cell(bench_capacity) {
                Some(index) => MoveDescriptor::MoveToSubSlot { player, target_index: index, origin },
                None => return Err(FormationError::BenchFull { capacity: bench_capacity }),
            },
        },
    };
    Ok(Some(mv))
}
