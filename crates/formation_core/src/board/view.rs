//! Render model
//!
//! A flat, serializable snapshot of everything a front end needs to draw the
//! board at the current size. Rebuilt on demand; holds no references.

use serde::Serialize;

use super::drag::DropTarget;
use super::layout::{Point, Rect};
use super::FormationBoard;
use crate::models::{Location, PlayerId, PlayerRef, PositionId};
use crate::presets;
use crate::store::SaveStatus;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotMarkerView {
    pub position_id: PositionId,
    pub label: String,
    pub at: Point,
    pub occupied: bool,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChipView {
    pub player: PlayerId,
    /// Jersey number or initials
    pub label: String,
    pub name: String,
    pub location: Location,
    pub at: Point,
    pub dragging: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchCellView {
    pub index: usize,
    pub rect: Rect,
    pub player: Option<PlayerId>,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub preset: String,
    pub width: f32,
    pub height: f32,
    pub total_height: f32,
    pub chip_radius: f32,
    pub slots: Vec<SlotMarkerView>,
    pub chips: Vec<ChipView>,
    pub bench: Vec<BenchCellView>,
    pub bench_highlighted: bool,
    /// Roster players neither starting nor on the bench
    pub unassigned: Vec<PlayerRef>,
    pub status: SaveStatus,
    pub notice: Option<&'static str>,
    pub read_only: bool,
    pub loading: bool,
}

impl FormationBoard {
    pub fn view(&self) -> BoardView {
        let state = self.store().state();
        let lineup = &state.lineup;
        let layout = self.layout();
        let slots = presets::slots_for(&lineup.preset).unwrap_or(&[]);
        let highlighted = self.valid_drop_targets();
        let dragging = self.dragging();

        let slot_markers = slots
            .iter()
            .map(|slot| SlotMarkerView {
                position_id: slot.position_id.clone(),
                label: slot.label.clone(),
                at: layout.slot_point(slot),
                occupied: lineup.starter_at(&slot.position_id).is_some(),
                highlighted: highlighted.contains(&DropTarget::Slot(slot.position_id.clone())),
            })
            .collect();

        let starters = slots.iter().filter_map(|slot| {
            lineup
                .starter_at(&slot.position_id)
                .map(|player| (player, Location::Slot(slot.position_id.clone())))
        });
        let subs = lineup
            .subs
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.as_ref().map(|player| (player, Location::Bench(index))));

        let chips = starters
            .chain(subs)
            .filter_map(|(player, location)| {
                let at = layout.chip_point(slots, &location)?;
                let dragged = dragging.filter(|handle| &handle.player == player);
                let (label, name) = match self.player(player) {
                    Some(info) => (info.chip_label(), info.name.clone()),
                    None => (player.to_string(), player.to_string()),
                };
                Some(ChipView {
                    player: player.clone(),
                    label,
                    name,
                    location,
                    at: dragged.map_or(at, |handle| handle.pointer),
                    dragging: dragged.is_some(),
                })
            })
            .collect();

        let bench = (0..self.store().config().bench_capacity)
            .filter_map(|index| {
                layout.bench_cell(index).map(|rect| BenchCellView {
                    index,
                    rect,
                    player: lineup.sub_at(index).cloned(),
                    highlighted: highlighted.contains(&DropTarget::SubCell(index)),
                })
            })
            .collect();

        let unassigned = self
            .roster()
            .iter()
            .filter(|player| !lineup.contains(&player.id))
            .cloned()
            .collect();

        BoardView {
            preset: lineup.preset.clone(),
            width: layout.width(),
            height: layout.height(),
            total_height: layout.total_height(),
            chip_radius: layout.chip_radius(),
            slots: slot_markers,
            chips,
            bench,
            bench_highlighted: highlighted.contains(&DropTarget::Bench),
            unassigned,
            status: self.status(),
            notice: self.notice(),
            read_only: self.is_read_only(),
            loading: state.loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardMount;
    use crate::config::BoardConfig;
    use crate::persistence::{DispatchMode, InMemoryRepository, SaveWorker};
    use std::sync::Arc;

    fn board(players: usize) -> FormationBoard {
        let roster = (1..=players)
            .map(|i| PlayerRef::new(format!("p{}", i), format!("Player {}", i)).with_jersey(i as u8))
            .collect();
        let repo = Arc::new(InMemoryRepository::new().with_roster("lions", roster));
        let worker = SaveWorker::new(repo, DispatchMode::Inline);
        let mut board =
            FormationBoard::mount(BoardMount::new("lions", true), BoardConfig::default(), worker).unwrap();
        board.resize(1600.0);
        board
    }

    #[test]
    fn test_view_lists_chips_bench_and_pool() {
        let view = board(20).view();

        assert_eq!(view.height, 900.0);
        assert_eq!(view.slots.len(), 11);
        assert!(view.slots.iter().all(|slot| slot.occupied && !slot.highlighted));
        assert_eq!(view.chips.len(), 18);
        assert_eq!(view.chips[0].label, "1");
        assert_eq!(view.bench.len(), 7);
        assert_eq!(view.bench[0].player, Some(PlayerId::from("p12")));
        assert_eq!(view.unassigned.len(), 2);
        assert_eq!(view.status, SaveStatus::Saved);
        assert!(!view.read_only);
    }

    #[test]
    fn test_dragged_chip_follows_pointer() {
        let mut board = board(11);
        let pointer = Point::new(700.0, 300.0);
        board.begin_drag(&"p10".into(), Point::new(1280.0, 450.0)).unwrap();
        board.drag_to(pointer);

        let view = board.view();
        let chip = view.chips.iter().find(|chip| chip.player.as_str() == "p10").unwrap();
        assert!(chip.dragging);
        assert_eq!(chip.at, pointer);
        assert!(view.slots.iter().any(|slot| slot.highlighted));
        assert!(view.bench.iter().all(|cell| cell.highlighted));
        assert!(view.bench_highlighted);
    }

    #[test]
    fn test_view_serializes_for_front_end() {
        let json = serde_json::to_value(board(11).view()).unwrap();
        assert_eq!(json["status"], "saved");
        assert_eq!(json["preset"], "4-3-3");
        assert_eq!(json["chips"][0]["location"]["kind"], "slot");
        assert!(json["notice"].is_null());
    }
}
