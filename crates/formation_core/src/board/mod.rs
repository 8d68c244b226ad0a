//! Interaction surface
//!
//! `FormationBoard` is what a host mounts: it owns one store, one save worker
//! and the pitch layout, turns pointer gestures into engine moves, and tells
//! listeners when the save status changes. Each board has its own state; two
//! boards never share anything but the repository they were handed.

pub mod drag;
pub mod layout;
pub mod view;

use std::time::Instant;

use crate::config::BoardConfig;
use crate::engine::{MoveDescriptor, MoveOutcome};
use crate::error::{FormationError, Result};
use crate::models::{Location, PlayerId, PlayerRef, TeamId};
use crate::persistence::{EditPermission, SaveWorker};
use crate::presets;
use crate::store::{placeholder_roster, FormationStore, LineupSource, PresetChange, SaveStatus};

pub use drag::{DragHandle, DragOutcome, DropTarget};
pub use layout::{PitchLayout, Point, Rect};
pub use view::{BenchCellView, BoardView, ChipView, SlotMarkerView};

/// Time source for the save debounce
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// What the host page passes when it mounts a board
#[derive(Debug, Clone)]
pub struct BoardMount {
    pub team_id: TeamId,
    /// Edit capability; false mounts the board read-only
    pub is_manager: bool,
    /// Roster fetched by the host; `None` asks the repository
    pub players: Option<Vec<PlayerRef>>,
}

impl BoardMount {
    pub fn new(team_id: impl Into<TeamId>, is_manager: bool) -> Self {
        Self { team_id: team_id.into(), is_manager, players: None }
    }

    pub fn for_actor(
        team_id: impl Into<TeamId>,
        actor: &str,
        permissions: &dyn EditPermission,
        players: Option<Vec<PlayerRef>>,
    ) -> Self {
        let team_id = team_id.into();
        let is_manager = permissions.can_edit_formation(&team_id, actor);
        Self { team_id, is_manager, players }
    }

    pub fn with_players(mut self, players: Vec<PlayerRef>) -> Self {
        self.players = Some(players);
        self
    }
}

type StatusListener = Box<dyn FnMut(SaveStatus)>;

pub struct FormationBoard {
    store: FormationStore,
    worker: SaveWorker,
    clock: Box<dyn Clock>,
    roster: Vec<PlayerRef>,
    /// False while the board shows placeholder players
    live_roster: bool,
    read_only: bool,
    layout: PitchLayout,
    drag: Option<DragHandle>,
    notice: Option<&'static str>,
    listeners: Vec<StatusListener>,
    last_status: SaveStatus,
}

impl FormationBoard {
    /// Load the team's formation through the worker's repository and build the
    /// board. The layout starts unmeasured; call `resize` once the container
    /// width is known.
    pub fn mount(mount: BoardMount, config: BoardConfig, worker: SaveWorker) -> Result<Self> {
        config.validate()?;
        let repository = worker.repository().clone();
        let mut store = FormationStore::init(mount.team_id.clone(), config, repository.as_ref())?;

        let roster = match mount.players {
            Some(players) => players,
            None => repository.list_roster_players(&mount.team_id).unwrap_or_else(|err| {
                tracing::warn!(team = %mount.team_id, error = %err, "roster unavailable");
                Vec::new()
            }),
        };

        let live_roster = !roster.is_empty();
        let roster = if live_roster {
            if store.source() != LineupSource::Persisted {
                store.map_players_to_positions(&roster)?;
            }
            roster
        } else {
            let preset = presets::preset(&store.lineup().preset)?;
            placeholder_roster(preset)
        };

        let layout = PitchLayout::new(0.0, store.config());
        let last_status = store.status();
        tracing::info!(team = %mount.team_id, read_only = !mount.is_manager, "board mounted");

        Ok(Self {
            store,
            worker,
            clock: Box::new(SystemClock),
            roster,
            live_roster,
            read_only: !mount.is_manager,
            layout,
            drag: None,
            notice: None,
            listeners: Vec::new(),
            last_status,
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Register a save-status listener; it fires on every status change
    pub fn on_status_change(&mut self, listener: impl FnMut(SaveStatus) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn resize(&mut self, width: f32) {
        self.layout.resize(width);
    }

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerRef> {
        self.roster.iter().find(|player| &player.id == id)
    }

    pub fn begin_drag(&mut self, player: &PlayerId, pointer: Point) -> Result<DragHandle> {
        if self.read_only {
            return Err(FormationError::ReadOnly);
        }
        let lineup = self.store.lineup();
        if self.player(player).is_none() && !lineup.contains(player) {
            return Err(FormationError::UnknownPlayer(player.clone()));
        }

        let origin = lineup.locate(player);
        let slots = presets::slots_for(&lineup.preset)?;
        let start = self.layout.chip_point(slots, &origin).unwrap_or(pointer);
        let handle = DragHandle::new(player.clone(), origin, start, pointer);

        self.notice = None;
        self.drag = Some(handle.clone());
        Ok(handle)
    }

    /// Pointer moved while dragging; returns the target now under it
    pub fn drag_to(&mut self, pointer: Point) -> Option<DropTarget> {
        let hover = self.resolve_drop(pointer);
        if let Some(handle) = self.drag.as_mut() {
            handle.pointer = pointer;
            handle.hover = hover.clone();
        }
        hover
    }

    pub fn resolve_drop(&self, pointer: Point) -> Option<DropTarget> {
        if self.read_only {
            return None;
        }
        let lineup = self.store.lineup();
        let slots = presets::slots_for(&lineup.preset).ok()?;
        let dragging = self.drag.as_ref().map(|handle| &handle.player);
        drag::resolve_target(&self.layout, slots, lineup, dragging, pointer)
    }

    pub fn drop_at(&mut self, pointer: Point) -> DragOutcome {
        let target = self.resolve_drop(pointer);
        let Some(handle) = self.drag.take() else {
            return DragOutcome::DroppedInvalid { snap_back: pointer };
        };
        let Some(target) = target else {
            tracing::debug!(player = %handle.player, "dropped outside any target");
            return DragOutcome::DroppedInvalid { snap_back: handle.start };
        };

        let capacity = self.store.config().bench_capacity;
        let result = drag::move_for(&handle, &target, self.store.lineup(), capacity).and_then(|mv| {
            match mv {
                Some(mv) => self.store.apply(&mv, self.clock.now()),
                None => Ok(MoveOutcome::Unchanged),
            }
        });

        if let Err(err) = &result {
            self.notice = err.notice();
            if !err.is_silent() {
                tracing::info!(player = %handle.player, error = %err, "drop rejected");
            }
        }
        self.emit_status();

        match target {
            DropTarget::Slot(target) => DragOutcome::DroppedOnSlot { target, result },
            DropTarget::SubCell(index) => DragOutcome::DroppedOnSub { index, result },
            DropTarget::Player(other) => DragOutcome::DroppedOnPlayer { other, result },
            DropTarget::Bench => DragOutcome::DroppedOnBench { result },
        }
    }

    /// Abandon the gesture; returns where the chip goes back to
    pub fn cancel_drag(&mut self) -> Option<Point> {
        self.drag.take().map(|handle| handle.start)
    }

    pub fn dragging(&self) -> Option<&DragHandle> {
        self.drag.as_ref()
    }

    /// Targets to highlight while a drag is in progress
    pub fn valid_drop_targets(&self) -> Vec<DropTarget> {
        let Some(handle) = self.drag.as_ref() else {
            return Vec::new();
        };
        let lineup = self.store.lineup();
        let Ok(slots) = presets::slots_for(&lineup.preset) else {
            return Vec::new();
        };

        let mut targets: Vec<DropTarget> = slots
            .iter()
            .filter(|slot| handle.origin != Location::Slot(slot.position_id.clone()))
            .map(|slot| DropTarget::Slot(slot.position_id.clone()))
            .collect();
        targets.extend(
            (0..self.store.config().bench_capacity)
                .filter(|index| handle.origin != Location::Bench(*index))
                .map(DropTarget::SubCell),
        );
        let bench_useful = match &handle.origin {
            Location::Slot(_) | Location::Unassigned => {
                lineup.open_bench_cell(self.store.config().bench_capacity).is_some()
            }
            Location::Bench(_) => false,
        };
        if bench_useful {
            targets.push(DropTarget::Bench);
        }
        targets
    }

    /// Apply a move without a pointer gesture (keyboard, scripts)
    pub fn apply_move(&mut self, mv: &MoveDescriptor) -> Result<MoveOutcome> {
        if self.read_only {
            return Err(FormationError::ReadOnly);
        }
        self.drag = None;
        let result = self.store.apply(mv, self.clock.now());
        if let Err(err) = &result {
            self.notice = err.notice();
        }
        self.emit_status();
        result
    }

    pub fn change_preset(&mut self, name: &str) -> Result<PresetChange> {
        if self.read_only {
            return Err(FormationError::ReadOnly);
        }
        self.drag = None;
        let change = self.store.change_preset(name, self.clock.now())?;
        self.emit_status();
        Ok(change)
    }

    /// Apply finished saves and send one if the debounce window has passed.
    /// Hosts call this from their event loop (timer tick or idle callback).
    pub fn poll(&mut self) -> SaveStatus {
        self.collect_outcomes();
        if let Some(job) = self.store.poll_save(self.clock.now()) {
            self.worker.submit(job);
            self.collect_outcomes();
        }
        self.emit_status();
        self.store.status()
    }

    /// Write unsaved changes now instead of waiting for the debounce
    pub fn retry_save(&mut self) -> SaveStatus {
        self.store.retry_save(self.clock.now());
        self.poll()
    }

    /// Wait for a background save to finish; no-op when nothing is in flight
    pub async fn settle(&mut self) -> SaveStatus {
        while self.store.status() == SaveStatus::Saving {
            match self.worker.next_outcome().await {
                Some(outcome) => self.store.complete_save(outcome),
                None => break,
            }
        }
        self.poll()
    }

    /// Throw away local state and load the saved formation again
    pub fn reload(&mut self) -> Result<()> {
        self.drag = None;
        self.notice = None;
        let repository = self.worker.repository().clone();
        let source = self.store.reload(repository.as_ref())?;
        if self.live_roster && source != LineupSource::Persisted {
            self.store.map_players_to_positions(&self.roster)?;
        }
        self.emit_status();
        Ok(())
    }

    fn collect_outcomes(&mut self) {
        for outcome in self.worker.drain() {
            self.store.complete_save(outcome);
        }
    }

    fn emit_status(&mut self) {
        let status = self.store.status();
        if status == self.last_status {
            return;
        }
        if status == SaveStatus::Failed {
            self.notice = self
                .store
                .last_failure()
                .and_then(|err| FormationError::PersistenceFailure(err.clone()).notice());
        }
        self.last_status = status;
        for listener in self.listeners.iter_mut() {
            listener(status);
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.store.status()
    }

    pub fn store(&self) -> &FormationStore {
        &self.store
    }

    pub fn layout(&self) -> &PitchLayout {
        &self.layout
    }

    pub fn roster(&self) -> &[PlayerRef] {
        &self.roster
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
