//! Lineup: the assignment half of the formation state
//!
//! Starters are keyed by slot id, the bench is an ordered list of cells that may
//! be empty. The whole board relies on one invariant: a player id appears at most
//! once across starters and bench.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::ids::{PlayerId, PositionId};
use crate::error::InvariantViolation;
use crate::presets::Slot;

/// Where a player currently sits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "kind", content = "at")]
pub enum Location {
    /// Starter in the given slot
    Slot(PositionId),
    /// Substitute at the given bench index
    Bench(usize),
    /// On the roster but neither starting nor on the bench
    Unassigned,
}

impl Location {
    pub fn is_starter(&self) -> bool {
        matches!(self, Location::Slot(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Slot(position) => write!(f, "slot {}", position),
            Location::Bench(index) => write!(f, "bench #{}", index),
            Location::Unassigned => f.write_str("unassigned"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lineup {
    /// Active preset name
    pub preset: String,
    pub starters: BTreeMap<PositionId, PlayerId>,
    pub subs: Vec<Option<PlayerId>>,
}

impl Lineup {
    pub fn empty(preset: impl Into<String>) -> Self {
        Self { preset: preset.into(), starters: BTreeMap::new(), subs: Vec::new() }
    }

    pub fn locate(&self, player: &PlayerId) -> Location {
        if let Some((position, _)) = self.starters.iter().find(|(_, id)| *id == player) {
            return Location::Slot(position.clone());
        }
        match self.subs.iter().position(|cell| cell.as_ref() == Some(player)) {
            Some(index) => Location::Bench(index),
            None => Location::Unassigned,
        }
    }

    pub fn starter_at(&self, position: &PositionId) -> Option<&PlayerId> {
        self.starters.get(position)
    }

    pub fn sub_at(&self, index: usize) -> Option<&PlayerId> {
        self.subs.get(index).and_then(|cell| cell.as_ref())
    }

    pub fn occupant(&self, location: &Location) -> Option<&PlayerId> {
        match location {
            Location::Slot(position) => self.starter_at(position),
            Location::Bench(index) => self.sub_at(*index),
            Location::Unassigned => None,
        }
    }

    /// Number of filled slots plus filled bench cells
    pub fn occupied_count(&self) -> usize {
        self.starters.len() + self.sub_count()
    }

    pub fn sub_count(&self) -> usize {
        self.subs.iter().filter(|cell| cell.is_some()).count()
    }

    /// Every assigned player, starters first (in slot-id order), then bench order
    pub fn assigned_players(&self) -> impl Iterator<Item = &PlayerId> {
        self.starters.values().chain(self.subs.iter().flatten())
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.assigned_players().any(|id| id == player)
    }

    /// First empty bench cell, or the next index if the bench can still grow
    pub fn open_bench_cell(&self, capacity: usize) -> Option<usize> {
        self.subs
            .iter()
            .take(capacity)
            .position(|cell| cell.is_none())
            .or_else(|| (self.subs.len() < capacity).then_some(self.subs.len()))
    }

    /// Remove and return whoever is at `location`
    pub(crate) fn take(&mut self, location: &Location) -> Option<PlayerId> {
        match location {
            Location::Slot(position) => self.starters.remove(position),
            Location::Bench(index) => self.subs.get_mut(*index).and_then(Option::take),
            Location::Unassigned => None,
        }
    }

    /// Put `player` at `location`; `None` leaves the location empty.
    ///
    /// Placing on a bench index past the end grows the bench with empty cells.
    pub(crate) fn put(&mut self, location: &Location, player: Option<PlayerId>) {
        match location {
            Location::Slot(position) => match player {
                Some(id) => {
                    self.starters.insert(position.clone(), id);
                }
                None => {
                    self.starters.remove(position);
                }
            },
            Location::Bench(index) => {
                if *index >= self.subs.len() {
                    if player.is_none() {
                        return;
                    }
                    self.subs.resize(index + 1, None);
                }
                self.subs[*index] = player;
            }
            Location::Unassigned => {}
        }
    }

    /// Check the lineup against the slots of its preset and the bench capacity.
    pub fn check_invariants(
        &self,
        slots: &[Slot],
        bench_capacity: usize,
    ) -> Result<(), InvariantViolation> {
        for position in self.starters.keys() {
            if !slots.iter().any(|slot| &slot.position_id == position) {
                return Err(InvariantViolation::UnknownSlot(position.clone()));
            }
        }

        if self.subs.len() > bench_capacity {
            return Err(InvariantViolation::BenchOverCapacity {
                len: self.subs.len(),
                capacity: bench_capacity,
            });
        }

        let mut seen = HashSet::new();
        for player in self.assigned_players() {
            if !seen.insert(player) {
                return Err(InvariantViolation::DuplicatePlayer(player.clone()));
            }
        }
        Ok(())
    }
}
