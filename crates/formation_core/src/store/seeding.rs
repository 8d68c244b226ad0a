//! Building lineups from scratch, from saved data, and across presets
//!
//! All three walk preset slots in declaration order, which is what keeps a
//! goalkeeper in goal when nothing better is known.

use std::collections::HashSet;

use crate::error::Result;
use crate::models::{Lineup, Location, PersistedFormation, PlayerId, PlayerRef};
use crate::presets::{self, Preset};

/// Deterministic stand-in roster: one numbered player per slot
pub fn placeholder_roster(preset: &Preset) -> Vec<PlayerRef> {
    preset
        .slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let number = i + 1;
            PlayerRef::new(format!("placeholder-{}", number), format!("Player {}", number))
                .with_jersey(number as u8)
                .with_position(slot.label.clone())
        })
        .collect()
}

/// First N players start in slot order, the next ones fill the bench, the rest
/// stay unassigned. Repeated ids are skipped.
pub fn seed_lineup(preset: &Preset, players: &[PlayerRef], bench_capacity: usize) -> Lineup {
    let mut lineup = Lineup::empty(preset.name.clone());
    let mut seen = HashSet::new();
    let mut unique = players.iter().map(|p| p.id.clone()).filter(|id| seen.insert(id.clone()));

    for slot in &preset.slots {
        match unique.next() {
            Some(id) => {
                lineup.starters.insert(slot.position_id.clone(), id);
            }
            None => return lineup,
        }
    }
    lineup.subs = unique.by_ref().take(bench_capacity).map(Some).collect();

    let left_out = unique.count();
    if left_out > 0 {
        tracing::debug!(left_out, "roster larger than pitch plus bench");
    }
    lineup
}

/// Rebuild a lineup from saved data, repairing anything the catalog or the
/// bench capacity no longer allows.
///
/// - unknown preset → `default_preset`
/// - starter in a slot the preset lacks → moved to the bench
/// - a player listed twice → kept at the first place seen (slots, then bench)
/// - bench cells past capacity, or displaced starters with no free cell → unassigned
pub fn hydrate(
    persisted: &PersistedFormation,
    default_preset: &str,
    bench_capacity: usize,
) -> Result<Lineup> {
    let preset_name = if presets::is_known(&persisted.preset) {
        persisted.preset.as_str()
    } else {
        tracing::warn!(saved = %persisted.preset, fallback = default_preset, "saved preset unknown");
        default_preset
    };
    let preset = presets::preset(preset_name)?;

    let raw = persisted.to_lineup();
    if raw.preset == preset.name && raw.check_invariants(&preset.slots, bench_capacity).is_ok() {
        return Ok(raw);
    }

    let mut lineup = Lineup::empty(preset_name);
    let mut seen: HashSet<PlayerId> = HashSet::new();

    for slot in &preset.slots {
        if let Some(player) = persisted.starters.get(&slot.position_id) {
            if seen.insert(player.clone()) {
                lineup.starters.insert(slot.position_id.clone(), player.clone());
            }
        }
    }

    let mut unassigned = Vec::new();
    for (index, cell) in persisted.subs.iter().enumerate() {
        let cell = cell.as_ref().filter(|player| seen.insert((*player).clone())).cloned();
        if index < bench_capacity {
            lineup.subs.push(cell);
        } else if let Some(player) = cell {
            unassigned.push(player);
        }
    }

    let orphans: Vec<PlayerId> = persisted
        .starters
        .iter()
        .filter(|(position, _)| preset.slot(position).is_none())
        .filter(|(_, player)| seen.insert((*player).clone()))
        .map(|(_, player)| player.clone())
        .collect();
    if !orphans.is_empty() {
        tracing::warn!(count = orphans.len(), preset = preset_name, "starters without a slot moved to bench");
    }
    for player in orphans {
        match lineup.open_bench_cell(bench_capacity) {
            Some(index) => lineup.put(&Location::Bench(index), Some(player)),
            None => unassigned.push(player),
        }
    }

    if !unassigned.is_empty() {
        tracing::warn!(count = unassigned.len(), "saved players left unassigned, bench full");
    }
    Ok(lineup)
}

/// Result of moving a lineup onto another preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remap {
    pub lineup: Lineup,
    /// Starters that did not fit the new preset and went to the bench
    pub demoted: Vec<PlayerId>,
    /// Players pushed off the end of the bench; the caller decides where they go
    pub evicted: Vec<PlayerId>,
}

/// i-th filled slot of the old preset → i-th slot of the new one.
/// Starters that do not fit go to the front of the bench; if the bench then
/// overflows, empty cells are dropped first, then players from the back.
pub fn remap_to_preset(lineup: &Lineup, new_preset: &Preset, bench_capacity: usize) -> Result<Remap> {
    let old_slots = presets::slots_for(&lineup.preset)?;
    let movers = old_slots.iter().filter_map(|slot| lineup.starters.get(&slot.position_id)).cloned();

    let mut next = Lineup::empty(new_preset.name.clone());
    let mut demoted = Vec::new();
    for (i, player) in movers.enumerate() {
        match new_preset.slots.get(i) {
            Some(slot) => {
                next.starters.insert(slot.position_id.clone(), player);
            }
            None => demoted.push(player),
        }
    }

    let mut subs: Vec<Option<PlayerId>> =
        demoted.iter().cloned().map(Some).chain(lineup.subs.iter().cloned()).collect();
    let mut evicted = Vec::new();
    while subs.len() > bench_capacity {
        if let Some(gap) = subs.iter().rposition(Option::is_none) {
            subs.remove(gap);
        } else if let Some(Some(player)) = subs.pop() {
            evicted.push(player);
        } else {
            break;
        }
    }
    evicted.reverse();
    next.subs = subs;

    Ok(Remap { lineup: next, demoted, evicted })
}
