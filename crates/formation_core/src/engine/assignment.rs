//! Assignment engine
//!
//! Pure transitions `(Lineup, MoveDescriptor) -> Lineup`. Nothing here knows
//! about pixels, persistence or who is allowed to edit. A move either produces
//! a lineup that passes `Lineup::check_invariants`, reports that nothing
//! changes, or is rejected with the input left untouched.

use super::moves::{MoveDescriptor, MoveOutcome};
use crate::error::{FormationError, Result};
use crate::models::{Lineup, Location, PlayerId, PositionId};
use crate::presets::{self, Slot};

pub fn apply_move(
    lineup: &Lineup,
    mv: &MoveDescriptor,
    bench_capacity: usize,
) -> Result<MoveOutcome> {
    let slots = presets::slots_for(&lineup.preset)?;

    let outcome = match mv {
        MoveDescriptor::MoveToSlot { player, target, origin } => {
            move_to_slot(lineup, slots, player, target, origin)?
        }
        MoveDescriptor::MoveToSubSlot { player, target_index, origin } => {
            move_to_sub_slot(lineup, bench_capacity, player, *target_index, origin)?
        }
        MoveDescriptor::SwapPlayers { a, b } => swap_players(lineup, a, b),
        MoveDescriptor::DemoteToSubsGeneral { player, origin_position } => {
            demote_to_subs(lineup, bench_capacity, player, origin_position)?
        }
    };

    if let MoveOutcome::Applied(next) = &outcome {
        next.check_invariants(slots, bench_capacity)?;
        tracing::debug!(kind = mv.kind(), player = %mv.mover(), "move applied");
    }
    Ok(outcome)
}

fn verify_origin(lineup: &Lineup, player: &PlayerId, claimed: &Location) -> Result<()> {
    let actual = lineup.locate(player);
    if &actual == claimed {
        Ok(())
    } else {
        Err(FormationError::StaleOrigin {
            player: player.clone(),
            claimed: claimed.clone(),
            actual,
        })
    }
}

/// Move `player` from `origin` to `target`; whoever was at `target` goes to `origin`.
fn relocate(lineup: &Lineup, player: &PlayerId, origin: &Location, target: &Location) -> Lineup {
    let mut next = lineup.clone();
    let occupant = next.take(target);
    next.take(origin);
    next.put(target, Some(player.clone()));
    next.put(origin, occupant);
    next
}

fn move_to_slot(
    lineup: &Lineup,
    slots: &[Slot],
    player: &PlayerId,
    target: &PositionId,
    origin: &Location,
) -> Result<MoveOutcome> {
    if !slots.iter().any(|slot| &slot.position_id == target) {
        return Err(FormationError::InvalidDropTarget(format!(
            "no slot {} in preset {}",
            target, lineup.preset
        )));
    }
    verify_origin(lineup, player, origin)?;

    let target = Location::Slot(target.clone());
    if origin == &target {
        return Ok(MoveOutcome::Unchanged);
    }
    Ok(MoveOutcome::Applied(relocate(lineup, player, origin, &target)))
}

fn move_to_sub_slot(
    lineup: &Lineup,
    bench_capacity: usize,
    player: &PlayerId,
    target_index: usize,
    origin: &Location,
) -> Result<MoveOutcome> {
    if target_index >= bench_capacity {
        return Err(FormationError::InvalidDropTarget(format!(
            "bench cell {} beyond capacity {}",
            target_index, bench_capacity
        )));
    }
    verify_origin(lineup, player, origin)?;

    let target = Location::Bench(target_index);
    if origin == &target {
        return Ok(MoveOutcome::Unchanged);
    }
    Ok(MoveOutcome::Applied(relocate(lineup, player, origin, &target)))
}

fn swap_players(lineup: &Lineup, a: &PlayerId, b: &PlayerId) -> MoveOutcome {
    if a == b {
        return MoveOutcome::Unchanged;
    }
    let at_a = lineup.locate(a);
    let at_b = lineup.locate(b);
    if at_a == Location::Unassigned && at_b == Location::Unassigned {
        return MoveOutcome::Unchanged;
    }

    let mut next = lineup.clone();
    next.take(&at_a);
    next.take(&at_b);
    next.put(&at_a, Some(b.clone()));
    next.put(&at_b, Some(a.clone()));
    MoveOutcome::Applied(next)
}

fn demote_to_subs(
    lineup: &Lineup,
    bench_capacity: usize,
    player: &PlayerId,
    origin_position: &PositionId,
) -> Result<MoveOutcome> {
    let origin = Location::Slot(origin_position.clone());
    verify_origin(lineup, player, &origin)?;

    let Some(index) = lineup.open_bench_cell(bench_capacity) else {
        tracing::debug!(player = %player, capacity = bench_capacity, "bench full, demotion refused");
        return Err(FormationError::BenchFull { capacity: bench_capacity });
    };

    let mut next = lineup.clone();
    next.take(&origin);
    next.put(&Location::Bench(index), Some(player.clone()));
    Ok(MoveOutcome::Applied(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvariantViolation;

    const CAPACITY: usize = 7;

    fn pid(n: usize) -> PlayerId {
        PlayerId::new(format!("p{}", n))
    }

    /// 4-3-3 with p1..p11 in declaration order and `subs` bench players after that
    fn staffed(subs: usize) -> Lineup {
        let mut lineup = Lineup::empty("4-3-3");
        for (i, slot) in presets::slots_for("4-3-3").unwrap().iter().enumerate() {
            lineup.starters.insert(slot.position_id.clone(), pid(i + 1));
        }
        lineup.subs = (0..subs).map(|i| Some(pid(12 + i))).collect();
        lineup
    }

    fn applied(outcome: MoveOutcome) -> Lineup {
        match outcome {
            MoveOutcome::Applied(lineup) => lineup,
            MoveOutcome::Unchanged => panic!("expected the move to apply"),
        }
    }

    #[test]
    fn test_move_to_occupied_slot_swaps() {
        let lineup = staffed(0);
        // p10 is ST, p9 is LW
        let mv = MoveDescriptor::MoveToSlot {
            player: pid(9),
            target: "st".into(),
            origin: Location::Slot("lw".into()),
        };
        let next = applied(apply_move(&lineup, &mv, CAPACITY).unwrap());

        assert_eq!(next.starter_at(&"st".into()), Some(&pid(9)));
        assert_eq!(next.starter_at(&"lw".into()), Some(&pid(10)));
        assert_eq!(next.occupied_count(), lineup.occupied_count());
    }

    #[test]
    fn test_move_to_empty_slot_clears_origin() {
        let mut lineup = staffed(1);
        lineup.starters.remove(&PositionId::from("st"));

        let mv = MoveDescriptor::MoveToSlot {
            player: pid(12),
            target: "st".into(),
            origin: Location::Bench(0),
        };
        let next = applied(apply_move(&lineup, &mv, CAPACITY).unwrap());

        assert_eq!(next.starter_at(&"st".into()), Some(&pid(12)));
        assert_eq!(next.subs, vec![None]);
    }

    #[test]
    fn test_sub_dropped_on_starter_slot_swaps_with_bench() {
        let lineup = staffed(2);
        let mv = MoveDescriptor::MoveToSlot {
            player: pid(13),
            target: "gk".into(),
            origin: Location::Bench(1),
        };
        let next = applied(apply_move(&lineup, &mv, CAPACITY).unwrap());

        assert_eq!(next.starter_at(&"gk".into()), Some(&pid(13)));
        assert_eq!(next.sub_at(1), Some(&pid(1)));
    }

    #[test]
    fn test_drop_on_own_slot_is_noop() {
        let lineup = staffed(0);
        let mv = MoveDescriptor::MoveToSlot {
            player: pid(10),
            target: "st".into(),
            origin: Location::Slot("st".into()),
        };
        assert_eq!(apply_move(&lineup, &mv, CAPACITY).unwrap(), MoveOutcome::Unchanged);
    }

    #[test]
    fn test_unknown_slot_is_invalid_target() {
        let lineup = staffed(0);
        let mv = MoveDescriptor::MoveToSlot {
            player: pid(10),
            target: "rwb".into(),
            origin: Location::Slot("st".into()),
        };
        let err = apply_move(&lineup, &mv, CAPACITY).unwrap_err();
        assert!(matches!(err, FormationError::InvalidDropTarget(_)));
        assert!(err.is_silent());
    }

    #[test]
    fn test_stale_origin_rejected() {
        let lineup = staffed(0);
        let mv = MoveDescriptor::MoveToSlot {
            player: pid(10),
            target: "lw".into(),
            origin: Location::Slot("rw".into()),
        };
        match apply_move(&lineup, &mv, CAPACITY) {
            Err(FormationError::StaleOrigin { actual, .. }) => {
                assert_eq!(actual, Location::Slot("st".into()))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_move_to_sub_slot_grows_bench() {
        let lineup = staffed(1);
        let mv = MoveDescriptor::MoveToSubSlot {
            player: pid(11),
            target_index: 3,
            origin: Location::Slot("rw".into()),
        };
        let next = applied(apply_move(&lineup, &mv, CAPACITY).unwrap());

        assert_eq!(next.subs, vec![Some(pid(12)), None, None, Some(pid(11))]);
        assert_eq!(next.starter_at(&"rw".into()), None);
    }

    #[test]
    fn test_starter_onto_occupied_bench_cell_swaps() {
        let lineup = staffed(2);
        let mv = MoveDescriptor::MoveToSubSlot {
            player: pid(10),
            target_index: 0,
            origin: Location::Slot("st".into()),
        };
        let next = applied(apply_move(&lineup, &mv, CAPACITY).unwrap());

        assert_eq!(next.sub_at(0), Some(&pid(10)));
        assert_eq!(next.starter_at(&"st".into()), Some(&pid(12)));
    }

    #[test]
    fn test_sub_slot_beyond_capacity_rejected() {
        let lineup = staffed(0);
        let mv = MoveDescriptor::MoveToSubSlot {
            player: pid(10),
            target_index: CAPACITY,
            origin: Location::Slot("st".into()),
        };
        assert!(matches!(
            apply_move(&lineup, &mv, CAPACITY),
            Err(FormationError::InvalidDropTarget(_))
        ));
    }

    #[test]
    fn test_bench_reorder_within_bench() {
        let lineup = staffed(3);
        let mv = MoveDescriptor::MoveToSubSlot {
            player: pid(12),
            target_index: 2,
            origin: Location::Bench(0),
        };
        let next = applied(apply_move(&lineup, &mv, CAPACITY).unwrap());
        assert_eq!(next.subs, vec![Some(pid(14)), Some(pid(13)), Some(pid(12))]);
    }

    #[test]
    fn test_drop_on_own_bench_cell_is_noop() {
        let lineup = staffed(3);
        let mv = MoveDescriptor::MoveToSubSlot {
            player: pid(13),
            target_index: 1,
            origin: Location::Bench(1),
        };
        assert_eq!(apply_move(&lineup, &mv, CAPACITY).unwrap(), MoveOutcome::Unchanged);
    }

    #[test]
    fn test_unassigned_player_into_occupied_slot_sends_occupant_to_pool() {
        let lineup = staffed(0);
        let mv = MoveDescriptor::MoveToSlot {
            player: pid(30),
            target: "st".into(),
            origin: Location::Unassigned,
        };
        let next = applied(apply_move(&lineup, &mv, CAPACITY).unwrap());
        assert_eq!(next.starter_at(&"st".into()), Some(&pid(30)));
        assert!(!next.contains(&pid(10)));
    }

    #[test]
    fn test_swap_starter_and_sub() {
        let lineup = staffed(2);
        let mv = MoveDescriptor::SwapPlayers { a: pid(13), b: pid(4) };
        let next = applied(apply_move(&lineup, &mv, CAPACITY).unwrap());

        assert_eq!(next.starter_at(&"rcb".into()), Some(&pid(13)));
        assert_eq!(next.sub_at(1), Some(&pid(4)));
    }

    #[test]
    fn test_swap_is_its_own_inverse() {
        let lineup = staffed(3);
        let mv = MoveDescriptor::SwapPlayers { a: pid(2), b: pid(14) };
        let once = applied(apply_move(&lineup, &mv, CAPACITY).unwrap());
        let twice = applied(apply_move(&once, &mv, CAPACITY).unwrap());
        assert_eq!(twice, lineup);
    }

    #[test]
    fn test_swap_with_self_is_noop() {
        let lineup = staffed(0);
        let mv = MoveDescriptor::SwapPlayers { a: pid(3), b: pid(3) };
        assert_eq!(apply_move(&lineup, &mv, CAPACITY).unwrap(), MoveOutcome::Unchanged);
    }

    #[test]
    fn test_demote_fills_first_gap() {
        let mut lineup = staffed(3);
        lineup.subs[1] = None;
        let mv = MoveDescriptor::DemoteToSubsGeneral { player: pid(6), origin_position: "lcm".into() };
        let next = applied(apply_move(&lineup, &mv, CAPACITY).unwrap());

        assert_eq!(next.sub_at(1), Some(&pid(6)));
        assert_eq!(next.starter_at(&"lcm".into()), None);
        assert_eq!(next.subs.len(), 3);
    }

    #[test]
    fn test_demote_appends_when_no_gap() {
        let lineup = staffed(2);
        let mv = MoveDescriptor::DemoteToSubsGeneral { player: pid(6), origin_position: "lcm".into() };
        let next = applied(apply_move(&lineup, &mv, CAPACITY).unwrap());
        assert_eq!(next.sub_at(2), Some(&pid(6)));
    }

    #[test]
    fn test_demote_onto_full_bench_rejected() {
        let lineup = staffed(CAPACITY);
        let mv = MoveDescriptor::DemoteToSubsGeneral { player: pid(10), origin_position: "st".into() };

        let err = apply_move(&lineup, &mv, CAPACITY).unwrap_err();
        assert!(matches!(err, FormationError::BenchFull { capacity: CAPACITY }));
        assert_eq!(err.notice(), Some("Bench is full"));
        assert_eq!(lineup.starter_at(&"st".into()), Some(&pid(10)));
    }

    #[test]
    fn test_lineup_over_capacity_fails_closed() {
        // A bench that is already too long cannot be "fixed" by a move.
        let lineup = staffed(CAPACITY + 1);
        let mv = MoveDescriptor::SwapPlayers { a: pid(1), b: pid(2) };
        assert!(matches!(
            apply_move(&lineup, &mv, CAPACITY),
            Err(FormationError::InvariantViolation(InvariantViolation::BenchOverCapacity { .. }))
        ));
    }

    mod properties {
        use super::*;
        use crate::store::remap_to_preset;
        use proptest::prelude::*;
        use std::collections::BTreeSet;

        const ROSTER: usize = 20;

        /// Turn raw numbers into a move whose origin matches the current lineup
        fn build_move(lineup: &Lineup, kind: u8, who: usize, other: usize, cell: usize) -> MoveDescriptor {
            let slots = presets::slots_for(&lineup.preset).unwrap();
            let player = pid(who % ROSTER + 1);
            let origin = lineup.locate(&player);
            match kind % 4 {
                0 => MoveDescriptor::MoveToSlot {
                    player,
                    target: slots[cell % slots.len()].position_id.clone(),
                    origin,
                },
                1 => MoveDescriptor::MoveToSubSlot { player, target_index: cell % (CAPACITY + 1), origin },
                2 => MoveDescriptor::SwapPlayers { a: player, b: pid(other % ROSTER + 1) },
                _ => match origin {
                    Location::Slot(origin_position) => {
                        MoveDescriptor::DemoteToSubsGeneral { player, origin_position }
                    }
                    _ => MoveDescriptor::SwapPlayers { a: player, b: pid(other % ROSTER + 1) },
                },
            }
        }

        fn everyone(lineup: &Lineup, pool: &BTreeSet<PlayerId>) -> BTreeSet<PlayerId> {
            lineup.assigned_players().cloned().chain(pool.iter().cloned()).collect()
        }

        proptest! {
            /// Property: no sequence of moves places a player twice or loses one
            #[test]
            fn prop_moves_preserve_invariants(
                steps in prop::collection::vec((0u8..4, 0usize..40, 0usize..40, 0usize..16), 1..40)
            ) {
                let slots = presets::slots_for("4-3-3").unwrap();
                let mut lineup = staffed(5);
                let mut pool: BTreeSet<PlayerId> = (17..=ROSTER).map(pid).collect();
                let roster = everyone(&lineup, &pool);

                for (kind, who, other, cell) in steps {
                    let mv = build_move(&lineup, kind, who, other, cell);
                    if let Ok(MoveOutcome::Applied(next)) = apply_move(&lineup, &mv, CAPACITY) {
                        lineup = next;
                        pool = roster.iter().filter(|p| !lineup.contains(p)).cloned().collect();
                    }
                    prop_assert!(lineup.check_invariants(slots, CAPACITY).is_ok());
                    prop_assert_eq!(everyone(&lineup, &pool), roster.clone());
                }
            }

            /// Property: preset switches mixed into move sequences keep every player placed once
            #[test]
            fn prop_moves_and_preset_changes_preserve_invariants(
                steps in prop::collection::vec((0u8..5, 0usize..40, 0usize..40, 0usize..16), 1..40)
            ) {
                let names = presets::preset_names();
                let mut lineup = staffed(5);
                let mut pool: BTreeSet<PlayerId> = (17..=ROSTER).map(pid).collect();
                let roster = everyone(&lineup, &pool);

                for (kind, who, other, cell) in steps {
                    if kind == 4 {
                        let target = presets::preset(names[who % names.len()]).unwrap();
                        lineup = remap_to_preset(&lineup, target, CAPACITY).unwrap().lineup;
                    } else {
                        let mv = build_move(&lineup, kind, who, other, cell);
                        if let Ok(MoveOutcome::Applied(next)) = apply_move(&lineup, &mv, CAPACITY) {
                            lineup = next;
                        }
                    }
                    pool = roster.iter().filter(|p| !lineup.contains(p)).cloned().collect();

                    let slots = presets::slots_for(&lineup.preset).unwrap();
                    prop_assert!(lineup.check_invariants(slots, CAPACITY).is_ok());
                    prop_assert_eq!(everyone(&lineup, &pool), roster.clone());
                }
            }

            /// Property: swapping two placed players and swapping back restores the lineup
            #[test]
            fn prop_swap_reversible(a in 1usize..=16, b in 1usize..=16) {
                let lineup = staffed(5);
                let mv = MoveDescriptor::SwapPlayers { a: pid(a), b: pid(b) };
                let once = match apply_move(&lineup, &mv, CAPACITY).unwrap() {
                    MoveOutcome::Applied(next) => next,
                    MoveOutcome::Unchanged => lineup.clone(),
                };
                let back = MoveDescriptor::SwapPlayers { a: pid(b), b: pid(a) };
                let twice = match apply_move(&once, &back, CAPACITY).unwrap() {
                    MoveOutcome::Applied(next) => next,
                    MoveOutcome::Unchanged => once.clone(),
                };
                prop_assert_eq!(twice, lineup);
            }

            /// Property: a displacing slot move is undone by moving back
            #[test]
            fn prop_slot_move_reversible(from in 0usize..11, to in 0usize..11) {
                let slots = presets::slots_for("4-3-3").unwrap();
                let lineup = staffed(0);
                let from_id = slots[from].position_id.clone();
                let to_id = slots[to].position_id.clone();
                let mover = lineup.starter_at(&from_id).cloned().unwrap();

                let forward = MoveDescriptor::MoveToSlot {
                    player: mover.clone(),
                    target: to_id.clone(),
                    origin: Location::Slot(from_id.clone()),
                };
                let moved = match apply_move(&lineup, &forward, CAPACITY).unwrap() {
                    MoveOutcome::Applied(next) => next,
                    MoveOutcome::Unchanged => lineup.clone(),
                };
                let backward = MoveDescriptor::MoveToSlot {
                    player: mover,
                    target: from_id,
                    origin: Location::Slot(to_id),
                };
                let restored = match apply_move(&moved, &backward, CAPACITY).unwrap() {
                    MoveOutcome::Applied(next) => next,
                    MoveOutcome::Unchanged => moved.clone(),
                };
                prop_assert_eq!(restored, lineup);
            }
        }
    }
}
