// Built-in formation layouts
//
// Coordinates are 0-100 on both axes, drawn for a landscape pitch:
// x runs from the own goal line (0) to the opponent goal line (100),
// y runs from the left touchline (0) to the right touchline (100)
// as seen by the team attacking to the right.

use super::{Preset, Slot};

fn slot(id: &str, label: &str, x: f32, y: f32) -> Slot {
    Slot::new(id, label, x, y)
}

fn back_four() -> Vec<Slot> {
    vec![
        slot("gk", "GK", 5.0, 50.0),
        slot("lb", "LB", 22.0, 15.0),
        slot("lcb", "LCB", 20.0, 38.0),
        slot("rcb", "RCB", 20.0, 62.0),
        slot("rb", "RB", 22.0, 85.0),
    ]
}

fn back_three() -> Vec<Slot> {
    vec![
        slot("gk", "GK", 5.0, 50.0),
        slot("lcb", "LCB", 20.0, 28.0),
        slot("cb", "CB", 18.0, 50.0),
        slot("rcb", "RCB", 20.0, 72.0),
    ]
}

fn with(mut base: Vec<Slot>, rest: Vec<Slot>) -> Vec<Slot> {
    base.extend(rest);
    base
}

/// 4-3-3 (default)
pub(super) fn t433() -> Preset {
    Preset::new(
        "4-3-3",
        with(
            back_four(),
            vec![
                slot("lcm", "LCM", 45.0, 30.0),
                slot("cm", "CM", 40.0, 50.0),
                slot("rcm", "RCM", 45.0, 70.0),
                slot("lw", "LW", 72.0, 18.0),
                slot("st", "ST", 80.0, 50.0),
                slot("rw", "RW", 72.0, 82.0),
            ],
        ),
    )
}

/// 4-4-2 (flat)
pub(super) fn t442() -> Preset {
    Preset::new(
        "4-4-2",
        with(
            back_four(),
            vec![
                slot("lm", "LM", 48.0, 15.0),
                slot("lcm", "LCM", 45.0, 38.0),
                slot("rcm", "RCM", 45.0, 62.0),
                slot("rm", "RM", 48.0, 85.0),
                slot("ls", "LS", 78.0, 40.0),
                slot("rs", "RS", 78.0, 60.0),
            ],
        ),
    )
}

/// 4-2-3-1 (double pivot)
pub(super) fn t4231() -> Preset {
    Preset::new(
        "4-2-3-1",
        with(
            back_four(),
            vec![
                slot("ldm", "LDM", 38.0, 40.0),
                slot("rdm", "RDM", 38.0, 60.0),
                slot("lam", "LAM", 60.0, 20.0),
                slot("cam", "CAM", 62.0, 50.0),
                slot("ram", "RAM", 60.0, 80.0),
                slot("st", "ST", 82.0, 50.0),
            ],
        ),
    )
}

/// 4-1-4-1 (single holding midfielder)
pub(super) fn t4141() -> Preset {
    Preset::new(
        "4-1-4-1",
        with(
            back_four(),
            vec![
                slot("dm", "DM", 35.0, 50.0),
                slot("lm", "LM", 55.0, 15.0),
                slot("lcm", "LCM", 52.0, 38.0),
                slot("rcm", "RCM", 52.0, 62.0),
                slot("rm", "RM", 55.0, 85.0),
                slot("st", "ST", 82.0, 50.0),
            ],
        ),
    )
}

/// 3-5-2 (wing-backs)
pub(super) fn t352() -> Preset {
    Preset::new(
        "3-5-2",
        with(
            back_three(),
            vec![
                slot("lwb", "LWB", 45.0, 10.0),
                slot("lcm", "LCM", 45.0, 35.0),
                slot("cm", "CM", 38.0, 50.0),
                slot("rcm", "RCM", 45.0, 65.0),
                slot("rwb", "RWB", 45.0, 90.0),
                slot("ls", "LS", 78.0, 40.0),
                slot("rs", "RS", 78.0, 60.0),
            ],
        ),
    )
}

/// 3-4-3
pub(super) fn t343() -> Preset {
    Preset::new(
        "3-4-3",
        with(
            back_three(),
            vec![
                slot("lwb", "LWB", 48.0, 12.0),
                slot("lcm", "LCM", 45.0, 38.0),
                slot("rcm", "RCM", 45.0, 62.0),
                slot("rwb", "RWB", 48.0, 88.0),
                slot("lw", "LW", 75.0, 20.0),
                slot("st", "ST", 82.0, 50.0),
                slot("rw", "RW", 75.0, 80.0),
            ],
        ),
    )
}

/// 5-3-2
pub(super) fn t532() -> Preset {
    Preset::new(
        "5-3-2",
        vec![
            slot("gk", "GK", 5.0, 50.0),
            slot("lwb", "LWB", 28.0, 10.0),
            slot("lcb", "LCB", 18.0, 30.0),
            slot("cb", "CB", 16.0, 50.0),
            slot("rcb", "RCB", 18.0, 70.0),
            slot("rwb", "RWB", 28.0, 90.0),
            slot("lcm", "LCM", 45.0, 30.0),
            slot("cm", "CM", 42.0, 50.0),
            slot("rcm", "RCM", 45.0, 70.0),
            slot("ls", "LS", 78.0, 40.0),
            slot("rs", "RS", 78.0, 60.0),
        ],
    )
}

/// 4-4-1 (down to ten)
pub(super) fn t441() -> Preset {
    Preset::new(
        "4-4-1",
        with(
            back_four(),
            vec![
                slot("lm", "LM", 48.0, 15.0),
                slot("lcm", "LCM", 45.0, 38.0),
                slot("rcm", "RCM", 45.0, 62.0),
                slot("rm", "RM", 48.0, 85.0),
                slot("st", "ST", 78.0, 50.0),
            ],
        ),
    )
}

/// 2-3-1 (seven-a-side)
pub(super) fn t231() -> Preset {
    Preset::new(
        "2-3-1",
        vec![
            slot("gk", "GK", 6.0, 50.0),
            slot("lcb", "LCB", 25.0, 32.0),
            slot("rcb", "RCB", 25.0, 68.0),
            slot("lm", "LM", 50.0, 18.0),
            slot("cm", "CM", 48.0, 50.0),
            slot("rm", "RM", 50.0, 82.0),
            slot("st", "ST", 78.0, 50.0),
        ],
    )
}
