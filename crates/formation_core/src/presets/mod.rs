//! Preset catalog
//!
//! Named formation layouts, each an ordered list of slots. Declaration order
//! matters: placeholder seeding and preset switching both walk slots in this
//! order. The catalog is built once per process and never mutated.

mod layouts;

use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{FormationError, Result};
use crate::models::PositionId;

/// Preset used when nothing else is configured or a saved preset is unknown
pub const DEFAULT_PRESET: &str = "4-3-3";

/// A coordinate-bearing position a starter may occupy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Slot {
    pub position_id: PositionId,
    /// Short label shown on the pitch ("ST", "LCB")
    pub label: String,
    /// 0 = own goal line, 100 = opponent goal line
    pub x_norm: f32,
    /// 0 = left touchline, 100 = right touchline
    pub y_norm: f32,
}

impl Slot {
    pub fn new(position_id: &str, label: &str, x_norm: f32, y_norm: f32) -> Self {
        Self { position_id: position_id.into(), label: label.to_string(), x_norm, y_norm }
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.label == "GK"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Preset {
    pub name: String,
    pub slots: Vec<Slot>,
}

impl Preset {
    pub fn new(name: &str, slots: Vec<Slot>) -> Self {
        Self { name: name.to_string(), slots }
    }

    pub fn slot(&self, position: &PositionId) -> Option<&Slot> {
        self.slots.iter().find(|slot| &slot.position_id == position)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

static CATALOG: Lazy<Vec<Preset>> = Lazy::new(|| {
    vec![
        layouts::t433(),
        layouts::t442(),
        layouts::t4231(),
        layouts::t4141(),
        layouts::t352(),
        layouts::t343(),
        layouts::t532(),
        layouts::t441(),
        layouts::t231(),
    ]
});

/// All preset names, in catalog order
pub fn preset_names() -> Vec<&'static str> {
    CATALOG.iter().map(|preset| preset.name.as_str()).collect()
}

pub fn all_presets() -> &'static [Preset] {
    &CATALOG
}

pub fn preset(name: &str) -> Result<&'static Preset> {
    CATALOG.iter().find(|preset| preset.name == name).ok_or_else(|| {
        tracing::error!(preset = name, "unknown formation preset");
        FormationError::UnknownPreset(name.to_string())
    })
}

pub fn slots_for(name: &str) -> Result<&'static [Slot]> {
    preset(name).map(|preset| preset.slots.as_slice())
}

pub fn is_known(name: &str) -> bool {
    CATALOG.iter().any(|preset| preset.name == name)
}
