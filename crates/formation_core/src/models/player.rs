use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ids::PlayerId;

/// Read-only view of a roster player.
///
/// The board never mutates these; it only places their ids into slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
    /// Jersey number, if the roster assigns one
    #[serde(default)]
    pub jersey: Option<u8>,
    /// Free-form position tag shown on the chip ("GK", "CB", ...)
    #[serde(default)]
    pub position: String,
}

impl PlayerRef {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), jersey: None, position: String::new() }
    }

    pub fn with_jersey(mut self, jersey: u8) -> Self {
        self.jersey = Some(jersey);
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = position.into();
        self
    }

    /// Short text for a pitch chip: jersey number when known, otherwise initials
    pub fn chip_label(&self) -> String {
        match self.jersey {
            Some(number) => number.to_string(),
            None => self
                .name
                .split_whitespace()
                .filter_map(|part| part.chars().next())
                .take(2)
                .collect::<String>()
                .to_uppercase(),
        }
    }
}
