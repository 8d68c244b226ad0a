//! Wire shape of a saved formation
//!
//! This is what the formation repository stores per team:
//! slot → player map plus an ordered bench of player-or-null.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::{PlayerId, PositionId};
use super::lineup::Lineup;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PersistedFormation {
    /// Preset name, e.g. `"4-3-3"`
    pub preset: String,
    #[serde(default)]
    pub starters: BTreeMap<PositionId, PlayerId>,
    #[serde(default)]
    pub subs: Vec<Option<PlayerId>>,
    /// Set by the client when the snapshot was taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl PersistedFormation {
    pub fn from_lineup(lineup: &Lineup, saved_at: DateTime<Utc>) -> Self {
        Self {
            preset: lineup.preset.clone(),
            starters: lineup.starters.clone(),
            subs: lineup.subs.clone(),
            saved_at: Some(saved_at),
        }
    }

    /// Raw lineup, not yet checked against the catalog
    pub fn to_lineup(&self) -> Lineup {
        Lineup { preset: self.preset.clone(), starters: self.starters.clone(), subs: self.subs.clone() }
    }

    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PersistedFormation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PersistedFormation {
        let mut lineup = Lineup::empty("4-3-3");
        lineup.starters.insert("gk".into(), "keeper".into());
        lineup.starters.insert("st".into(), "nine".into());
        lineup.subs = vec![Some("bench-1".into()), None];
        let mut persisted = PersistedFormation::from_lineup(&lineup, Utc::now());
        persisted.saved_at = None;
        persisted
    }

    #[test]
    fn test_persisted_json_shape() {
        insta::assert_json_snapshot!(sample(), @r###"
        {
          "preset": "4-3-3",
          "starters": {
            "gk": "keeper",
            "st": "nine"
          },
          "subs": [
            "bench-1",
            null
          ]
        }
        "###);
    }

    #[test]
    fn test_persisted_json_matches_schema() {
        let schema = serde_json::to_value(PersistedFormation::json_schema()).unwrap();
        let compiled = jsonschema::JSONSchema::compile(&schema).unwrap();

        let mut with_time = sample();
        with_time.saved_at = Some(Utc::now());
        let instance = serde_json::to_value(&with_time).unwrap();
        assert!(compiled.is_valid(&instance));

        let bad = serde_json::json!({ "preset": "4-3-3", "subs": [42] });
        assert!(!compiled.is_valid(&bad));
    }

    #[test]
    fn test_missing_fields_default() {
        let parsed: PersistedFormation = serde_json::from_str(r#"{"preset":"4-4-2"}"#).unwrap();
        assert!(parsed.starters.is_empty());
        assert!(parsed.subs.is_empty());
        assert_eq!(parsed.saved_at, None);
    }
}
