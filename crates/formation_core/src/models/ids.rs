//! Identifier newtypes
//!
//! Players, teams and slots are all referenced by opaque strings owned by other
//! systems. Wrapping them keeps a `PlayerId` from being passed where a
//! `PositionId` is expected.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Roster player reference, owned by the roster collaborator
    PlayerId
);

string_id!(
    /// Team whose board is open
    TeamId
);

string_id!(
    /// Stable slot identifier, unique within one preset (e.g. `"lcb"`)
    PositionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = PlayerId::new("p-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p-7\"");

        let back: PositionId = serde_json::from_str("\"st\"").unwrap();
        assert_eq!(back.as_str(), "st");
    }
}
