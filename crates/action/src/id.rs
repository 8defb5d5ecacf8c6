//! Identity of a crafted action.
//!
//! Every [`CraftedAction`](crate::CraftedAction) receives one random
//! [`ActionId`] when it is built. The id is stamped on every result the
//! action produces and is never taken from handler or caller data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, randomly generated action identity (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(Uuid);

impl ActionId {
    /// Generates a fresh random id.
    pub fn v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an id from its hyphenated string form.
    ///
    /// # Errors
    ///
    /// Returns the UUID parse error for malformed input.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ActionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v4_ids_are_distinct_and_non_nil() {
        let a = ActionId::v4();
        let b = ActionId::v4();
        assert_ne!(a, b);
        assert!(!a.as_uuid().is_nil());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let id = ActionId::v4();
        assert_eq!(id.to_string().parse::<ActionId>().unwrap(), id);
        assert!(ActionId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ActionId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            serde_json::to_value(id).unwrap(),
            serde_json::json!("550e8400-e29b-41d4-a716-446655440000")
        );
    }
}
