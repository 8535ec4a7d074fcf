//! Deck slot identifiers

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::DeckError;

/// A numbered deck position, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(u8);

impl SlotId {
    /// Create a slot id from its deck number
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// The deck number of this slot
    pub fn number(self) -> u8 {
        self.0
    }
}

impl From<u8> for SlotId {
    fn from(number: u8) -> Self {
        Self(number)
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SlotId {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u8>() {
            Ok(0) | Err(_) => Err(DeckError::InvalidSlot(format!(
                "'{}' is not a deck slot number",
                s
            ))),
            Ok(n) => Ok(Self(n)),
        }
    }
}
