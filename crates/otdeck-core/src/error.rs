//! Error types for otdeck

use std::path::PathBuf;
use thiserror::Error;

use crate::SlotId;

/// Main error type for otdeck
#[derive(Error, Debug)]
pub enum DeckError {
    /// Every allocatable slot is taken
    #[error("Capacity exhausted: {0}")]
    CapacityExhausted(String),

    /// Labware definition file missing or malformed
    #[error("Failed to load labware definition {}: {reason}", path.display())]
    DefinitionLoad { path: PathBuf, reason: String },

    /// Slot already holds labware, a module or the trash
    #[error("Slot {slot} is already occupied by {occupant}")]
    SlotOccupied { slot: SlotId, occupant: String },

    /// Slot outside the deck
    #[error("Invalid slot: {0}")]
    InvalidSlot(String),

    /// Module bay already holds labware
    #[error("{0} already has labware loaded")]
    ModuleOccupied(String),

    /// Module not found
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    /// Module load name not recognized
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for otdeck operations
pub type DeckResult<T> = Result<T, DeckError>;

impl From<toml::de::Error> for DeckError {
    fn from(err: toml::de::Error) -> Self {
        DeckError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeckError::CapacityExhausted("No deck slots remaining".to_string());
        assert_eq!(err.to_string(), "Capacity exhausted: No deck slots remaining");

        let err = DeckError::SlotOccupied {
            slot: SlotId::new(3),
            occupant: "Fixed Trash".to_string(),
        };
        assert_eq!(err.to_string(), "Slot 3 is already occupied by Fixed Trash");
    }

    #[test]
    fn test_definition_load_display() {
        let err = DeckError::DefinitionLoad {
            path: PathBuf::from("labware/rack.json"),
            reason: "file not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to load labware definition labware/rack.json: file not found"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DeckError = io_err.into();
        assert!(matches!(err, DeckError::Io(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let err: DeckError = toml::from_str::<toml::Value>("slot_count = ")
            .unwrap_err()
            .into();
        assert!(matches!(err, DeckError::Config(_)));
    }
}
