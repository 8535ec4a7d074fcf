//! Labware, labware definitions and locations

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::{DeckError, DeckResult, ModuleId, ModuleKind, SlotId};

/// Custom labware definition document
///
/// The schema belongs to the robot platform. The document is kept whole and
/// only a couple of descriptive fields are read back out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabwareDefinition(serde_json::Value);

impl LabwareDefinition {
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Read and parse a definition file
    pub fn from_file(path: &Path) -> DeckResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DeckError::DefinitionLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let value = serde_json::from_str(&content).map_err(|e| DeckError::DefinitionLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self(value))
    }

    /// `parameters.loadName`, if present
    pub fn load_name(&self) -> Option<&str> {
        self.0.pointer("/parameters/loadName")?.as_str()
    }

    /// `metadata.displayName`, if present
    pub fn display_name(&self) -> Option<&str> {
        self.0.pointer("/metadata/displayName")?.as_str()
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Unique identifier for a piece of labware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabwareId(Uuid);

impl LabwareId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LabwareId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LabwareId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a labware type comes from
#[derive(Debug, Clone, PartialEq)]
pub enum LabwareSource {
    /// Built-in labware, referenced by API load name
    Catalog { load_name: String },
    /// Custom labware read from a JSON definition file
    Definition {
        path: PathBuf,
        definition: Arc<LabwareDefinition>,
    },
}

impl LabwareSource {
    /// Type name of the labware
    ///
    /// Custom definitions fall back to the file stem when they carry no
    /// load name.
    pub fn load_name(&self) -> &str {
        match self {
            LabwareSource::Catalog { load_name } => load_name,
            LabwareSource::Definition { path, definition } => definition
                .load_name()
                .or_else(|| path.file_stem().and_then(|s| s.to_str()))
                .unwrap_or("custom_labware"),
        }
    }

    pub fn definition(&self) -> Option<&LabwareDefinition> {
        match self {
            LabwareSource::Catalog { .. } => None,
            LabwareSource::Definition { definition, .. } => Some(definition),
        }
    }
}

/// Physical location of labware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Directly on a deck slot
    Slot(SlotId),
    /// In the bay of a module anchored at `slot`
    Module {
        module: ModuleId,
        kind: ModuleKind,
        slot: SlotId,
    },
}

impl Location {
    /// Deck slot underneath the labware
    pub fn slot(&self) -> SlotId {
        match self {
            Location::Slot(slot) => *slot,
            Location::Module { slot, .. } => *slot,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Slot(slot) => write!(f, "{}", slot),
            Location::Module { kind, slot, .. } => write!(f, "{} on {}", kind, slot),
        }
    }
}

/// A loaded piece of labware
#[derive(Debug, Clone, PartialEq)]
pub struct Labware {
    pub id: LabwareId,
    pub source: LabwareSource,
    pub location: Location,
    /// Human-readable name given at load time
    pub label: Option<String>,
}

impl Labware {
    pub fn new(source: LabwareSource, location: Location, label: Option<String>) -> Self {
        Self {
            id: LabwareId::new(),
            source,
            location,
            label,
        }
    }

    pub fn load_name(&self) -> &str {
        self.source.load_name()
    }

    pub fn definition(&self) -> Option<&LabwareDefinition> {
        self.source.definition()
    }
}

impl std::fmt::Display for Labware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.label.as_deref().unwrap_or_else(|| self.load_name());
        write!(f, "{} on {}", name, self.location)
    }
}
