//! Setup manifests
//!
//! A manifest lists the modules and labware a protocol loads before any liquid
//! handling starts:
//!
//! ```toml
//! [metadata]
//! protocol_name = "PCR Example"
//!
//! [[modules]]
//! name = "thermocycler"
//! kind = "Thermocycler Module"
//!
//! [[labware]]
//! definition = "labware/3dprinted_24_tuberack_1500ul.json"
//! label = "DNA and Primers"
//! ```

use otdeck_core::{DeckError, DeckResult, ModuleId, SlotId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{ProtocolContext, ProtocolMetadata};

/// Module to load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleEntry {
    /// Name labware entries use to refer to this module
    pub name: String,
    /// API load name, e.g. "temperature module gen2"
    pub kind: String,
    pub slot: Option<SlotId>,
}

/// Labware to load
///
/// Exactly one of `load_name` and `definition` must be set. `module` puts the
/// labware in that module's bay instead of on a deck slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabwareEntry {
    pub load_name: Option<String>,
    pub definition: Option<PathBuf>,
    pub slot: Option<SlotId>,
    pub module: Option<String>,
    pub label: Option<String>,
}

/// Protocol setup manifest (TOML)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupManifest {
    #[serde(default)]
    pub metadata: ProtocolMetadata,
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
    #[serde(default)]
    pub labware: Vec<LabwareEntry>,
    /// Directory relative definition paths are resolved against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl SetupManifest {
    /// Load a manifest from a TOML file
    pub fn from_file(path: &Path) -> DeckResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut manifest = Self::parse(&content)?;
        manifest.base_dir = path.parent().map(Path::to_path_buf);
        Ok(manifest)
    }

    /// Parse and validate a TOML manifest
    pub fn parse(content: &str) -> DeckResult<Self> {
        let manifest: SetupManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> DeckResult<()> {
        let mut names = std::collections::HashSet::new();
        for module in &self.modules {
            if !names.insert(module.name.as_str()) {
                return Err(DeckError::Config(format!(
                    "Duplicate module name '{}'",
                    module.name
                )));
            }
        }

        for (index, entry) in self.labware.iter().enumerate() {
            match (&entry.load_name, &entry.definition) {
                (Some(_), Some(_)) | (None, None) => {
                    return Err(DeckError::Config(format!(
                        "Labware entry {} needs exactly one of load_name or definition",
                        index + 1
                    )));
                }
                _ => {}
            }
            if entry.module.is_some() && entry.slot.is_some() {
                return Err(DeckError::Config(format!(
                    "Labware entry {} sets both module and slot",
                    index + 1
                )));
            }
            if entry.load_name.is_some() && entry.module.is_none() && entry.slot.is_none() {
                return Err(DeckError::Config(format!(
                    "Labware entry {} loads catalog labware on the deck without a slot",
                    index + 1
                )));
            }
        }

        Ok(())
    }

    /// Resolve a definition path against the manifest directory
    pub fn resolve_definition(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ProtocolContext {
    /// Apply a manifest: modules first, then labware, in file order
    ///
    /// Stops at the first failing entry.
    pub fn run_manifest(&mut self, manifest: &SetupManifest) -> DeckResult<()> {
        let mut modules: HashMap<&str, ModuleId> = HashMap::new();

        for entry in &manifest.modules {
            let id = self.load_module(&entry.kind, entry.slot)?;
            modules.insert(entry.name.as_str(), id);
        }

        for entry in &manifest.labware {
            let module = match &entry.module {
                Some(name) => Some(
                    *modules
                        .get(name.as_str())
                        .ok_or_else(|| DeckError::ModuleNotFound(name.clone()))?,
                ),
                None => None,
            };

            let labware = match (&entry.definition, &entry.load_name, module) {
                (Some(path), _, Some(module)) => self.load_custom_labware_on_module(
                    module,
                    manifest.resolve_definition(path),
                    entry.label.clone(),
                )?,
                (Some(path), _, None) => self.load_custom_labware(
                    manifest.resolve_definition(path),
                    entry.slot,
                    entry.label.clone(),
                )?,
                (None, Some(load_name), Some(module)) => {
                    self.load_labware_on_module(module, load_name, entry.label.clone())?
                }
                (None, Some(load_name), None) => {
                    let slot = entry.slot.ok_or_else(|| {
                        DeckError::Config(format!("{} needs a deck slot", load_name))
                    })?;
                    self.load_labware(load_name, slot, entry.label.clone())?
                }
                (None, None, _) => {
                    return Err(DeckError::Config(
                        "Labware entry has neither load_name nor definition".to_string(),
                    ))
                }
            };

            debug!(labware = %labware, "Manifest entry applied");
        }

        info!(
            protocol = %self.metadata().display_name(),
            modules = manifest.modules.len(),
            labware = manifest.labware.len(),
            "Protocol setup complete"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otdeck_core::{DeckLayout, Location, ModuleKind, Occupant};
    use std::fs;

    const PCR_MANIFEST: &str = r#"
[metadata]
protocol_name = "PCR Example"
author = "Bradley Brown"
api_level = "2.11"

[[modules]]
name = "temp"
kind = "temperature module gen2"
slot = 4

[[modules]]
name = "thermocycler"
kind = "Thermocycler Module"

[[labware]]
load_name = "opentrons_96_tiprack_20ul"
slot = 1

[[labware]]
load_name = "opentrons_96_tiprack_300ul"
slot = 2

[[labware]]
load_name = "opentrons_24_aluminumblock_nest_1.5ml_snapcap"
module = "temp"
label = "Reagents"

[[labware]]
definition = "labware/3dprinted_24_tuberack_1500ul.json"
label = "DNA and Primers"

[[labware]]
load_name = "nest_96_wellplate_100ul_pcr_full_skirt"
module = "thermocycler"
label = "PCR Reactions"
"#;

    fn write_manifest(dir: &Path) -> PathBuf {
        fs::create_dir_all(dir.join("labware")).unwrap();
        fs::write(
            dir.join("labware/3dprinted_24_tuberack_1500ul.json"),
            r#"{"parameters": {"loadName": "3dprinted_24_tuberack_1500ul"}}"#,
        )
        .unwrap();
        let path = dir.join("setup.toml");
        fs::write(&path, PCR_MANIFEST).unwrap();
        path
    }

    #[test]
    fn test_manifest_parse() {
        let manifest = SetupManifest::parse(PCR_MANIFEST).unwrap();
        assert_eq!(manifest.metadata.protocol_name.as_deref(), Some("PCR Example"));
        assert_eq!(manifest.modules.len(), 2);
        assert_eq!(manifest.labware.len(), 5);
        assert!(manifest.modules[1].slot.is_none());
    }

    #[test]
    fn test_run_manifest_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path());
        let manifest = SetupManifest::from_file(&path).unwrap();

        let mut protocol =
            ProtocolContext::new(manifest.metadata.clone(), DeckLayout::ot2());
        protocol.run_manifest(&manifest).unwrap();

        let deck = protocol.deck();
        match deck.get(SlotId::new(3)) {
            Some(Occupant::Labware(labware)) => {
                assert_eq!(labware.load_name(), "3dprinted_24_tuberack_1500ul");
                assert_eq!(labware.label.as_deref(), Some("DNA and Primers"));
                assert_eq!(labware.location, Location::Slot(SlotId::new(3)));
            }
            other => panic!("unexpected occupant {:?}", other),
        }
        let thermocycler = deck
            .modules()
            .find(|m| m.kind == ModuleKind::Thermocycler)
            .unwrap();
        assert_eq!(
            thermocycler.labware().unwrap().label.as_deref(),
            Some("PCR Reactions")
        );
        assert_eq!(protocol.commands().len(), 7);
    }

    #[test]
    fn test_relative_definition_resolution() {
        let mut manifest = SetupManifest::default();
        assert_eq!(
            manifest.resolve_definition(Path::new("labware/a.json")),
            PathBuf::from("labware/a.json")
        );

        manifest.base_dir = Some(PathBuf::from("/protocols/pcr"));
        assert_eq!(
            manifest.resolve_definition(Path::new("labware/a.json")),
            PathBuf::from("/protocols/pcr/labware/a.json")
        );
        assert_eq!(
            manifest.resolve_definition(Path::new("/abs/a.json")),
            PathBuf::from("/abs/a.json")
        );
    }

    #[test]
    fn test_manifest_validation() {
        let both = r#"
[[labware]]
load_name = "x"
definition = "x.json"
slot = 1
"#;
        assert!(matches!(SetupManifest::parse(both), Err(DeckError::Config(_))));

        let no_slot = r#"
[[labware]]
load_name = "opentrons_96_tiprack_20ul"
"#;
        assert!(matches!(SetupManifest::parse(no_slot), Err(DeckError::Config(_))));

        let module_and_slot = r#"
[[labware]]
definition = "x.json"
module = "temp"
slot = 3
"#;
        assert!(matches!(
            SetupManifest::parse(module_and_slot),
            Err(DeckError::Config(_))
        ));

        let duplicate = r#"
[[modules]]
name = "temp"
kind = "tempdeck"
slot = 1

[[modules]]
name = "temp"
kind = "magdeck"
slot = 2
"#;
        assert!(matches!(
            SetupManifest::parse(duplicate),
            Err(DeckError::Config(_))
        ));
    }

    #[test]
    fn test_manifest_read_errors() {
        let missing = SetupManifest::from_file(Path::new("/nonexistent/setup.toml"));
        assert!(matches!(missing, Err(DeckError::Io(_))));

        let malformed = SetupManifest::parse("[[modules]]\nname = ");
        assert!(matches!(malformed, Err(DeckError::Config(_))));
    }

    #[test]
    fn test_unknown_module_reference() {
        let manifest = SetupManifest::parse(
            r#"
[[labware]]
load_name = "opentrons_24_aluminumblock_nest_1.5ml_snapcap"
module = "missing"
"#,
        )
        .unwrap();

        let mut protocol = ProtocolContext::new(ProtocolMetadata::default(), DeckLayout::ot2());
        let result = protocol.run_manifest(&manifest);
        assert!(matches!(result, Err(DeckError::ModuleNotFound(_))));
    }
}
