//! Hardware modules and their labware bays

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    DeckError, DeckResult, Labware, LabwareDefinition, LabwareSource, Location, SlotId,
};

/// Unique identifier for a loaded module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(Uuid);

impl ModuleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ModuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported module types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKind {
    TemperatureModule,
    MagneticModule,
    Thermocycler,
}

impl ModuleKind {
    /// Name the robot reports for this module
    pub fn display_name(self) -> &'static str {
        match self {
            ModuleKind::TemperatureModule => "Temperature Module",
            ModuleKind::MagneticModule => "Magnetic Module",
            ModuleKind::Thermocycler => "Thermocycler Module",
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Parses the load names accepted by the robot API, case-insensitively
impl FromStr for ModuleKind {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "temperature module"
            | "temperature module gen2"
            | "temperaturemodulev1"
            | "temperaturemodulev2"
            | "tempdeck"
            | "temperature-module" => Ok(ModuleKind::TemperatureModule),
            "magnetic module"
            | "magnetic module gen2"
            | "magneticmodulev1"
            | "magneticmodulev2"
            | "magdeck"
            | "magnetic-module" => Ok(ModuleKind::MagneticModule),
            "thermocycler"
            | "thermocycler module"
            | "thermocyclermodulev1" => Ok(ModuleKind::Thermocycler),
            _ => Err(DeckError::UnknownModule(s.to_string())),
        }
    }
}

/// A module loaded on the deck
///
/// Each module has a single labware bay. The module decides where its labware
/// sits, so loading into it never takes a slot argument.
#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    pub kind: ModuleKind,
    /// Slot the module is anchored to
    pub slot: SlotId,
    labware: Option<Labware>,
}

impl Module {
    pub fn new(kind: ModuleKind, slot: SlotId) -> Self {
        Self {
            id: ModuleId::new(),
            kind,
            slot,
            labware: None,
        }
    }

    /// Labware currently in the bay
    pub fn labware(&self) -> Option<&Labware> {
        self.labware.as_ref()
    }

    /// Load labware from a parsed custom definition into the bay
    pub fn load_labware_from_definition(
        &mut self,
        definition: LabwareDefinition,
        path: PathBuf,
        label: Option<String>,
    ) -> DeckResult<Labware> {
        self.place(
            LabwareSource::Definition {
                path,
                definition: Arc::new(definition),
            },
            label,
        )
    }

    /// Load catalog labware into the bay
    pub fn load_labware(&mut self, load_name: &str, label: Option<String>) -> DeckResult<Labware> {
        self.place(
            LabwareSource::Catalog {
                load_name: load_name.to_string(),
            },
            label,
        )
    }

    fn place(&mut self, source: LabwareSource, label: Option<String>) -> DeckResult<Labware> {
        if self.labware.is_some() {
            return Err(DeckError::ModuleOccupied(self.to_string()));
        }

        let labware = Labware::new(
            source,
            Location::Module {
                module: self.id,
                kind: self.kind,
                slot: self.slot,
            },
            label,
        );

        info!(
            module = %self.kind,
            slot = %self.slot,
            labware = %labware.load_name(),
            "Loaded labware into module"
        );

        self.labware = Some(labware.clone());
        Ok(labware)
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} on {}", self.kind, self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_kind_parse() {
        assert_eq!(
            "temperature module gen2".parse::<ModuleKind>().unwrap(),
            ModuleKind::TemperatureModule
        );
        assert_eq!(
            "Thermocycler Module".parse::<ModuleKind>().unwrap(),
            ModuleKind::Thermocycler
        );
        assert_eq!("magdeck".parse::<ModuleKind>().unwrap(), ModuleKind::MagneticModule);
        assert!(matches!(
            "heater-shaker".parse::<ModuleKind>(),
            Err(DeckError::UnknownModule(_))
        ));
    }

    #[test]
    fn test_module_display() {
        let module = Module::new(ModuleKind::Thermocycler, SlotId::new(7));
        assert_eq!(module.to_string(), "Thermocycler Module on 7");
    }

    #[test]
    fn test_module_bay_holds_one_labware() {
        let mut module = Module::new(ModuleKind::TemperatureModule, SlotId::new(4));

        let labware = module
            .load_labware(
                "opentrons_24_aluminumblock_nest_1.5ml_snapcap",
                Some("Reagents".to_string()),
            )
            .unwrap();
        assert_eq!(labware.label.as_deref(), Some("Reagents"));
        assert_eq!(labware.location.slot(), SlotId::new(4));
        assert!(module.labware().is_some());

        let result = module.load_labware("nest_96_wellplate_100ul_pcr_full_skirt", None);
        assert!(matches!(result, Err(DeckError::ModuleOccupied(_))));
    }
}
