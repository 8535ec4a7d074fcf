//! Deck layout configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{DeckError, DeckResult, ModuleKind, SlotId};

/// Physical layout of the deck
///
/// A layout file that leaves `slot_count` out is read as changes to the OT-2
/// deck. Once `slot_count` is given, missing fields start empty: no trash and
/// no footprints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LayoutFile")]
pub struct DeckLayout {
    /// Number of slots, numbered from 1
    pub slot_count: u8,
    /// Slot permanently holding the fixed trash
    pub fixed_trash: Option<SlotId>,
    /// Multi-slot module footprints
    pub footprints: Vec<ReservedFootprint>,
}

/// Layout as written in TOML, before defaults are filled in
#[derive(Debug, Deserialize)]
struct LayoutFile {
    slot_count: Option<u8>,
    fixed_trash: Option<SlotId>,
    footprints: Option<Vec<ReservedFootprint>>,
}

impl From<LayoutFile> for DeckLayout {
    fn from(file: LayoutFile) -> Self {
        match file.slot_count {
            None => {
                let base = DeckLayout::ot2();
                DeckLayout {
                    slot_count: base.slot_count,
                    fixed_trash: file.fixed_trash.or(base.fixed_trash),
                    footprints: file.footprints.unwrap_or(base.footprints),
                }
            }
            Some(slot_count) => DeckLayout {
                slot_count,
                fixed_trash: file.fixed_trash,
                footprints: file.footprints.unwrap_or_default(),
            },
        }
    }
}

/// Block of slots a large module takes over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservedFootprint {
    /// Module that owns the footprint
    pub module: ModuleKind,
    /// Slot the module reports itself on
    pub anchor: SlotId,
    /// Every slot covered, anchor included
    pub slots: Vec<SlotId>,
    /// Slots searched, in order, for free space while the module is present
    pub scan_order: Vec<SlotId>,
}

impl ReservedFootprint {
    /// Thermocycler footprint on an OT-2 deck
    pub fn ot2_thermocycler() -> Self {
        Self {
            module: ModuleKind::Thermocycler,
            anchor: SlotId::new(7),
            slots: [7, 8, 10, 11].into_iter().map(SlotId::new).collect(),
            scan_order: [1, 2, 3, 4, 5, 6, 9].into_iter().map(SlotId::new).collect(),
        }
    }

    pub fn covers(&self, slot: SlotId) -> bool {
        self.slots.contains(&slot)
    }
}

impl Default for DeckLayout {
    fn default() -> Self {
        Self::ot2()
    }
}

impl DeckLayout {
    /// Standard OT-2 deck: 12 slots, fixed trash in 12, thermocycler over 7/8/10/11
    pub fn ot2() -> Self {
        Self {
            slot_count: 12,
            fixed_trash: Some(SlotId::new(12)),
            footprints: vec![ReservedFootprint::ot2_thermocycler()],
        }
    }

    /// Load a layout from a TOML file
    pub fn from_file(path: &Path) -> DeckResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a TOML layout
    pub fn parse(content: &str) -> DeckResult<Self> {
        let layout: DeckLayout = toml::from_str(content)?;
        layout.validate()?;
        Ok(layout)
    }

    /// All slot ids in ascending order
    pub fn slot_ids(&self) -> impl Iterator<Item = SlotId> {
        (1..=self.slot_count).map(SlotId::new)
    }

    pub fn contains(&self, slot: SlotId) -> bool {
        (1..=self.slot_count).contains(&slot.number())
    }

    /// Footprint reserved by the given module type, if it spans several slots
    pub fn footprint_for(&self, kind: ModuleKind) -> Option<&ReservedFootprint> {
        self.footprints.iter().find(|f| f.module == kind)
    }

    /// Check internal consistency
    pub fn validate(&self) -> DeckResult<()> {
        if self.slot_count == 0 {
            return Err(DeckError::Config("Deck must have at least one slot".to_string()));
        }

        if let Some(trash) = self.fixed_trash {
            if !self.contains(trash) {
                return Err(DeckError::Config(format!(
                    "Fixed trash slot {} is outside the deck",
                    trash
                )));
            }
        }

        for (index, footprint) in self.footprints.iter().enumerate() {
            if let Some(trash) = self.fixed_trash.filter(|t| footprint.covers(*t)) {
                return Err(DeckError::Config(format!(
                    "{} footprint covers the fixed trash slot {}",
                    footprint.module, trash
                )));
            }
            for other in &self.footprints[..index] {
                if other.module == footprint.module {
                    return Err(DeckError::Config(format!(
                        "{} has more than one footprint",
                        footprint.module
                    )));
                }
                if let Some(slot) = footprint.slots.iter().find(|s| other.covers(**s)) {
                    return Err(DeckError::Config(format!(
                        "{} and {} footprints both cover slot {}",
                        other.module, footprint.module, slot
                    )));
                }
            }
            if !footprint.covers(footprint.anchor) {
                return Err(DeckError::Config(format!(
                    "{} footprint does not cover its anchor slot {}",
                    footprint.module, footprint.anchor
                )));
            }
            if let Some(slot) = footprint
                .slots
                .iter()
                .chain(footprint.scan_order.iter())
                .find(|s| !self.contains(**s))
            {
                return Err(DeckError::Config(format!(
                    "{} footprint references slot {} outside the deck",
                    footprint.module, slot
                )));
            }
            if let Some(slot) = footprint.scan_order.iter().find(|s| footprint.covers(**s)) {
                return Err(DeckError::Config(format!(
                    "{} scan order includes reserved slot {}",
                    footprint.module, slot
                )));
            }
        }

        Ok(())
    }
}
