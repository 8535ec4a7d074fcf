//! Deck occupancy and placement primitives

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    DeckError, DeckLayout, DeckResult, Labware, LabwareDefinition, LabwareSource, Location,
    Module, ModuleId, ModuleKind, SlotId,
};

/// Whatever is sitting in a deck slot
#[derive(Debug, Clone)]
pub enum Occupant {
    Labware(Labware),
    Module(Module),
    /// Extra slot covered by a module anchored elsewhere
    ModuleFootprint { module: ModuleId, anchor: SlotId },
    Trash,
}

impl Occupant {
    pub fn as_module(&self) -> Option<&Module> {
        match self {
            Occupant::Module(module) => Some(module),
            _ => None,
        }
    }
}

impl std::fmt::Display for Occupant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Occupant::Labware(labware) => write!(f, "{}", labware),
            Occupant::Module(module) => write!(f, "{}", module),
            Occupant::ModuleFootprint { anchor, .. } => write!(f, "module on {}", anchor),
            Occupant::Trash => write!(f, "Opentrons Fixed Trash"),
        }
    }
}

/// The robot deck
///
/// Every slot in the layout has an entry; `None` means the slot is empty.
#[derive(Debug, Clone)]
pub struct Deck {
    layout: DeckLayout,
    slots: BTreeMap<SlotId, Option<Occupant>>,
}

impl Deck {
    /// Create a deck with only the fixed trash loaded
    ///
    /// A trash slot outside the layout is ignored; the deck never gains slots
    /// beyond `slot_count`.
    pub fn new(layout: DeckLayout) -> Self {
        let mut slots: BTreeMap<SlotId, Option<Occupant>> =
            layout.slot_ids().map(|slot| (slot, None)).collect();

        if let Some(trash) = layout.fixed_trash {
            if let Some(entry) = slots.get_mut(&trash) {
                *entry = Some(Occupant::Trash);
            }
        }

        Self { layout, slots }
    }

    pub fn layout(&self) -> &DeckLayout {
        &self.layout
    }

    /// Slot ids in ascending order
    pub fn slot_ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.slots.keys().copied()
    }

    /// Slots with their occupants, in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, Option<&Occupant>)> + '_ {
        self.slots.iter().map(|(slot, occ)| (*slot, occ.as_ref()))
    }

    /// Occupant of a slot, `None` if empty or not on the deck
    pub fn get(&self, slot: SlotId) -> Option<&Occupant> {
        self.slots.get(&slot).and_then(|occ| occ.as_ref())
    }

    /// True if the slot exists and holds nothing
    pub fn is_empty_slot(&self, slot: SlotId) -> bool {
        matches!(self.slots.get(&slot), Some(None))
    }

    /// Overwrite a slot without any placement checks
    ///
    /// Used to restore a known deck state. Returns the previous occupant.
    pub fn set_occupant(
        &mut self,
        slot: SlotId,
        occupant: Option<Occupant>,
    ) -> DeckResult<Option<Occupant>> {
        let entry = self
            .slots
            .get_mut(&slot)
            .ok_or_else(|| invalid_slot(&self.layout, slot))?;
        Ok(std::mem::replace(entry, occupant))
    }

    /// Place custom labware on a slot
    pub fn load_labware_from_definition(
        &mut self,
        definition: LabwareDefinition,
        path: PathBuf,
        slot: SlotId,
        label: Option<String>,
    ) -> DeckResult<Labware> {
        self.place_labware(
            LabwareSource::Definition {
                path,
                definition: Arc::new(definition),
            },
            slot,
            label,
        )
    }

    /// Place catalog labware on a slot
    pub fn load_labware(
        &mut self,
        load_name: &str,
        slot: SlotId,
        label: Option<String>,
    ) -> DeckResult<Labware> {
        self.place_labware(
            LabwareSource::Catalog {
                load_name: load_name.to_string(),
            },
            slot,
            label,
        )
    }

    fn place_labware(
        &mut self,
        source: LabwareSource,
        slot: SlotId,
        label: Option<String>,
    ) -> DeckResult<Labware> {
        self.ensure_free(slot)?;

        let labware = Labware::new(source, Location::Slot(slot), label);

        info!(
            slot = %slot,
            labware = %labware.load_name(),
            label = ?labware.label,
            "Loaded labware"
        );

        self.slots.insert(slot, Some(Occupant::Labware(labware.clone())));
        Ok(labware)
    }

    /// Load a module
    ///
    /// Modules with a reserved footprint always go to the footprint anchor and
    /// claim every slot it covers; a caller slot is only accepted if it names
    /// the anchor. Other modules need an explicit slot.
    pub fn load_module(&mut self, kind: ModuleKind, slot: Option<SlotId>) -> DeckResult<ModuleId> {
        if let Some(footprint) = self.layout.footprint_for(kind).cloned() {
            if let Some(requested) = slot {
                if requested != footprint.anchor {
                    return Err(DeckError::InvalidSlot(format!(
                        "{} can only be loaded on slot {}",
                        kind, footprint.anchor
                    )));
                }
            }

            for covered in &footprint.slots {
                self.ensure_free(*covered)?;
            }

            let module = Module::new(kind, footprint.anchor);
            let id = module.id;
            for covered in &footprint.slots {
                let occupant = if *covered == footprint.anchor {
                    Occupant::Module(module.clone())
                } else {
                    Occupant::ModuleFootprint {
                        module: id,
                        anchor: footprint.anchor,
                    }
                };
                self.slots.insert(*covered, Some(occupant));
            }

            info!(
                module = %kind,
                slots = ?footprint.slots,
                "Loaded module"
            );
            return Ok(id);
        }

        let slot = slot.ok_or_else(|| {
            DeckError::InvalidSlot(format!("{} needs a deck slot", kind))
        })?;
        self.ensure_free(slot)?;

        let module = Module::new(kind, slot);
        let id = module.id;
        self.slots.insert(slot, Some(Occupant::Module(module)));

        info!(module = %kind, slot = %slot, "Loaded module");
        Ok(id)
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.slots
            .values()
            .filter_map(|occ| occ.as_ref().and_then(Occupant::as_module))
            .find(|m| m.id == id)
    }

    pub fn module_mut(&mut self, id: ModuleId) -> DeckResult<&mut Module> {
        self.slots
            .values_mut()
            .find_map(|occ| match occ {
                Some(Occupant::Module(module)) if module.id == id => Some(module),
                _ => None,
            })
            .ok_or_else(|| DeckError::ModuleNotFound(id.to_string()))
    }

    /// Loaded modules, by anchor slot
    pub fn modules(&self) -> impl Iterator<Item = &Module> + '_ {
        self.slots
            .values()
            .filter_map(|occ| occ.as_ref().and_then(Occupant::as_module))
    }

    /// All loaded labware, on the deck or inside modules, by slot
    pub fn labware(&self) -> Vec<&Labware> {
        self.slots
            .values()
            .filter_map(|occ| match occ {
                Some(Occupant::Labware(labware)) => Some(labware),
                Some(Occupant::Module(module)) => module.labware(),
                _ => None,
            })
            .collect()
    }

    fn ensure_free(&self, slot: SlotId) -> DeckResult<()> {
        match self.slots.get(&slot) {
            None => Err(invalid_slot(&self.layout, slot)),
            Some(Some(occupant)) => {
                debug!(slot = %slot, occupant = %occupant, "Slot already occupied");
                Err(DeckError::SlotOccupied {
                    slot,
                    occupant: occupant.to_string(),
                })
            }
            Some(None) => Ok(()),
        }
    }
}

fn invalid_slot(layout: &DeckLayout, slot: SlotId) -> DeckError {
    DeckError::InvalidSlot(format!(
        "{} is not a slot on this deck (1-{})",
        slot, layout.slot_count
    ))
}
