//! Labware host capability

use otdeck_core::{Deck, DeckResult, Labware, LabwareDefinition, Module, SlotId};
use std::path::PathBuf;

use crate::SlotFinder;

/// Something custom labware can be loaded into
///
/// `Slot` is the placement argument the host takes. The deck takes a
/// [`SlotId`] and fills in a free one when none is given. Modules use `()`
/// because they place labware in their own bay.
pub trait LabwareHost {
    type Slot;

    /// Turn the caller's optional slot into the one to load into
    fn resolve_slot(&self, requested: Option<Self::Slot>, finder: &SlotFinder)
        -> DeckResult<Self::Slot>;

    /// Register labware built from `definition` at `slot`
    fn place_definition(
        &mut self,
        definition: LabwareDefinition,
        path: PathBuf,
        slot: Self::Slot,
        label: Option<String>,
    ) -> DeckResult<Labware>;
}

impl LabwareHost for Deck {
    type Slot = SlotId;

    fn resolve_slot(&self, requested: Option<SlotId>, finder: &SlotFinder) -> DeckResult<SlotId> {
        match requested {
            Some(slot) => Ok(slot),
            None => finder.find(self),
        }
    }

    fn place_definition(
        &mut self,
        definition: LabwareDefinition,
        path: PathBuf,
        slot: SlotId,
        label: Option<String>,
    ) -> DeckResult<Labware> {
        self.load_labware_from_definition(definition, path, slot, label)
    }
}

impl LabwareHost for Module {
    type Slot = ();

    fn resolve_slot(&self, _requested: Option<()>, _finder: &SlotFinder) -> DeckResult<()> {
        Ok(())
    }

    fn place_definition(
        &mut self,
        definition: LabwareDefinition,
        path: PathBuf,
        _slot: (),
        label: Option<String>,
    ) -> DeckResult<Labware> {
        self.load_labware_from_definition(definition, path, label)
    }
}
