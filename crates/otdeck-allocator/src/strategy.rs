//! Slot scan strategies

use otdeck_core::{Deck, Occupant, ReservedFootprint, SlotId};

/// Strategy deciding which slots are candidates for new labware, and in what order
pub trait SlotScanStrategy: Send + Sync {
    /// Candidate slots, in the order they should be tried
    fn candidates(&self, deck: &Deck) -> Vec<SlotId>;
}

/// Default strategy
///
/// Scans every slot in ascending order, unless a module owning a reserved
/// footprint sits on its anchor slot. In that case only the footprint's scan
/// order is used, so covered slots are never offered even when they look empty.
pub struct FootprintAwareScan;

impl SlotScanStrategy for FootprintAwareScan {
    fn candidates(&self, deck: &Deck) -> Vec<SlotId> {
        match active_footprint(deck) {
            Some(footprint) => footprint.scan_order.clone(),
            None => deck.slot_ids().collect(),
        }
    }
}

/// Footprint whose module is currently loaded on its anchor slot
pub fn active_footprint(deck: &Deck) -> Option<&ReservedFootprint> {
    deck.layout().footprints.iter().find(|footprint| {
        matches!(
            deck.get(footprint.anchor),
            Some(Occupant::Module(module)) if module.kind == footprint.module
        )
    })
}
