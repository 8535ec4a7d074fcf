//! Next-empty-slot finder

use otdeck_core::{Deck, DeckError, DeckResult, SlotId};
use std::sync::Arc;
use tracing::debug;

use crate::strategy::{FootprintAwareScan, SlotScanStrategy};

/// Finds the first free deck slot according to a scan strategy
#[derive(Clone)]
pub struct SlotFinder {
    strategy: Arc<dyn SlotScanStrategy>,
}

impl Default for SlotFinder {
    fn default() -> Self {
        Self::new(Arc::new(FootprintAwareScan))
    }
}

impl SlotFinder {
    pub fn new(strategy: Arc<dyn SlotScanStrategy>) -> Self {
        Self { strategy }
    }

    /// Return the first empty candidate slot
    ///
    /// Pure query; the deck is not modified. Fails with
    /// [`DeckError::CapacityExhausted`] when every candidate is taken.
    pub fn find(&self, deck: &Deck) -> DeckResult<SlotId> {
        let candidates = self.strategy.candidates(deck);

        let slot = candidates
            .iter()
            .copied()
            .find(|slot| deck.is_empty_slot(*slot))
            .ok_or_else(|| DeckError::CapacityExhausted("No deck slots remaining".to_string()))?;

        debug!(slot = %slot, candidates = candidates.len(), "Found empty slot");
        Ok(slot)
    }
}

/// Find the next empty slot with the default footprint-aware scan
pub fn find_next_empty_slot(deck: &Deck) -> DeckResult<SlotId> {
    SlotFinder::default().find(deck)
}
