//! otdeck-allocator: Deck slot allocation and custom labware loading
//!
//! This crate decides where new labware goes:
//! - Slot scan strategies that respect reserved module footprints
//! - The next-empty-slot finder
//! - The labware host capability shared by the deck and modules
//! - The custom labware loader

pub mod host;
pub mod loader;
pub mod slot_finder;
pub mod strategy;

pub use host::LabwareHost;
pub use loader::{load_custom_labware, LabwareLoader};
pub use slot_finder::{find_next_empty_slot, SlotFinder};
pub use strategy::{active_footprint, FootprintAwareScan, SlotScanStrategy};
