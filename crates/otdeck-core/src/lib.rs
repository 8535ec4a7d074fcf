//! otdeck-core: Core types for the deck resource allocator
//!
//! This crate provides the types shared by the rest of otdeck:
//! - Deck slots, occupancy and placement primitives
//! - Labware, labware definitions and locations
//! - Modules and their labware bays
//! - Deck layout configuration
//! - Error handling

pub mod config;
pub mod deck;
pub mod error;
pub mod labware;
pub mod module;
pub mod slot;

pub use config::*;
pub use deck::*;
pub use error::*;
pub use labware::*;
pub use module::*;
pub use slot::*;
