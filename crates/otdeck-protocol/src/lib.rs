//! otdeck-protocol: Protocol setup on top of the deck allocator
//!
//! This crate wraps a deck in a protocol context:
//! - Protocol metadata
//! - A command log of every setup step
//! - TOML setup manifests describing modules and labware to load

pub mod context;
pub mod manifest;
pub mod metadata;

pub use context::{CommandEntry, ProtocolContext};
pub use manifest::{LabwareEntry, ModuleEntry, SetupManifest};
pub use metadata::ProtocolMetadata;
