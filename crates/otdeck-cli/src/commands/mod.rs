//! CLI commands implementation

use anyhow::{Context, Result};
use otdeck_allocator::find_next_empty_slot;
use otdeck_core::{Deck, DeckLayout, Occupant};
use otdeck_protocol::{ProtocolContext, SetupManifest};
use std::path::Path;

/// Load the deck layout, falling back to the standard OT-2 deck
pub fn load_layout(path: Option<&Path>) -> Result<DeckLayout> {
    match path {
        Some(path) => DeckLayout::from_file(path)
            .with_context(|| format!("Failed to load layout {}", path.display())),
        None => Ok(DeckLayout::ot2()),
    }
}

/// Build a protocol context and apply the manifest to it
pub fn run_manifest(path: &Path, layout: DeckLayout) -> Result<ProtocolContext> {
    let manifest = SetupManifest::from_file(path)
        .with_context(|| format!("Failed to load manifest {}", path.display()))?;

    let mut protocol = ProtocolContext::new(manifest.metadata.clone(), layout);
    protocol
        .run_manifest(&manifest)
        .with_context(|| format!("Setup failed for {}", path.display()))?;

    Ok(protocol)
}

/// Print the command log of a manifest run
pub fn setup(path: &Path, layout: DeckLayout) -> Result<()> {
    let protocol = run_manifest(path, layout)?;

    println!("{}", protocol.metadata().display_name());
    for line in protocol.commands() {
        println!("{}", line);
    }

    Ok(())
}

/// Print slot occupancy after a manifest run
pub fn deck(path: &Path, layout: DeckLayout) -> Result<()> {
    let protocol = run_manifest(path, layout)?;

    println!("{:<6} {}", "SLOT", "CONTENTS");
    for line in format_deck(protocol.deck()) {
        println!("{}", line);
    }

    Ok(())
}

/// Print the slot the finder would pick next
pub fn next_slot(path: &Path, layout: DeckLayout) -> Result<()> {
    let protocol = run_manifest(path, layout)?;
    let slot = find_next_empty_slot(protocol.deck())?;

    println!("{}", slot);
    Ok(())
}

/// One line per slot; custom labware shows its definition's display name
fn format_deck(deck: &Deck) -> Vec<String> {
    deck.iter()
        .map(|(slot, occupant)| match occupant {
            Some(Occupant::Labware(labware)) => {
                match labware.definition().and_then(|d| d.display_name()) {
                    Some(name) => format!("{:<6} {} ({})", slot.to_string(), labware, name),
                    None => format!("{:<6} {}", slot.to_string(), labware),
                }
            }
            Some(occupant) => format!("{:<6} {}", slot.to_string(), occupant),
            None => format!("{:<6} -", slot.to_string()),
        })
        .collect()
}
