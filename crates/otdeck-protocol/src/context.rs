//! Protocol context and command log

use chrono::{DateTime, Utc};
use otdeck_allocator::LabwareLoader;
use otdeck_core::{Deck, DeckLayout, DeckResult, Labware, ModuleId, ModuleKind, SlotId};
use std::path::Path;
use tracing::info;

use crate::ProtocolMetadata;

/// One line of the command log
#[derive(Debug, Clone)]
pub struct CommandEntry {
    pub issued_at: DateTime<Utc>,
    pub text: String,
}

/// Deck plus the record of what was done to it
pub struct ProtocolContext {
    metadata: ProtocolMetadata,
    deck: Deck,
    loader: LabwareLoader,
    commands: Vec<CommandEntry>,
}

impl ProtocolContext {
    /// Create a context with a fresh deck
    pub fn new(metadata: ProtocolMetadata, layout: DeckLayout) -> Self {
        info!(
            protocol = %metadata.display_name(),
            api_level = %metadata.api_level,
            "Protocol context created"
        );

        Self {
            metadata,
            deck: Deck::new(layout),
            loader: LabwareLoader::default(),
            commands: Vec::new(),
        }
    }

    pub fn metadata(&self) -> &ProtocolMetadata {
        &self.metadata
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Load a module by its API load name
    pub fn load_module(&mut self, load_name: &str, slot: Option<SlotId>) -> DeckResult<ModuleId> {
        let kind: ModuleKind = load_name.parse()?;
        let id = self.deck.load_module(kind, slot)?;
        let text = match self.deck.module(id) {
            Some(module) => format!("Loading {}", module),
            None => format!("Loading {}", kind),
        };
        self.record(text);
        Ok(id)
    }

    /// Load catalog labware onto a deck slot
    pub fn load_labware(
        &mut self,
        load_name: &str,
        slot: SlotId,
        label: Option<String>,
    ) -> DeckResult<Labware> {
        let labware = self.deck.load_labware(load_name, slot, label)?;
        self.record_labware(&labware);
        Ok(labware)
    }

    /// Load catalog labware into a module bay
    pub fn load_labware_on_module(
        &mut self,
        module: ModuleId,
        load_name: &str,
        label: Option<String>,
    ) -> DeckResult<Labware> {
        let labware = self.deck.module_mut(module)?.load_labware(load_name, label)?;
        self.record_labware(&labware);
        Ok(labware)
    }

    /// Load custom labware onto the deck, picking a slot if none is given
    pub fn load_custom_labware(
        &mut self,
        path: impl AsRef<Path>,
        slot: Option<SlotId>,
        label: Option<String>,
    ) -> DeckResult<Labware> {
        let labware = self.loader.load(&mut self.deck, path, slot, label)?;
        self.record_labware(&labware);
        Ok(labware)
    }

    /// Load custom labware into a module bay
    pub fn load_custom_labware_on_module(
        &mut self,
        module: ModuleId,
        path: impl AsRef<Path>,
        label: Option<String>,
    ) -> DeckResult<Labware> {
        let host = self.deck.module_mut(module)?;
        let labware = self.loader.load(host, path, None, label)?;
        self.record_labware(&labware);
        Ok(labware)
    }

    /// Record a pause for the operator
    pub fn pause(&mut self, message: &str) {
        self.record(format!("Pausing robot operation: {}", message));
    }

    /// Record a free-form comment
    pub fn comment(&mut self, message: &str) {
        self.record(message.to_string());
    }

    /// Command log text, oldest first
    pub fn commands(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.text.as_str()).collect()
    }

    /// Command log with timestamps
    pub fn command_entries(&self) -> &[CommandEntry] {
        &self.commands
    }

    fn record_labware(&mut self, labware: &Labware) {
        let text = match &labware.label {
            Some(label) => format!(
                "Loading {} on {} as \"{}\"",
                labware.load_name(),
                labware.location,
                label
            ),
            None => format!("Loading {} on {}", labware.load_name(), labware.location),
        };
        self.record(text);
    }

    fn record(&mut self, text: String) {
        self.commands.push(CommandEntry {
            issued_at: Utc::now(),
            text,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otdeck_core::{DeckError, Location};
    use std::io::Write;

    fn context() -> ProtocolContext {
        ProtocolContext::new(ProtocolMetadata::default(), DeckLayout::ot2())
    }

    #[test]
    fn test_pcr_setup_command_log() {
        let mut rack = tempfile::NamedTempFile::new().unwrap();
        write!(
            rack,
            r#"{{"parameters": {{"loadName": "3dprinted_24_tuberack_1500ul"}}}}"#
        )
        .unwrap();

        let mut protocol = context();
        let temp = protocol
            .load_module("temperature module gen2", Some(SlotId::new(4)))
            .unwrap();
        let thermocycler = protocol.load_module("Thermocycler Module", None).unwrap();
        protocol
            .load_labware("opentrons_96_tiprack_20ul", SlotId::new(1), None)
            .unwrap();
        protocol
            .load_labware("opentrons_96_tiprack_300ul", SlotId::new(2), None)
            .unwrap();
        protocol
            .load_labware_on_module(
                temp,
                "opentrons_24_aluminumblock_nest_1.5ml_snapcap",
                Some("Reagents".to_string()),
            )
            .unwrap();
        let dna = protocol
            .load_custom_labware(rack.path(), None, Some("DNA and Primers".to_string()))
            .unwrap();
        protocol
            .load_labware_on_module(
                thermocycler,
                "nest_96_wellplate_100ul_pcr_full_skirt",
                Some("PCR Reactions".to_string()),
            )
            .unwrap();
        protocol.pause("Ensure all labware and reagents are loaded");

        assert_eq!(dna.location, Location::Slot(SlotId::new(3)));
        assert_eq!(
            protocol.commands(),
            vec![
                "Loading Temperature Module on 4",
                "Loading Thermocycler Module on 7",
                "Loading opentrons_96_tiprack_20ul on 1",
                "Loading opentrons_96_tiprack_300ul on 2",
                "Loading opentrons_24_aluminumblock_nest_1.5ml_snapcap on Temperature Module on 4 as \"Reagents\"",
                "Loading 3dprinted_24_tuberack_1500ul on 3 as \"DNA and Primers\"",
                "Loading nest_96_wellplate_100ul_pcr_full_skirt on Thermocycler Module on 7 as \"PCR Reactions\"",
                "Pausing robot operation: Ensure all labware and reagents are loaded",
            ]
        );
        assert_eq!(protocol.deck().labware().len(), 5);
    }

    #[test]
    fn test_failed_load_not_recorded() {
        let mut protocol = context();
        let result = protocol.load_custom_labware("/nonexistent/rack.json", None, None);

        assert!(matches!(result, Err(DeckError::DefinitionLoad { .. })));
        assert!(protocol.commands().is_empty());
    }

    #[test]
    fn test_custom_labware_on_module() {
        let mut rack = tempfile::NamedTempFile::new().unwrap();
        write!(rack, r#"{{"parameters": {{"loadName": "custom_block"}}}}"#).unwrap();

        let mut protocol = context();
        let temp = protocol
            .load_module("tempdeck", Some(SlotId::new(1)))
            .unwrap();
        let labware = protocol
            .load_custom_labware_on_module(temp, rack.path(), None)
            .unwrap();

        assert_eq!(labware.location.slot(), SlotId::new(1));
        assert_eq!(
            protocol.commands().last().copied(),
            Some("Loading custom_block on Temperature Module on 1")
        );
    }

    #[test]
    fn test_unknown_module() {
        let mut protocol = context();
        let result = protocol.load_module("heater-shaker", Some(SlotId::new(1)));
        assert!(matches!(result, Err(DeckError::UnknownModule(_))));
    }

    #[test]
    fn test_command_entries_are_ordered() {
        let mut protocol = context();
        protocol.comment("first");
        protocol.comment("second");

        let entries = protocol.command_entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].issued_at <= entries[1].issued_at);
    }
}
