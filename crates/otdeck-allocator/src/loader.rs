//! Custom labware loader

use otdeck_core::{DeckResult, Labware, LabwareDefinition};
use std::path::Path;
use tracing::debug;

use crate::{LabwareHost, SlotFinder};

/// Loads custom labware definitions into deck slots or module bays
#[derive(Clone, Default)]
pub struct LabwareLoader {
    finder: SlotFinder,
}

impl LabwareLoader {
    pub fn new(finder: SlotFinder) -> Self {
        Self { finder }
    }

    /// Read the definition at `path` and load it into `host`
    ///
    /// The file is parsed before any slot is chosen. When the host is the deck
    /// and `slot` is `None`, the next empty slot is picked; a given slot is
    /// passed straight to the host. Modules ignore `slot` and use their bay.
    pub fn load<H: LabwareHost>(
        &self,
        host: &mut H,
        path: impl AsRef<Path>,
        slot: Option<H::Slot>,
        label: Option<String>,
    ) -> DeckResult<Labware> {
        let path = path.as_ref();
        let definition = LabwareDefinition::from_file(path)?;

        debug!(
            path = %path.display(),
            load_name = ?definition.load_name(),
            "Read labware definition"
        );

        let slot = host.resolve_slot(slot, &self.finder)?;
        host.place_definition(definition, path.to_path_buf(), slot, label)
    }
}

/// Load a custom labware definition with the default slot finder
pub fn load_custom_labware<H: LabwareHost>(
    host: &mut H,
    path: impl AsRef<Path>,
    slot: Option<H::Slot>,
    label: Option<String>,
) -> DeckResult<Labware> {
    LabwareLoader::default().load(host, path, slot, label)
}
