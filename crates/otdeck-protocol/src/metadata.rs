//! Protocol metadata

use serde::{Deserialize, Serialize};

/// Descriptive information attached to a protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolMetadata {
    pub protocol_name: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    /// Where the procedure was adapted from
    pub source: Option<String>,
    /// Robot API level the protocol targets
    #[serde(default = "default_api_level")]
    pub api_level: String,
}

fn default_api_level() -> String {
    "2.11".to_string()
}

impl Default for ProtocolMetadata {
    fn default() -> Self {
        Self {
            protocol_name: None,
            author: None,
            description: None,
            source: None,
            api_level: default_api_level(),
        }
    }
}

impl ProtocolMetadata {
    /// Protocol name, or a placeholder when none was given
    pub fn display_name(&self) -> &str {
        self.protocol_name.as_deref().unwrap_or("Untitled protocol")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_defaults() {
        let metadata: ProtocolMetadata = toml::from_str("author = \"Name\"").unwrap();
        assert_eq!(metadata.api_level, "2.11");
        assert_eq!(metadata.author.as_deref(), Some("Name"));
        assert_eq!(metadata.display_name(), "Untitled protocol");
    }
}
