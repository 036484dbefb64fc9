//! Plugin descriptor presented to the host framework.

use serde::{Deserialize, Serialize};

use crate::command::COMMAND_PREFIX;
use crate::error::Result;

/// Metadata describing the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Plugin name.
    pub name: String,

    /// One-line description.
    pub description: String,

    /// License identifier.
    pub license: String,

    /// Plugin version.
    pub version: String,

    /// Command prefix the plugin answers to.
    pub command: String,
}

impl PluginDescriptor {
    /// Descriptor of this build of the plugin.
    pub fn current() -> Self {
        Self {
            name: "r2dec".to_string(),
            description: "an experimental decompiler for radare2 - reimplemented".to_string(),
            license: "Apache-2.0".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            command: COMMAND_PREFIX.to_string(),
        }
    }

    /// Converts the descriptor to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_descriptor() {
        let descriptor = PluginDescriptor::current();
        assert_eq!(descriptor.name, "r2dec");
        assert_eq!(descriptor.command, "pdd");
        assert_eq!(descriptor.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_serialize_descriptor() {
        let json = PluginDescriptor::current().to_json().unwrap();
        assert!(json.contains("\"name\": \"r2dec\""));
        assert!(json.contains("\"command\": \"pdd\""));

        let parsed: PluginDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PluginDescriptor::current());
    }
}
