//! Format-agnostic configuration loading and saving

use crate::{Error, NormalizedPath, Result, io};
use serde::{Serialize, de::DeserializeOwned};

/// Format-agnostic configuration store.
///
/// Detects the format from the file extension and handles
/// serialization/deserialization transparently.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a local file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let extension = path.extension().unwrap_or("").to_lowercase();
        if !matches!(extension.as_str(), "toml" | "json" | "yaml" | "yml") {
            return Err(Error::UnsupportedFormat { extension });
        }

        let content = io::read_text(path)?;
        let parse_error = |format: &str, message: String| Error::ConfigParse {
            path: path.to_native(),
            format: format.into(),
            message,
        };

        match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| parse_error("TOML", e.to_string())),
            "json" => {
                serde_json::from_str(&content).map_err(|e| parse_error("JSON", e.to_string()))
            }
            _ => serde_yaml::from_str(&content).map_err(|e| parse_error("YAML", e.to_string())),
        }
    }

    /// Save configuration to a local file.
    ///
    /// Format is determined from file extension. Uses an atomic write.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let extension = path.extension().unwrap_or("").to_lowercase();
        let serialize_error = |format: &str, message: String| Error::ConfigSerialize {
            path: path.to_native(),
            format: format.into(),
            message,
        };

        let content = match extension.as_str() {
            "toml" => toml::to_string_pretty(value)
                .map_err(|e| serialize_error("TOML", e.to_string()))?,
            "json" => serde_json::to_string_pretty(value)
                .map_err(|e| serialize_error("JSON", e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::to_string(value).map_err(|e| serialize_error("YAML", e.to_string()))?
            }
            _ => return Err(Error::UnsupportedFormat { extension }),
        };

        io::write_atomic(path, content.as_bytes())
    }
}
