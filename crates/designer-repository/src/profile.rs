//! Repository profile: where the repository lives and how to open it

use crate::asset::ContentKind;
use crate::factory::AssetBuilderFactory;
use designer_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Environment key whose value is appended to the root URI to re-resolve
/// the bound filesystem, for providers that must fetch remote state first.
pub const FETCH_COMMAND: &str = "fetch.cmd";

/// Settings needed to open a repository.
///
/// Loaded from TOML, JSON or YAML:
///
/// ```toml
/// repository_root = "file:///srv/designer-repo"
/// binary_extensions = ["bin"]
///
/// [env]
/// "fetch.cmd" = "?fetch"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryProfile {
    /// Absolute URI of the repository root
    pub repository_root: String,

    /// Provider options
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Extensions always stored as raw bytes
    #[serde(default)]
    pub binary_extensions: Vec<String>,

    /// Extensions always stored as text
    #[serde(default)]
    pub text_extensions: Vec<String>,
}

impl RepositoryProfile {
    pub fn new(repository_root: impl Into<String>) -> Self {
        Self {
            repository_root: repository_root.into(),
            env: HashMap::new(),
            binary_extensions: Vec::new(),
            text_extensions: Vec::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Load a profile from a local configuration file.
    pub fn load(path: &NormalizedPath) -> designer_fs::Result<Self> {
        ConfigStore::new().load(path)
    }

    /// Save the profile to a local configuration file.
    pub fn save(&self, path: &NormalizedPath) -> designer_fs::Result<()> {
        ConfigStore::new().save(path, self)
    }

    pub fn fetch_command(&self) -> Option<&str> {
        self.env.get(FETCH_COMMAND).map(String::as_str)
    }

    /// Asset builder factory with this profile's extension overrides.
    pub fn asset_builders(&self) -> AssetBuilderFactory {
        let mut factory = AssetBuilderFactory::new();
        for ext in &self.binary_extensions {
            factory.register(ext, ContentKind::Bytes);
        }
        for ext in &self.text_extensions {
            factory.register(ext, ContentKind::Text);
        }
        factory
    }
}
