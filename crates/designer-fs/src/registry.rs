//! Scheme-based provider registry
//!
//! Mirrors the usual "get the mounted filesystem for this URI, or create
//! one" lookup: providers are keyed by scheme and authority.

use crate::local::{FILE_SCHEME, LocalFileSystem};
use crate::memory::{MEMORY_SCHEME, MemoryFileSystem};
use crate::provider::FileSystemProvider;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use url::Url;

/// Shared handle to a provider.
pub type ProviderRef = Arc<dyn FileSystemProvider>;

/// Registry of mounted filesystem providers.
#[derive(Debug, Default)]
pub struct FileSystems {
    mounted: Mutex<HashMap<String, ProviderRef>>,
}

fn mount_key(uri: &Url) -> String {
    format!("{}://{}", uri.scheme(), uri.host_str().unwrap_or(""))
}

impl FileSystems {
    pub fn new() -> Self {
        Self::default()
    }

    /// The provider already mounted for the URI's scheme and authority.
    pub fn get(&self, uri: &Url) -> Option<ProviderRef> {
        self.mounted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&mount_key(uri))
            .cloned()
    }

    /// Mount `provider` for the URI's scheme and authority, replacing any
    /// previous mount.
    pub fn register(&self, uri: &Url, provider: ProviderRef) -> Result<()> {
        if provider.scheme() != uri.scheme() {
            return Err(Error::invalid_uri(
                uri.as_str(),
                format!("provider serves '{}'", provider.scheme()),
            ));
        }
        self.mounted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(mount_key(uri), provider);
        Ok(())
    }

    /// Create and mount a new provider for the URI's scheme.
    ///
    /// `env` carries provider options; the built-in providers take none.
    pub fn new_file_system(
        &self,
        uri: &Url,
        env: &HashMap<String, String>,
    ) -> Result<ProviderRef> {
        let provider: ProviderRef = match uri.scheme() {
            FILE_SCHEME => Arc::new(LocalFileSystem::new()),
            MEMORY_SCHEME => Arc::new(MemoryFileSystem::new(uri.host_str().unwrap_or(""))),
            other => {
                return Err(Error::UnsupportedScheme {
                    scheme: other.to_string(),
                });
            }
        };
        tracing::debug!(
            uri = %uri,
            options = env.len(),
            "mounted {} filesystem",
            provider.scheme()
        );
        self.register(uri, Arc::clone(&provider))?;
        Ok(provider)
    }

    /// The mounted provider for the URI, creating one when none exists.
    pub fn resolve(&self, uri: &Url, env: &HashMap<String, String>) -> Result<ProviderRef> {
        match self.get(uri) {
            Some(provider) => Ok(provider),
            None => self.new_file_system(uri, env),
        }
    }
}
