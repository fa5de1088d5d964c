//! Filesystem providers for the designer repository
//!
//! A [`FileSystemProvider`] is a hierarchical filesystem addressed by URI.
//! [`FileSystems`] picks the provider for a URI's scheme (`file` for the
//! local disk, `mem` for an in-memory virtual filesystem), and [`TreeWalk`]
//! walks a provider subtree depth-first.

pub mod config;
pub mod error;
pub mod io;
pub mod local;
pub mod memory;
pub mod path;
pub mod provider;
pub mod registry;
pub mod walk;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;
pub use path::NormalizedPath;
pub use provider::{DirEntry, FileAttributes, FileKind, FileSystemProvider};
pub use registry::{FileSystems, ProviderRef};
pub use walk::TreeWalk;
