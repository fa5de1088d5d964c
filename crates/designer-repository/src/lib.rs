//! Filesystem-backed asset repository for the process designer
//!
//! [`VfsRepository`] stores directories and assets below a root URI on any
//! [`designer_fs::FileSystemProvider`]. Callers address entries by
//! root-relative locations (`/processes/order.bpmn`) or by the opaque
//! identifiers the repository hands out.
//!
//! ```no_run
//! use designer_repository::{AssetBuilderFactory, Repository, RepositoryProfile, VfsRepository};
//!
//! # fn main() -> designer_repository::Result<()> {
//! let repo = VfsRepository::new(&RepositoryProfile::new("file:///srv/designer-repo"))?;
//! repo.create_directory("/processes")?;
//!
//! let asset = AssetBuilderFactory::new()
//!     .builder("order.bpmn")
//!     .location("/processes")
//!     .content("<definitions/>")
//!     .build();
//! let id = repo.create_asset(&asset)?;
//! assert_eq!(repo.load_asset(&id)?.content_bytes(), b"<definitions/>");
//! # Ok(())
//! # }
//! ```

pub mod asset;
pub mod directory;
pub mod error;
pub mod factory;
pub mod filter;
pub mod logging;
pub mod profile;
pub mod repository;
pub mod uid;
pub mod vfs;

pub use asset::{Asset, AssetBuilder, AssetContent, ContentKind};
pub use directory::Directory;
pub use error::{Error, ErrorClass, Result};
pub use factory::AssetBuilderFactory;
pub use filter::{AcceptAll, ExtensionFilter, FileNameFilter, FilesOnly, Filter};
pub use profile::{FETCH_COMMAND, RepositoryProfile};
pub use repository::Repository;
pub use vfs::VfsRepository;
