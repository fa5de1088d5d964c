//! Shared test fixtures for the designer repository workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`repo`]: [`TestRepo`], a repository root in a temporary directory
//! - [`memory`]: seeded in-memory filesystems

pub mod memory;
pub mod repo;

pub use memory::seeded;
pub use repo::TestRepo;
