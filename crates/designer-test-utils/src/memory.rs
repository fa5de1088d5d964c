//! In-memory filesystem fixtures.

use designer_fs::{FileSystemProvider, MemoryFileSystem, NormalizedPath};
use std::sync::Arc;

/// A memory filesystem for `authority` holding the given files.
///
/// Paths are absolute; parent directories are created as needed. A path
/// ending in `/` creates an empty directory.
///
/// # Panics
/// Panics if a path cannot be created, e.g. when a file shadows a
/// directory.
pub fn seeded(authority: &str, files: &[(&str, &str)]) -> Arc<MemoryFileSystem> {
    let fs = MemoryFileSystem::new(authority);
    for (path, content) in files {
        let target = NormalizedPath::new(path);
        if path.ends_with('/') {
            fs.create_dir_all(&target)
                .unwrap_or_else(|e| panic!("seeded: failed to create {path}: {e}"));
            continue;
        }
        if let Some(parent) = target.parent() {
            fs.create_dir_all(&parent)
                .unwrap_or_else(|e| panic!("seeded: failed to create parent of {path}: {e}"));
        }
        fs.write(&target, content.as_bytes())
            .unwrap_or_else(|e| panic!("seeded: failed to write {path}: {e}"));
    }
    Arc::new(fs)
}
