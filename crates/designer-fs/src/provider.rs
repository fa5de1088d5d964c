//! The hierarchical filesystem provider interface
//!
//! A provider owns one URI scheme and translates between URIs and
//! [`NormalizedPath`]s. Every operation works on absolute normalized paths.

use crate::{Error, NormalizedPath, Result};
use std::fmt::Debug;
use std::time::SystemTime;
use url::Url;

/// Whether an entry is a regular file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
}

/// Basic attributes of a filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttributes {
    pub kind: FileKind,
    pub len: u64,
    /// Not every platform records a creation time
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
}

impl FileAttributes {
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: NormalizedPath,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or("")
    }
}

/// Capability interface implemented by every filesystem backend.
///
/// Failures are reported as [`Error::Io`] carrying the `std::io::ErrorKind`
/// a local disk would produce, so callers can treat providers uniformly.
pub trait FileSystemProvider: Debug + Send + Sync {
    /// The URI scheme served by this provider.
    fn scheme(&self) -> &str;

    /// Separator used in locations and URIs.
    fn separator(&self) -> &str {
        "/"
    }

    /// Resolve a URI of this provider's scheme to a path.
    fn path_from_uri(&self, uri: &Url) -> Result<NormalizedPath>;

    /// Build the absolute URI for a path.
    fn uri_from_path(&self, path: &NormalizedPath) -> Result<Url>;

    fn metadata(&self, path: &NormalizedPath) -> Result<FileAttributes>;

    fn exists(&self, path: &NormalizedPath) -> bool {
        self.metadata(path).is_ok()
    }

    fn is_dir(&self, path: &NormalizedPath) -> bool {
        self.metadata(path).map(|a| a.is_dir()).unwrap_or(false)
    }

    /// Immediate children of a directory.
    fn read_dir(&self, path: &NormalizedPath) -> Result<Vec<DirEntry>>;

    /// Create a single directory. The parent must exist and the target
    /// must not.
    fn create_dir(&self, path: &NormalizedPath) -> Result<()>;

    /// Create a directory and every missing parent.
    fn create_dir_all(&self, path: &NormalizedPath) -> Result<()>;

    fn remove_file(&self, path: &NormalizedPath) -> Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &NormalizedPath) -> Result<()>;

    /// Remove a file or an empty directory. Returns `false` when nothing
    /// existed at `path`.
    fn remove_if_exists(&self, path: &NormalizedPath) -> Result<bool> {
        let result = match self.metadata(path) {
            Ok(attrs) if attrs.is_dir() => self.remove_dir(path),
            Ok(_) => self.remove_file(path),
            Err(e) if e.is_not_found() => return Ok(false),
            Err(e) => return Err(e),
        };
        match result {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Copy a file, replacing an existing destination file.
    fn copy(&self, from: &NormalizedPath, to: &NormalizedPath) -> Result<()>;

    /// Move a file or directory, replacing an existing destination file or
    /// empty directory.
    fn rename(&self, from: &NormalizedPath, to: &NormalizedPath) -> Result<()>;

    fn read(&self, path: &NormalizedPath) -> Result<Vec<u8>>;

    /// Create or truncate a file and write `content` to it.
    fn write(&self, path: &NormalizedPath, content: &[u8]) -> Result<()>;

    /// Read a UTF-8 file as lines with terminators stripped.
    fn read_to_lines(&self, path: &NormalizedPath) -> Result<Vec<String>> {
        let bytes = self.read(path)?;
        let text = String::from_utf8(bytes).map_err(|e| {
            Error::io(
                path.to_native(),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;
        Ok(text.lines().map(str::to_owned).collect())
    }
}
