//! Local disk provider (`file` scheme)

use crate::provider::{DirEntry, FileAttributes, FileKind, FileSystemProvider};
use crate::{Error, NormalizedPath, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use url::Url;

pub const FILE_SCHEME: &str = "file";

/// Provider backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystemProvider for LocalFileSystem {
    fn scheme(&self) -> &str {
        FILE_SCHEME
    }

    fn path_from_uri(&self, uri: &Url) -> Result<NormalizedPath> {
        if uri.scheme() != FILE_SCHEME {
            return Err(Error::UnsupportedScheme {
                scheme: uri.scheme().to_string(),
            });
        }
        let path = uri
            .to_file_path()
            .map_err(|_| Error::invalid_uri(uri.as_str(), "not a local file path"))?;
        Ok(NormalizedPath::new(path))
    }

    fn uri_from_path(&self, path: &NormalizedPath) -> Result<Url> {
        Url::from_file_path(path.to_native())
            .map_err(|_| Error::invalid_uri(path.as_str(), "path is not absolute"))
    }

    fn metadata(&self, path: &NormalizedPath) -> Result<FileAttributes> {
        let native = path.to_native();
        let meta = fs::metadata(&native).map_err(|e| Error::io(&native, e))?;
        Ok(FileAttributes {
            kind: if meta.is_dir() {
                FileKind::Directory
            } else {
                FileKind::File
            },
            len: meta.len(),
            created: meta.created().ok(),
            modified: meta.modified().ok(),
        })
    }

    fn read_dir(&self, path: &NormalizedPath) -> Result<Vec<DirEntry>> {
        let native = path.to_native();
        let mut entries = Vec::new();
        for entry in fs::read_dir(&native).map_err(|e| Error::io(&native, e))? {
            let entry = entry.map_err(|e| Error::io(&native, e))?;
            let name = entry.file_name();
            // Symlinks are not followed; a linked directory is a file here
            let is_dir = entry
                .file_type()
                .map_err(|e| Error::io(entry.path(), e))?
                .is_dir();
            entries.push(DirEntry {
                path: path.join(&name.to_string_lossy()),
                is_dir,
            });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn create_dir(&self, path: &NormalizedPath) -> Result<()> {
        let native = path.to_native();
        fs::create_dir(&native).map_err(|e| Error::io(&native, e))
    }

    fn create_dir_all(&self, path: &NormalizedPath) -> Result<()> {
        let native = path.to_native();
        fs::create_dir_all(&native).map_err(|e| Error::io(&native, e))
    }

    fn remove_file(&self, path: &NormalizedPath) -> Result<()> {
        let native = path.to_native();
        fs::remove_file(&native).map_err(|e| Error::io(&native, e))
    }

    fn remove_dir(&self, path: &NormalizedPath) -> Result<()> {
        let native = path.to_native();
        fs::remove_dir(&native).map_err(|e| Error::io(&native, e))
    }

    fn copy(&self, from: &NormalizedPath, to: &NormalizedPath) -> Result<()> {
        let source = from.to_native();
        if source.is_dir() {
            return Err(Error::io(
                &source,
                std::io::Error::new(std::io::ErrorKind::IsADirectory, "cannot copy a directory"),
            ));
        }
        fs::copy(&source, to.to_native())
            .map(|_| ())
            .map_err(|e| Error::io(&source, e))
    }

    fn rename(&self, from: &NormalizedPath, to: &NormalizedPath) -> Result<()> {
        let source = from.to_native();
        fs::rename(&source, to.to_native()).map_err(|e| Error::io(&source, e))
    }

    fn read(&self, path: &NormalizedPath) -> Result<Vec<u8>> {
        let native = path.to_native();
        fs::read(&native).map_err(|e| Error::io(&native, e))
    }

    fn write(&self, path: &NormalizedPath, content: &[u8]) -> Result<()> {
        let native = path.to_native();
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&native)
            .map_err(|e| Error::io(&native, e))?;
        file.write_all(content).map_err(|e| Error::io(&native, e))?;
        tracing::trace!(path = %path, bytes = content.len(), "wrote file");
        Ok(())
    }
}
