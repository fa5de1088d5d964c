//! In-memory virtual provider (`mem` scheme)
//!
//! Useful for tests and for hosts that keep scratch repositories off disk.
//! URIs take the form `mem://<authority>/<path>`; the authority names the
//! instance so several virtual filesystems can be registered side by side.

use crate::provider::{DirEntry, FileAttributes, FileKind, FileSystemProvider};
use crate::{Error, NormalizedPath, Result};
use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;
use url::Url;

pub const MEMORY_SCHEME: &str = "mem";

#[derive(Debug, Clone)]
struct Node {
    content: Option<Vec<u8>>,
    created: SystemTime,
    modified: SystemTime,
}

impl Node {
    fn dir() -> Self {
        let now = SystemTime::now();
        Self {
            content: None,
            created: now,
            modified: now,
        }
    }

    fn file(content: Vec<u8>) -> Self {
        let now = SystemTime::now();
        Self {
            content: Some(content),
            created: now,
            modified: now,
        }
    }

    fn is_dir(&self) -> bool {
        self.content.is_none()
    }
}

/// A virtual filesystem held entirely in memory.
#[derive(Debug)]
pub struct MemoryFileSystem {
    authority: String,
    nodes: RwLock<BTreeMap<NormalizedPath, Node>>,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new("")
    }
}

fn fail(path: &NormalizedPath, kind: ErrorKind, message: &str) -> Error {
    Error::io(path.to_native(), std::io::Error::new(kind, message.to_string()))
}

fn is_child_of(candidate: &NormalizedPath, parent: &NormalizedPath) -> bool {
    candidate.parent().as_ref() == Some(parent)
}

impl MemoryFileSystem {
    /// Create an empty filesystem containing only `/`.
    pub fn new(authority: impl Into<String>) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(NormalizedPath::root(), Node::dir());
        Self {
            authority: authority.into(),
            nodes: RwLock::new(nodes),
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    fn read_nodes(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<NormalizedPath, Node>> {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_nodes(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<NormalizedPath, Node>> {
        self.nodes.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_parent_dir(
        nodes: &BTreeMap<NormalizedPath, Node>,
        path: &NormalizedPath,
    ) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| fail(path, ErrorKind::InvalidInput, "path has no parent"))?;
        match nodes.get(&parent) {
            Some(node) if node.is_dir() => Ok(()),
            Some(_) => Err(fail(&parent, ErrorKind::NotADirectory, "parent is a file")),
            None => Err(fail(&parent, ErrorKind::NotFound, "parent does not exist")),
        }
    }

    fn has_children(nodes: &BTreeMap<NormalizedPath, Node>, path: &NormalizedPath) -> bool {
        nodes.keys().any(|key| key != path && key.starts_with(path))
    }
}

impl FileSystemProvider for MemoryFileSystem {
    fn scheme(&self) -> &str {
        MEMORY_SCHEME
    }

    fn path_from_uri(&self, uri: &Url) -> Result<NormalizedPath> {
        if uri.scheme() != MEMORY_SCHEME {
            return Err(Error::UnsupportedScheme {
                scheme: uri.scheme().to_string(),
            });
        }
        if uri.host_str().unwrap_or("") != self.authority {
            return Err(Error::invalid_uri(
                uri.as_str(),
                format!("authority does not match '{}'", self.authority),
            ));
        }
        let decoded = percent_decode_str(uri.path())
            .decode_utf8()
            .map_err(|e| Error::invalid_uri(uri.as_str(), e.to_string()))?;
        Ok(NormalizedPath::root().join(&decoded))
    }

    fn uri_from_path(&self, path: &NormalizedPath) -> Result<Url> {
        let base = format!("{}://{}", MEMORY_SCHEME, self.authority);
        let mut uri = Url::parse(&base).map_err(|e| Error::invalid_uri(&base, e.to_string()))?;
        uri.set_path(path.as_str());
        Ok(uri)
    }

    fn metadata(&self, path: &NormalizedPath) -> Result<FileAttributes> {
        let nodes = self.read_nodes();
        let node = nodes
            .get(path)
            .ok_or_else(|| fail(path, ErrorKind::NotFound, "no such file or directory"))?;
        Ok(FileAttributes {
            kind: if node.is_dir() {
                FileKind::Directory
            } else {
                FileKind::File
            },
            len: node.content.as_ref().map(|c| c.len() as u64).unwrap_or(0),
            created: Some(node.created),
            modified: Some(node.modified),
        })
    }

    fn read_dir(&self, path: &NormalizedPath) -> Result<Vec<DirEntry>> {
        let nodes = self.read_nodes();
        match nodes.get(path) {
            Some(node) if node.is_dir() => {}
            Some(_) => return Err(fail(path, ErrorKind::NotADirectory, "not a directory")),
            None => return Err(fail(path, ErrorKind::NotFound, "no such directory")),
        }
        Ok(nodes
            .iter()
            .filter(|(key, _)| is_child_of(key, path))
            .map(|(key, node)| DirEntry {
                path: key.clone(),
                is_dir: node.is_dir(),
            })
            .collect())
    }

    fn create_dir(&self, path: &NormalizedPath) -> Result<()> {
        let mut nodes = self.write_nodes();
        if nodes.contains_key(path) {
            return Err(fail(path, ErrorKind::AlreadyExists, "already exists"));
        }
        Self::require_parent_dir(&nodes, path)?;
        nodes.insert(path.clone(), Node::dir());
        Ok(())
    }

    fn create_dir_all(&self, path: &NormalizedPath) -> Result<()> {
        let mut nodes = self.write_nodes();
        let mut missing = Vec::new();
        let mut current = Some(path.clone());
        while let Some(dir) = current {
            match nodes.get(&dir) {
                Some(node) if node.is_dir() => break,
                Some(_) => return Err(fail(&dir, ErrorKind::NotADirectory, "is a file")),
                None => {
                    current = dir.parent();
                    missing.push(dir);
                }
            }
        }
        for dir in missing.into_iter().rev() {
            nodes.insert(dir, Node::dir());
        }
        Ok(())
    }

    fn remove_file(&self, path: &NormalizedPath) -> Result<()> {
        let mut nodes = self.write_nodes();
        match nodes.get(path) {
            Some(node) if node.is_dir() => {
                Err(fail(path, ErrorKind::IsADirectory, "is a directory"))
            }
            Some(_) => {
                nodes.remove(path);
                Ok(())
            }
            None => Err(fail(path, ErrorKind::NotFound, "no such file")),
        }
    }

    fn remove_dir(&self, path: &NormalizedPath) -> Result<()> {
        let mut nodes = self.write_nodes();
        match nodes.get(path) {
            Some(node) if !node.is_dir() => {
                Err(fail(path, ErrorKind::NotADirectory, "not a directory"))
            }
            Some(_) if path.is_root() => {
                Err(fail(path, ErrorKind::PermissionDenied, "cannot remove root"))
            }
            Some(_) if Self::has_children(&nodes, path) => Err(fail(
                path,
                ErrorKind::DirectoryNotEmpty,
                "directory not empty",
            )),
            Some(_) => {
                nodes.remove(path);
                Ok(())
            }
            None => Err(fail(path, ErrorKind::NotFound, "no such directory")),
        }
    }

    fn copy(&self, from: &NormalizedPath, to: &NormalizedPath) -> Result<()> {
        let mut nodes = self.write_nodes();
        let content = match nodes.get(from) {
            Some(Node {
                content: Some(content),
                ..
            }) => content.clone(),
            Some(_) => return Err(fail(from, ErrorKind::IsADirectory, "cannot copy a directory")),
            None => return Err(fail(from, ErrorKind::NotFound, "no such file")),
        };
        if nodes.get(to).is_some_and(Node::is_dir) {
            return Err(fail(to, ErrorKind::IsADirectory, "destination is a directory"));
        }
        Self::require_parent_dir(&nodes, to)?;
        nodes.insert(to.clone(), Node::file(content));
        Ok(())
    }

    fn rename(&self, from: &NormalizedPath, to: &NormalizedPath) -> Result<()> {
        let mut nodes = self.write_nodes();
        let source_is_dir = match nodes.get(from) {
            Some(node) => node.is_dir(),
            None => return Err(fail(from, ErrorKind::NotFound, "no such file or directory")),
        };
        if from == to {
            return Ok(());
        }
        if source_is_dir && to.starts_with(from) {
            return Err(fail(to, ErrorKind::InvalidInput, "cannot move a directory into itself"));
        }
        Self::require_parent_dir(&nodes, to)?;
        match nodes.get(to) {
            Some(dest) if dest.is_dir() && !source_is_dir => {
                return Err(fail(to, ErrorKind::IsADirectory, "destination is a directory"));
            }
            Some(dest) if !dest.is_dir() && source_is_dir => {
                return Err(fail(to, ErrorKind::NotADirectory, "destination is a file"));
            }
            Some(_) if Self::has_children(&nodes, to) => {
                return Err(fail(to, ErrorKind::DirectoryNotEmpty, "destination not empty"));
            }
            _ => {}
        }

        let moved: Vec<NormalizedPath> = nodes
            .keys()
            .filter(|key| key.starts_with(from))
            .cloned()
            .collect();
        for old in moved {
            if let Some(node) = nodes.remove(&old) {
                let rest = old.strip_prefix(from).unwrap_or("");
                nodes.insert(to.join(rest), node);
            }
        }
        Ok(())
    }

    fn read(&self, path: &NormalizedPath) -> Result<Vec<u8>> {
        let nodes = self.read_nodes();
        match nodes.get(path) {
            Some(Node {
                content: Some(content),
                ..
            }) => Ok(content.clone()),
            Some(_) => Err(fail(path, ErrorKind::IsADirectory, "is a directory")),
            None => Err(fail(path, ErrorKind::NotFound, "no such file")),
        }
    }

    fn write(&self, path: &NormalizedPath, content: &[u8]) -> Result<()> {
        let mut nodes = self.write_nodes();
        match nodes.get_mut(path) {
            Some(node) if node.is_dir() => {
                Err(fail(path, ErrorKind::IsADirectory, "is a directory"))
            }
            Some(node) => {
                node.content = Some(content.to_vec());
                node.modified = SystemTime::now();
                Ok(())
            }
            None => {
                Self::require_parent_dir(&nodes, path)?;
                nodes.insert(path.clone(), Node::file(content.to_vec()));
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(path: &str) -> NormalizedPath {
        NormalizedPath::new(path)
    }

    #[test]
    fn create_dir_requires_parent() {
        let fs = MemoryFileSystem::default();
        let err = fs.create_dir(&p("/a/b")).unwrap_err();
        assert!(err.is_not_found());
        fs.create_dir_all(&p("/a/b")).unwrap();
        assert!(fs.is_dir(&p("/a")));
        assert!(fs.create_dir(&p("/a/b")).unwrap_err().is_already_exists());
    }

    #[test]
    fn read_dir_lists_only_immediate_children() {
        let fs = MemoryFileSystem::default();
        fs.create_dir_all(&p("/a/b/c")).unwrap();
        fs.write(&p("/a/file.txt"), b"x").unwrap();

        let names: Vec<_> = fs
            .read_dir(&p("/a"))
            .unwrap()
            .into_iter()
            .map(|e| (e.file_name().to_string(), e.is_dir))
            .collect();
        assert_eq!(
            names,
            vec![("b".to_string(), true), ("file.txt".to_string(), false)]
        );
    }

    #[test]
    fn remove_dir_refuses_non_empty_directory() {
        let fs = MemoryFileSystem::default();
        fs.create_dir_all(&p("/a")).unwrap();
        fs.write(&p("/a/x"), b"1").unwrap();
        let err = fs.remove_dir(&p("/a")).unwrap_err();
        assert_eq!(err.io_kind(), Some(ErrorKind::DirectoryNotEmpty));
    }

    #[test]
    fn rename_moves_whole_subtree() {
        let fs = MemoryFileSystem::default();
        fs.create_dir_all(&p("/src/nested")).unwrap();
        fs.write(&p("/src/nested/f"), b"data").unwrap();

        fs.rename(&p("/src"), &p("/dst")).unwrap();

        assert!(!fs.exists(&p("/src")));
        assert_eq!(fs.read(&p("/dst/nested/f")).unwrap(), b"data");
    }

    #[test]
    fn rename_replaces_existing_file() {
        let fs = MemoryFileSystem::default();
        fs.write(&p("/a"), b"new").unwrap();
        fs.write(&p("/b"), b"old").unwrap();
        fs.rename(&p("/a"), &p("/b")).unwrap();
        assert_eq!(fs.read(&p("/b")).unwrap(), b"new");
    }

    #[test]
    fn uri_roundtrip_decodes_spaces() {
        let fs = MemoryFileSystem::new("scratch");
        let path = p("/my dir/a.bpmn");
        let uri = fs.uri_from_path(&path).unwrap();
        assert_eq!(uri.as_str(), "mem://scratch/my%20dir/a.bpmn");
        assert_eq!(fs.path_from_uri(&uri).unwrap(), path);
    }

    #[test]
    fn root_cannot_be_removed() {
        let fs = MemoryFileSystem::default();
        assert!(fs.remove_dir(&NormalizedPath::root()).is_err());
    }
}
