//! Predicates selecting entries during listings

use designer_fs::DirEntry;
use std::collections::HashSet;

/// Decides whether a filesystem entry is included in a listing.
pub trait Filter {
    fn accept(&self, entry: &DirEntry) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&DirEntry) -> bool,
{
    fn accept(&self, entry: &DirEntry) -> bool {
        self(entry)
    }
}

/// Accepts every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Filter for AcceptAll {
    fn accept(&self, _entry: &DirEntry) -> bool {
        true
    }
}

/// Accepts entries that are not directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesOnly;

impl Filter for FilesOnly {
    fn accept(&self, entry: &DirEntry) -> bool {
        !entry.is_dir
    }
}

/// Accepts files whose extension is one of a set, ignoring case.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    extensions: HashSet<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }
}

impl Filter for ExtensionFilter {
    fn accept(&self, entry: &DirEntry) -> bool {
        !entry.is_dir
            && entry
                .path
                .extension()
                .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }
}

/// Accepts files with exactly the given name.
#[derive(Debug, Clone)]
pub struct FileNameFilter {
    name: String,
}

impl FileNameFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Filter for FileNameFilter {
    fn accept(&self, entry: &DirEntry) -> bool {
        !entry.is_dir && entry.file_name() == self.name
    }
}
