//! Depth-first tree walk with visitor callbacks
//!
//! ```ignore
//! TreeWalk::new()
//!     .visit_file(|file| provider.remove_file(file))
//!     .post_visit_dir(|dir| provider.remove_dir(dir))
//!     .run(provider, &start)?;
//! ```

use crate::provider::FileSystemProvider;
use crate::{NormalizedPath, Result};

type Callback<'a> = Box<dyn FnMut(&NormalizedPath) -> Result<()> + 'a>;

/// A depth-first walk over a provider subtree.
///
/// Every directory is announced to `pre_visit_dir` before its children and
/// to `post_visit_dir` after them; files go to `visit_file`. A start path
/// that is a file is visited as a file. The first error, from a callback or
/// the provider, stops the walk and is returned.
#[derive(Default)]
pub struct TreeWalk<'a> {
    pre_visit_dir: Option<Callback<'a>>,
    visit_file: Option<Callback<'a>>,
    post_visit_dir: Option<Callback<'a>>,
}

impl<'a> TreeWalk<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pre_visit_dir(mut self, f: impl FnMut(&NormalizedPath) -> Result<()> + 'a) -> Self {
        self.pre_visit_dir = Some(Box::new(f));
        self
    }

    pub fn visit_file(mut self, f: impl FnMut(&NormalizedPath) -> Result<()> + 'a) -> Self {
        self.visit_file = Some(Box::new(f));
        self
    }

    pub fn post_visit_dir(mut self, f: impl FnMut(&NormalizedPath) -> Result<()> + 'a) -> Self {
        self.post_visit_dir = Some(Box::new(f));
        self
    }

    /// Walk the subtree rooted at `start`.
    pub fn run<P>(mut self, provider: &P, start: &NormalizedPath) -> Result<()>
    where
        P: FileSystemProvider + ?Sized,
    {
        if provider.metadata(start)?.is_dir() {
            self.walk_dir(provider, start)
        } else {
            Self::call(&mut self.visit_file, start)
        }
    }

    fn walk_dir<P>(&mut self, provider: &P, dir: &NormalizedPath) -> Result<()>
    where
        P: FileSystemProvider + ?Sized,
    {
        Self::call(&mut self.pre_visit_dir, dir)?;
        for entry in provider.read_dir(dir)? {
            if entry.is_dir {
                self.walk_dir(provider, &entry.path)?;
            } else {
                Self::call(&mut self.visit_file, &entry.path)?;
            }
        }
        Self::call(&mut self.post_visit_dir, dir)
    }

    fn call(callback: &mut Option<Callback<'a>>, path: &NormalizedPath) -> Result<()> {
        match callback {
            Some(f) => f(path),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for TreeWalk<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWalk")
            .field("pre_visit_dir", &self.pre_visit_dir.is_some())
            .field("visit_file", &self.visit_file.is_some())
            .field("post_visit_dir", &self.post_visit_dir.is_some())
            .finish()
    }
}
