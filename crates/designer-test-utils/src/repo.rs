//! [`TestRepo`]: an on-disk repository root for designer test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use url::Url;

/// Name of the repository root inside the temporary directory.
pub const ROOT_NAME: &str = "designer-repo";

/// A temporary `designer-repo` directory with helpers for seeding files
/// and asserting on what a repository left behind.
///
/// # Example
///
/// ```rust,no_run
/// use designer_test_utils::TestRepo;
///
/// let repo = TestRepo::new();
/// repo.write_file("processes/a.bpmn", "<xml/>");
/// repo.assert_file_exists("processes/a.bpmn");
/// println!("{}", repo.root_uri());
/// ```
pub struct TestRepo {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    /// Create an empty repository root.
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap_or_else(|e| panic!("TestRepo: no temp dir: {e}"));
        let root = temp_dir.path().join(ROOT_NAME);
        fs::create_dir_all(&root)
            .unwrap_or_else(|e| panic!("TestRepo: failed to create {}: {e}", root.display()));
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Create a repository root that is a symlink to a sibling `storage`
    /// directory.
    ///
    /// # Panics
    /// Panics if the directory or the link cannot be created.
    #[cfg(unix)]
    pub fn with_linked_root() -> Self {
        let temp_dir = TempDir::new().unwrap_or_else(|e| panic!("TestRepo: no temp dir: {e}"));
        let storage = temp_dir.path().join("storage");
        fs::create_dir(&storage)
            .unwrap_or_else(|e| panic!("TestRepo: failed to create {}: {e}", storage.display()));
        let root = temp_dir.path().join(ROOT_NAME);
        std::os::unix::fs::symlink(&storage, &root)
            .unwrap_or_else(|e| panic!("TestRepo: failed to link {}: {e}", root.display()));
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Filesystem path of the repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `file://` URI of the repository root, without a trailing slash.
    ///
    /// # Panics
    /// Panics if the root is not an absolute path.
    pub fn root_uri(&self) -> String {
        Url::from_file_path(&self.root)
            .unwrap_or_else(|()| panic!("TestRepo: {} is not absolute", self.root.display()))
            .to_string()
    }

    /// Write `content` to `path` (relative to the root), creating parents.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn write_file(&self, path: &str, content: impl AsRef<[u8]>) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("TestRepo: failed to create {}: {e}", parent.display())
            });
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("TestRepo: failed to write {}: {e}", full_path.display()));
    }

    /// Create an empty directory at `path` (relative to the root).
    ///
    /// # Panics
    /// Panics if the directory cannot be created.
    pub fn create_dir(&self, path: &str) {
        let full_path = self.root.join(path);
        fs::create_dir_all(&full_path)
            .unwrap_or_else(|e| panic!("TestRepo: failed to create {}: {e}", full_path.display()));
    }

    /// Raw bytes of the file at `path` (relative to the root).
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_file(&self, path: &str) -> Vec<u8> {
        let full_path = self.root.join(path);
        fs::read(&full_path)
            .unwrap_or_else(|e| panic!("Could not read file {}: {e}", full_path.display()))
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root.join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root.join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to the root) contains
    /// `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = String::from_utf8_lossy(&self.read_file(path)).into_owned();
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}
