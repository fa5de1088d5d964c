//! The repository interface consumed by the designer

use crate::asset::Asset;
use crate::directory::Directory;
use crate::filter::Filter;
use crate::Result;

/// Directory and asset operations over a content store.
///
/// Locations are `/`-separated paths relative to the repository root.
/// Identifiers are the opaque values handed out in [`Asset::unique_id`] and
/// [`Directory::unique_id`].
pub trait Repository: Send + Sync {
    /// Immediate subdirectories of `start_at`.
    fn list_directories(&self, start_at: &str) -> Result<Vec<Directory>>;

    /// Every file below `start_at` accepted by `filter`, without content.
    fn list_assets_recursively(&self, start_at: &str, filter: &dyn Filter) -> Result<Vec<Asset>>;

    /// Create `location` and any missing parents.
    fn create_directory(&self, location: &str) -> Result<Directory>;

    fn directory_exists(&self, location: &str) -> bool;

    /// Remove `location` and everything below it.
    fn delete_directory(&self, location: &str, fail_if_not_empty: bool) -> Result<()>;

    /// Copy `source` into `destination`, keeping its name.
    fn copy_directory(&self, source: &str, destination: &str) -> Result<()>;

    /// Move `source` into `destination`, optionally renaming it.
    fn move_directory(&self, source: &str, destination: &str, new_name: Option<&str>)
    -> Result<()>;

    /// Files directly inside `location`, without content.
    fn list_assets(&self, location: &str) -> Result<Vec<Asset>>;

    /// Entries directly inside `location` accepted by `filter`, without
    /// content.
    fn list_assets_filtered(&self, location: &str, filter: &dyn Filter) -> Result<Vec<Asset>>;

    /// Asset with content.
    fn load_asset(&self, id: &str) -> Result<Asset>;

    fn load_asset_from_path(&self, location: &str) -> Result<Asset>;

    /// Store a new asset and return its identifier.
    fn create_asset(&self, asset: &Asset) -> Result<String>;

    /// Rewrite the content of an existing asset.
    fn update_asset(&self, asset: &Asset) -> Result<String>;

    /// Returns `false` when nothing existed under `id`.
    fn delete_asset(&self, id: &str) -> Result<bool>;

    fn delete_asset_from_path(&self, location: &str) -> Result<bool>;

    fn asset_exists(&self, id: &str) -> bool;

    fn copy_asset(&self, id: &str, destination: &str, new_name: Option<&str>) -> Result<()>;

    fn move_asset(&self, id: &str, destination: &str, new_name: Option<&str>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_trait_is_object_safe() {
        fn _assert_object_safe(_: &dyn Repository) {}
    }
}
