//! Repository adapter over a hierarchical filesystem provider
//!
//! [`VfsRepository`] binds a root URI to the provider serving its scheme
//! and maps every location, identifier and asset operation onto provider
//! calls. Identifiers are the URL-safe base64 form of an entry's absolute
//! URI (see [`crate::uid`]).

use crate::asset::{Asset, ContentKind};
use crate::directory::Directory;
use crate::factory::AssetBuilderFactory;
use crate::filter::{FilesOnly, Filter};
use crate::profile::RepositoryProfile;
use crate::repository::Repository;
use crate::{Error, Result, uid};
use chrono::{DateTime, Utc};
use designer_fs::{DirEntry, FileSystems, NormalizedPath, ProviderRef, TreeWalk};
use std::io::ErrorKind;
use std::time::SystemTime;
use tracing::{debug, warn};
use url::Url;

#[cfg(windows)]
const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
const LINE_SEPARATOR: &str = "\n";

/// Files never carried over by a directory copy.
const SKIPPED_ON_COPY: &str = ".gitignore";

/// A [`Repository`] stored on a [`designer_fs::FileSystemProvider`].
#[derive(Debug)]
pub struct VfsRepository {
    root_uri: String,
    root: NormalizedPath,
    provider: ProviderRef,
    builders: AssetBuilderFactory,
}

fn trim_root(root: &str) -> &str {
    root.strip_suffix('/').unwrap_or(root)
}

fn parse_root(root: &str) -> Result<Url> {
    let uri = Url::parse(root).map_err(|e| Error::InvalidRoot {
        root: root.to_string(),
        message: e.to_string(),
    })?;
    if uri.cannot_be_a_base() {
        return Err(Error::InvalidRoot {
            root: root.to_string(),
            message: "not a hierarchical URI".to_string(),
        });
    }
    Ok(uri)
}

fn format_time(time: Option<SystemTime>) -> String {
    time.map(|t| DateTime::<Utc>::from(t).to_rfc3339())
        .unwrap_or_default()
}

impl VfsRepository {
    /// Open the repository described by `profile` with a fresh provider
    /// registry.
    pub fn new(profile: &RepositoryProfile) -> Result<Self> {
        Self::with_file_systems(profile, &FileSystems::new())
    }

    /// Open the repository described by `profile`, reusing providers
    /// already mounted in `file_systems`.
    ///
    /// When the profile carries a fetch command, the provider is resolved
    /// again from the root URI with the command appended.
    pub fn with_file_systems(
        profile: &RepositoryProfile,
        file_systems: &FileSystems,
    ) -> Result<Self> {
        let root_uri = trim_root(&profile.repository_root).to_string();
        let uri = parse_root(&root_uri)?;

        let mut provider =
            file_systems
                .resolve(&uri, &profile.env)
                .map_err(|source| Error::ProviderInit {
                    uri: root_uri.clone(),
                    source,
                })?;

        if let Some(fetch) = profile.fetch_command() {
            let fetch_uri = format!("{}{}", root_uri, fetch);
            let parsed = parse_root(&fetch_uri)?;
            debug!(uri = %parsed, "re-resolving filesystem for fetch command");
            provider = file_systems
                .resolve(&parsed, &profile.env)
                .map_err(|source| Error::ProviderInit {
                    uri: fetch_uri,
                    source,
                })?;
        }

        Self::bind(root_uri, &uri, provider, profile.asset_builders())
    }

    /// Bind `root` to an already constructed provider.
    pub fn with_provider(
        root: &str,
        provider: ProviderRef,
        builders: AssetBuilderFactory,
    ) -> Result<Self> {
        let root_uri = trim_root(root).to_string();
        let uri = parse_root(&root_uri)?;
        Self::bind(root_uri, &uri, provider, builders)
    }

    fn bind(
        root_uri: String,
        uri: &Url,
        provider: ProviderRef,
        builders: AssetBuilderFactory,
    ) -> Result<Self> {
        let root = provider
            .path_from_uri(uri)
            .map_err(|source| Error::ProviderInit {
                uri: root_uri.clone(),
                source,
            })?;
        debug!(root = %root_uri, path = %root, scheme = provider.scheme(), "repository bound");
        Ok(Self {
            root_uri,
            root,
            provider,
            builders,
        })
    }

    /// Root URI as configured, without a trailing separator.
    pub fn repository_root(&self) -> &str {
        &self.root_uri
    }

    /// Provider path of the repository root.
    pub fn root_path(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn provider(&self) -> &ProviderRef {
        &self.provider
    }

    /// Identifier of the entry at `path`.
    pub fn id_for_path(&self, path: &NormalizedPath) -> designer_fs::Result<String> {
        let uri = self.provider.uri_from_path(path)?;
        Ok(uid::encode(uri.as_str()))
    }

    fn resolve_location(&self, location: &str) -> Result<NormalizedPath> {
        let path = self.root.join(location);
        if path.starts_with(&self.root) {
            Ok(path)
        } else {
            Err(Error::OutsideRoot {
                location: location.to_string(),
            })
        }
    }

    fn resolve_child(&self, location: &str, name: &str) -> Result<NormalizedPath> {
        let path = self.resolve_location(location)?.join(name);
        if path.starts_with(&self.root) {
            Ok(path)
        } else {
            Err(Error::OutsideRoot {
                location: format!("{}/{}", location.trim_end_matches('/'), name),
            })
        }
    }

    /// Path named by an identifier. Identifiers of entries outside the root
    /// are refused like escaping locations.
    fn path_for_id(&self, id: &str) -> Result<NormalizedPath> {
        let decoded = uid::decode(id);
        let uri = Url::parse(&decoded)
            .map_err(|e| designer_fs::Error::invalid_uri(&decoded, e.to_string()))?;
        let path = self.provider.path_from_uri(&uri)?;
        if !path.starts_with(&self.root) {
            return Err(Error::OutsideRoot { location: decoded });
        }
        Ok(path)
    }

    /// Path named by `id`, or by `id` read as a root-relative location when
    /// it is not an identifier or URI this repository can resolve.
    fn locate(&self, id: &str) -> Option<NormalizedPath> {
        match self.path_for_id(id) {
            Ok(path) => Some(path),
            Err(_) => self.resolve_location(id).ok(),
        }
    }

    /// Parent of `path` relative to the root, `/`-prefixed.
    fn trim_location(&self, path: &NormalizedPath) -> String {
        let parent = path.parent().unwrap_or_else(NormalizedPath::root);
        match parent.strip_prefix(&self.root) {
            Some(rest) => format!("/{}", rest),
            None => parent.to_string(),
        }
    }

    fn create_parent_if_missing(&self, path: &NormalizedPath) -> designer_fs::Result<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        if self.provider.exists(&parent) {
            return Ok(());
        }
        match self.provider.create_dir_all(&parent) {
            Err(e) if !e.is_already_exists() => Err(e),
            _ => Ok(()),
        }
    }

    fn build_directory(&self, path: &NormalizedPath) -> designer_fs::Result<Directory> {
        Ok(Directory::new(
            self.id_for_path(path)?,
            path.file_name().unwrap_or(""),
            self.trim_location(path),
        ))
    }

    fn build_asset(&self, path: &NormalizedPath, load_content: bool) -> designer_fs::Result<Asset> {
        let Some(file_name) = path.file_name() else {
            return Err(designer_fs::Error::io(
                path.to_native(),
                std::io::Error::new(ErrorKind::InvalidInput, "path has no file name"),
            ));
        };
        let attributes = self.provider.metadata(path)?;
        let mut builder = self
            .builders
            .builder(file_name)
            .unique_id(self.id_for_path(path)?)
            .location(self.trim_location(path))
            .creation_date(format_time(attributes.created))
            .last_modification_date(format_time(attributes.modified));

        if load_content {
            builder = if builder.kind() == ContentKind::Bytes {
                let bytes = self.provider.read(path)?;
                builder.content(bytes)
            } else {
                let lines = self.provider.read_to_lines(path)?;
                builder.content(lines.join(LINE_SEPARATOR))
            };
        }
        Ok(builder.build())
    }

    fn build_assets<'e>(&self, entries: impl IntoIterator<Item = &'e DirEntry>) -> Vec<Asset> {
        entries
            .into_iter()
            .filter_map(|entry| match self.build_asset(&entry.path, false) {
                Ok(asset) => Some(asset),
                Err(e) => {
                    warn!(path = %entry.path, error = %e, "skipping unreadable entry");
                    None
                }
            })
            .collect()
    }

    fn ensure_directory(&self, location: &str) -> Result<NormalizedPath> {
        let path = self.resolve_location(location)?;
        if !self.provider.is_dir(&path) {
            return Err(Error::DirectoryNotFound {
                location: location.to_string(),
            });
        }
        Ok(path)
    }

    fn refuse_nested(
        &self,
        source: &NormalizedPath,
        destination: &NormalizedPath,
    ) -> Result<()> {
        if destination.starts_with(source) {
            return Err(Error::InvalidDestination {
                source_location: source.to_string(),
                destination: destination.to_string(),
            });
        }
        Ok(())
    }

    /// Post-visit step of a directory move.
    fn relocate_dir(
        &self,
        dir: &NormalizedPath,
        target: &NormalizedPath,
    ) -> designer_fs::Result<()> {
        if self.provider.is_dir(target) {
            return self.provider.remove_dir(dir);
        }
        self.create_parent_if_missing(target)?;
        match self.provider.rename(dir, target) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(from = %dir, to = %target, error = %e, "rename failed, removing empty source");
                self.provider.remove_dir(dir).map_err(|_| e)
            }
        }
    }

    fn place_asset(
        &self,
        id: &str,
        destination: &str,
        new_name: Option<&str>,
        keep_source: bool,
    ) -> Result<()> {
        let source = self
            .locate(id)
            .filter(|path| self.provider.exists(path))
            .ok_or_else(|| Error::asset_not_found(id))?;
        let name = match new_name {
            Some(name) => name,
            None => source.file_name().ok_or_else(|| Error::asset_not_found(id))?,
        };
        let target = self.resolve_child(destination, name)?;

        let result = self.create_parent_if_missing(&target).and_then(|()| {
            if keep_source {
                self.provider.copy(&source, &target)
            } else {
                self.provider.rename(&source, &target)
            }
        });
        result.map_err(|e| {
            warn!(from = %source, to = %target, error = %e, "error when placing asset");
            Error::from(e)
        })
    }
}

impl Repository for VfsRepository {
    fn list_directories(&self, start_at: &str) -> Result<Vec<Directory>> {
        debug!(location = start_at, "listing directories");
        let path = self.resolve_location(start_at)?;
        let directories = self
            .provider
            .read_dir(&path)?
            .iter()
            .filter(|entry| entry.is_dir)
            .map(|entry| self.build_directory(&entry.path))
            .collect::<designer_fs::Result<Vec<_>>>()?;
        Ok(directories)
    }

    fn list_assets_recursively(&self, start_at: &str, filter: &dyn Filter) -> Result<Vec<Asset>> {
        debug!(location = start_at, "listing assets recursively");
        let path = self.resolve_location(start_at)?;
        let mut found = Vec::new();
        TreeWalk::new()
            .visit_file(|file| {
                let entry = DirEntry {
                    path: file.clone(),
                    is_dir: false,
                };
                if filter.accept(&entry) {
                    found.extend(self.build_assets([&entry]));
                }
                Ok(())
            })
            .run(&*self.provider, &path)?;
        Ok(found)
    }

    fn create_directory(&self, location: &str) -> Result<Directory> {
        debug!(location, "creating directory");
        let path = self.resolve_location(location)?;
        self.provider.create_dir_all(&path)?;
        Ok(self.build_directory(&path)?)
    }

    fn directory_exists(&self, location: &str) -> bool {
        self.resolve_location(location)
            .map(|path| self.provider.is_dir(&path))
            .unwrap_or(false)
    }

    fn delete_directory(&self, location: &str, fail_if_not_empty: bool) -> Result<()> {
        debug!(location, fail_if_not_empty, "deleting directory");
        let path = self.resolve_location(location)?;
        if !self.provider.is_dir(&path) {
            return Err(Error::NotADirectory {
                location: location.to_string(),
            });
        }
        if fail_if_not_empty && !self.provider.read_dir(&path)?.is_empty() {
            return Err(Error::DirectoryNotEmpty {
                location: location.to_string(),
            });
        }

        TreeWalk::new()
            .visit_file(|file| self.provider.remove_file(file))
            .post_visit_dir(|dir| self.provider.remove_if_exists(dir).map(|_| ()))
            .run(&*self.provider, &path)
            .map_err(|e| {
                warn!(location, error = %e, "error when deleting directory");
                Error::from(e)
            })
    }

    fn copy_directory(&self, source: &str, destination: &str) -> Result<()> {
        debug!(source, destination, "copying directory");
        let source_path = self.ensure_directory(source)?;
        let name = source_path.file_name().unwrap_or("");
        let target_root = self.resolve_child(destination, name)?;
        self.refuse_nested(&source_path, &target_root)?;

        let target_of = |path: &NormalizedPath| {
            target_root.join(path.strip_prefix(&source_path).unwrap_or(""))
        };

        TreeWalk::new()
            .pre_visit_dir(|dir| {
                let target = target_of(dir);
                match self.provider.create_dir_all(&target) {
                    Err(e) if !e.is_already_exists() => Err(e),
                    _ => Ok(()),
                }
            })
            .visit_file(|file| {
                if file.file_name() == Some(SKIPPED_ON_COPY) {
                    return Ok(());
                }
                let target = target_of(file);
                self.create_parent_if_missing(&target)?;
                self.provider.copy(file, &target)
            })
            .run(&*self.provider, &source_path)
            .map_err(|e| {
                warn!(source, destination, error = %e, "error when copying directory");
                Error::from(e)
            })
    }

    fn move_directory(
        &self,
        source: &str,
        destination: &str,
        new_name: Option<&str>,
    ) -> Result<()> {
        debug!(source, destination, new_name, "moving directory");
        let source_path = self.ensure_directory(source)?;
        let name = new_name
            .or_else(|| source_path.file_name())
            .unwrap_or("");
        let target_root = self.resolve_child(destination, name)?;
        self.refuse_nested(&source_path, &target_root)?;

        let target_of = |path: &NormalizedPath| {
            target_root.join(path.strip_prefix(&source_path).unwrap_or(""))
        };

        TreeWalk::new()
            .visit_file(|file| {
                let target = target_of(file);
                self.create_parent_if_missing(&target)?;
                self.provider.rename(file, &target)
            })
            .post_visit_dir(|dir| self.relocate_dir(dir, &target_of(dir)))
            .run(&*self.provider, &source_path)
            .map_err(|e| {
                warn!(source, destination, error = %e, "error when moving directory");
                Error::from(e)
            })
    }

    fn list_assets(&self, location: &str) -> Result<Vec<Asset>> {
        self.list_assets_filtered(location, &FilesOnly)
    }

    fn list_assets_filtered(&self, location: &str, filter: &dyn Filter) -> Result<Vec<Asset>> {
        debug!(location, "listing assets");
        let path = self.resolve_location(location)?;
        let entries = self.provider.read_dir(&path)?;
        Ok(self.build_assets(entries.iter().filter(|entry| filter.accept(entry))))
    }

    fn load_asset(&self, id: &str) -> Result<Asset> {
        debug!(id, "loading asset");
        let loaded = match self.path_for_id(id) {
            Ok(path) => self.build_asset(&path, true).map_err(Error::from),
            Err(e) => Err(e),
        };
        loaded.map_err(|e| {
            debug!(id, error = %e, "asset could not be loaded");
            Error::asset_not_found(id)
        })
    }

    fn load_asset_from_path(&self, location: &str) -> Result<Asset> {
        let path = self
            .resolve_location(location)
            .map_err(|_| Error::asset_not_found(location))?;
        if !self.provider.exists(&path) {
            return Err(Error::asset_not_found(location));
        }
        let id = self.id_for_path(&path)?;
        self.load_asset(&id)
    }

    fn create_asset(&self, asset: &Asset) -> Result<String> {
        debug!(location = asset.location(), name = %asset.full_name(), "creating asset");
        let path = self.resolve_child(asset.location(), &asset.full_name())?;
        let written = self
            .create_parent_if_missing(&path)
            .and_then(|()| self.provider.write(&path, asset.content_bytes()));
        if let Err(source) = written {
            return Err(Error::AssetWrite {
                path: path.to_string(),
                source,
            });
        }
        Ok(self.id_for_path(&path)?)
    }

    fn update_asset(&self, asset: &Asset) -> Result<String> {
        let id = asset.unique_id().ok_or_else(|| Error::asset_not_found(""))?;
        debug!(id, "updating asset");
        let path = self
            .path_for_id(id)
            .map_err(|_| Error::asset_not_found(id))?;
        if !self.provider.exists(&path) {
            return Err(Error::asset_not_found(id));
        }
        self.provider
            .write(&path, asset.content_bytes())
            .map_err(|e| {
                warn!(id, error = %e, "error when updating asset");
                Error::from(e)
            })?;
        Ok(id.to_string())
    }

    fn delete_asset(&self, id: &str) -> Result<bool> {
        debug!(id, "deleting asset");
        let path = self.path_for_id(id)?;
        self.provider.remove_if_exists(&path).map_err(|e| {
            warn!(id, error = %e, "error when deleting asset");
            Error::from(e)
        })
    }

    fn delete_asset_from_path(&self, location: &str) -> Result<bool> {
        let path = self.resolve_location(location)?;
        let id = self.id_for_path(&path)?;
        self.delete_asset(&id)
    }

    fn asset_exists(&self, id: &str) -> bool {
        self.locate(id)
            .is_some_and(|path| self.provider.exists(&path))
    }

    fn copy_asset(&self, id: &str, destination: &str, new_name: Option<&str>) -> Result<()> {
        debug!(id, destination, new_name, "copying asset");
        self.place_asset(id, destination, new_name, true)
    }

    fn move_asset(&self, id: &str, destination: &str, new_name: Option<&str>) -> Result<()> {
        debug!(id, destination, new_name, "moving asset");
        self.place_asset(id, destination, new_name, false)
    }
}
