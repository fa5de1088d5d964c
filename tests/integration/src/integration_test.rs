//! End-to-end integration tests
//!
//! Exercises the complete flow: profile file -> repository -> directory and
//! asset operations, on the local disk and in memory.

use assert_fs::prelude::*;
use designer_fs::NormalizedPath;
use designer_repository::{
    AssetBuilderFactory, AssetContent, ContentKind, ExtensionFilter, Repository,
    RepositoryProfile, VfsRepository, uid,
};
use designer_test_utils::TestRepo;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

/// Write `body` as a profile file named `file_name` and load it back.
fn load_profile(file_name: &str, body: &str) -> (TempDir, RepositoryProfile) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(file_name);
    fs::write(&path, body).unwrap();
    let profile = RepositoryProfile::load(&NormalizedPath::new(&path)).unwrap();
    (temp, profile)
}

/// Runs the designer's usual editing session against `repo`.
fn editing_session(repo: &VfsRepository) {
    repo.create_directory("/processes").unwrap();
    repo.create_directory("/forms").unwrap();

    let factory = AssetBuilderFactory::new();
    let process = factory
        .builder("order.bpmn")
        .location("/processes")
        .content("<definitions id=\"order\"/>")
        .build();
    let process_id = repo.create_asset(&process).unwrap();

    let form = factory
        .builder("order-taskform.json")
        .location("/forms")
        .content("{\"fields\":[]}")
        .build();
    repo.create_asset(&form).unwrap();

    // Edit the process
    let loaded = repo.load_asset(&process_id).unwrap();
    let edited = loaded.with_content("<definitions id=\"order\" version=\"2\"/>");
    assert_eq!(repo.update_asset(&edited).unwrap(), process_id);

    // Publish a snapshot and archive the working copy
    repo.copy_directory("/processes", "/published").unwrap();
    repo.move_directory("/processes", "/archive", Some("2024"))
        .unwrap();

    assert!(!repo.asset_exists(&process_id));
    let archived = repo.load_asset_from_path("/archive/2024/order.bpmn").unwrap();
    assert_eq!(
        archived.content(),
        Some(&AssetContent::Text(
            "<definitions id=\"order\" version=\"2\"/>".into()
        ))
    );

    let everything = repo
        .list_assets_recursively("/", &ExtensionFilter::new(["bpmn"]))
        .unwrap();
    let mut paths: Vec<_> = everything
        .iter()
        .map(|a| format!("{}/{}", a.location(), a.full_name()))
        .collect();
    paths.sort();
    assert_eq!(
        paths,
        ["/archive/2024/order.bpmn", "/published/processes/order.bpmn"]
    );

    repo.delete_directory("/published", false).unwrap();
    assert!(!repo.directory_exists("/published"));
}

#[test]
fn toml_profile_opens_local_repository() {
    let disk = TestRepo::new();
    let (_temp, profile) = load_profile(
        "designer.toml",
        &format!("repository_root = \"{}/\"\n", disk.root_uri()),
    );

    let repo = VfsRepository::new(&profile).unwrap();
    assert_eq!(repo.repository_root(), disk.root_uri());

    editing_session(&repo);

    disk.assert_file_contains("archive/2024/order.bpmn", "version=\"2\"");
    disk.assert_file_exists("forms/order-taskform.json");
    disk.assert_file_not_exists("processes");
    disk.assert_file_not_exists("published");
}

#[rstest]
#[case("designer.yaml", "repository_root: mem://yaml/repo\n")]
#[case("designer.json", r#"{"repository_root": "mem://json/repo"}"#)]
fn other_profile_formats_open_memory_repository(#[case] file_name: &str, #[case] body: &str) {
    let (_temp, profile) = load_profile(file_name, body);
    let repo = VfsRepository::new(&profile).unwrap();
    editing_session(&repo);
}

#[test]
fn profile_overrides_reach_loaded_assets() {
    let disk = TestRepo::new();
    disk.write_file("processes/order.bpmn", "<definitions/>");

    let body = format!(
        "repository_root = \"{}\"\nbinary_extensions = [\"bpmn\"]\n",
        disk.root_uri()
    );
    let (_temp, profile) = load_profile("designer.toml", &body);
    let repo = VfsRepository::new(&profile).unwrap();

    let asset = repo.load_asset_from_path("/processes/order.bpmn").unwrap();
    assert_eq!(asset.kind(), ContentKind::Bytes);
    assert_eq!(asset.content_bytes(), b"<definitions/>");
}

#[test]
fn saved_profile_loads_back() {
    let temp = assert_fs::TempDir::new().unwrap();
    let path = temp.child("profiles/designer.json");
    fs::create_dir_all(temp.child("profiles").path()).unwrap();

    let profile = RepositoryProfile::new("mem://saved/repo").with_env("fetch.cmd", "?fetch");
    profile.save(&NormalizedPath::new(path.path())).unwrap();

    path.assert(predicate::str::contains("\"fetch.cmd\""));
    let loaded = RepositoryProfile::load(&NormalizedPath::new(path.path())).unwrap();
    assert_eq!(loaded, profile);

    let json: serde_json::Value = serde_json::from_slice(&fs::read(path.path()).unwrap()).unwrap();
    assert_eq!(json["repository_root"], "mem://saved/repo");
}

#[test]
fn identifiers_survive_reopening() {
    let disk = TestRepo::new();
    let profile = RepositoryProfile::new(disk.root_uri());

    let id = {
        let repo = VfsRepository::new(&profile).unwrap();
        let asset = AssetBuilderFactory::new()
            .builder("a.bpmn")
            .location("/processes")
            .content("<xml/>")
            .build();
        repo.create_asset(&asset).unwrap()
    };

    let reopened = VfsRepository::new(&profile).unwrap();
    assert!(reopened.asset_exists(&id));
    assert!(uid::decode(&id).ends_with("/processes/a.bpmn"));
    assert_eq!(reopened.load_asset(&id).unwrap().content_bytes(), b"<xml/>");
}
