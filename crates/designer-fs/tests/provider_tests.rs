//! Behaviour shared by every provider.
//!
//! Each test runs against the local disk and the in-memory filesystem so the
//! two stay interchangeable behind `FileSystemProvider`.

use designer_fs::{FileSystemProvider, LocalFileSystem, MemoryFileSystem, NormalizedPath};
use rstest::rstest;
use std::io::ErrorKind;
use tempfile::TempDir;

#[derive(Debug)]
enum Backend {
    Local,
    Memory,
}

struct Sandbox {
    provider: Box<dyn FileSystemProvider>,
    root: NormalizedPath,
    _temp: Option<TempDir>,
}

impl Sandbox {
    fn new(backend: Backend) -> Self {
        match backend {
            Backend::Local => {
                let temp = TempDir::new().unwrap();
                let provider = LocalFileSystem::new();
                let root = NormalizedPath::new(temp.path());
                Self {
                    provider: Box::new(provider),
                    root,
                    _temp: Some(temp),
                }
            }
            Backend::Memory => {
                let provider = MemoryFileSystem::default();
                let root = NormalizedPath::new("/sandbox");
                provider.create_dir_all(&root).unwrap();
                Self {
                    provider: Box::new(provider),
                    root,
                    _temp: None,
                }
            }
        }
    }

    fn path(&self, rel: &str) -> NormalizedPath {
        self.root.join(rel)
    }
}

#[rstest]
fn write_truncates_existing_file(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    let file = sb.path("a.txt");

    sb.provider.write(&file, b"a much longer body").unwrap();
    sb.provider.write(&file, b"short").unwrap();

    assert_eq!(sb.provider.read(&file).unwrap(), b"short");
    assert_eq!(sb.provider.metadata(&file).unwrap().len, 5);
}

#[rstest]
fn write_without_parent_is_not_found(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    let err = sb.provider.write(&sb.path("missing/a.txt"), b"x").unwrap_err();
    assert!(err.is_not_found());
}

#[rstest]
fn create_dir_reports_already_exists(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    let dir = sb.path("processes");
    sb.provider.create_dir(&dir).unwrap();
    assert!(sb.provider.create_dir(&dir).unwrap_err().is_already_exists());
    assert!(sb.provider.is_dir(&dir));
}

#[rstest]
fn read_dir_flags_directories(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    sb.provider.create_dir_all(&sb.path("forms/nested")).unwrap();
    sb.provider.write(&sb.path("a.bpmn"), b"<xml/>").unwrap();

    let entries: Vec<_> = sb
        .provider
        .read_dir(&sb.root)
        .unwrap()
        .into_iter()
        .map(|e| (e.file_name().to_string(), e.is_dir))
        .collect();
    assert_eq!(
        entries,
        vec![("a.bpmn".to_string(), false), ("forms".to_string(), true)]
    );
}

#[rstest]
fn read_dir_on_file_fails(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    let file = sb.path("a.txt");
    sb.provider.write(&file, b"x").unwrap();
    assert!(sb.provider.read_dir(&file).is_err());
}

#[rstest]
fn remove_dir_requires_empty_directory(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    let dir = sb.path("full");
    sb.provider.create_dir(&dir).unwrap();
    sb.provider.write(&dir.join("f"), b"x").unwrap();

    assert!(sb.provider.remove_dir(&dir).is_err());
    sb.provider.remove_file(&dir.join("f")).unwrap();
    sb.provider.remove_dir(&dir).unwrap();
    assert!(!sb.provider.exists(&dir));
}

#[rstest]
fn remove_if_exists_distinguishes_missing(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    let file = sb.path("a.txt");
    sb.provider.write(&file, b"x").unwrap();

    assert!(sb.provider.remove_if_exists(&file).unwrap());
    assert!(!sb.provider.remove_if_exists(&file).unwrap());
}

#[rstest]
fn copy_replaces_destination(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    let from = sb.path("from.txt");
    let to = sb.path("to.txt");
    sb.provider.write(&from, b"new").unwrap();
    sb.provider.write(&to, b"old").unwrap();

    sb.provider.copy(&from, &to).unwrap();

    assert_eq!(sb.provider.read(&to).unwrap(), b"new");
    assert!(sb.provider.exists(&from));
}

#[rstest]
fn rename_moves_directory_with_contents(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    sb.provider.create_dir_all(&sb.path("src/inner")).unwrap();
    sb.provider.write(&sb.path("src/inner/f.txt"), b"x").unwrap();

    sb.provider.rename(&sb.path("src"), &sb.path("dst")).unwrap();

    assert!(!sb.provider.exists(&sb.path("src")));
    assert_eq!(sb.provider.read(&sb.path("dst/inner/f.txt")).unwrap(), b"x");
}

#[rstest]
fn rename_onto_non_empty_directory_fails(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    sb.provider.create_dir_all(&sb.path("src")).unwrap();
    sb.provider.create_dir_all(&sb.path("dst")).unwrap();
    sb.provider.write(&sb.path("dst/keep.txt"), b"x").unwrap();

    assert!(sb.provider.rename(&sb.path("src"), &sb.path("dst")).is_err());
    assert!(sb.provider.exists(&sb.path("src")));
}

#[rstest]
fn read_to_lines_strips_terminators(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    let file = sb.path("a.txt");
    sb.provider.write(&file, b"one\r\ntwo\nthree\n").unwrap();
    assert_eq!(sb.provider.read_to_lines(&file).unwrap(), vec!["one", "two", "three"]);
}

#[rstest]
fn read_to_lines_rejects_invalid_utf8(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    let file = sb.path("blob.bin");
    sb.provider.write(&file, &[0xff, 0xfe, 0x00]).unwrap();
    let err = sb.provider.read_to_lines(&file).unwrap_err();
    assert_eq!(err.io_kind(), Some(ErrorKind::InvalidData));
}

#[rstest]
fn uri_roundtrip(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    let path = sb.path("my processes/a.bpmn");
    let uri = sb.provider.uri_from_path(&path).unwrap();
    assert_eq!(uri.scheme(), sb.provider.scheme());
    assert_eq!(sb.provider.path_from_uri(&uri).unwrap(), path);
}

#[rstest]
fn metadata_reports_timestamps(#[values(Backend::Local, Backend::Memory)] backend: Backend) {
    let sb = Sandbox::new(backend);
    let file = sb.path("a.txt");
    sb.provider.write(&file, b"x").unwrap();
    let attrs = sb.provider.metadata(&file).unwrap();
    assert!(attrs.is_file());
    assert!(attrs.modified.is_some());
}
