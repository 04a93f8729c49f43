//! Opening a store, configuration, and the on-disk picture after use.

use std::path::Path;

use assert_fs::prelude::*;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use stash_core::{ErrorKind, Script, Stash, StaticCatalog, StoreConfig};
use stash_fs::NormalizedPath;
use stash_test_utils::TestStash;

/// Sorted relative paths under `root`, directories suffixed with `/`.
/// Hidden temp files are left out.
fn visible_tree(root: &Path) -> String {
    let mut entries = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.file_name().unwrap().to_string_lossy().starts_with('.') {
                continue;
            }
            let rel = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
            if path.is_dir() {
                entries.push(format!("{}/", rel));
                stack.push(path);
            } else {
                entries.push(rel);
            }
        }
    }
    entries.sort();
    entries.join("\n")
}

#[test]
fn open_creates_layout() {
    let temp = assert_fs::TempDir::new().unwrap();
    let base = temp.child("nested/base");

    Stash::open(StoreConfig::at(base.path())).unwrap();

    base.child("Attachments").assert(predicate::path::is_dir());
    base.child("Contacts").assert(predicate::path::is_dir());
    base.child("Scripts").assert(predicate::path::is_dir());
    base.child("FCM").assert(predicate::path::is_dir());
}

#[test]
fn open_is_idempotent_and_keeps_data() {
    let test = TestStash::new();
    test.stash.attachments().save_whole("keep.jpg", b"data").unwrap();

    Stash::open(StoreConfig::at(test.base())).unwrap();

    test.assert_file_exists("Attachments/keep.jpg");
}

#[test]
fn open_fails_when_base_is_a_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let base = temp.child("base");
    base.write_str("not a directory").unwrap();

    let err = Stash::open(StoreConfig::at(base.path())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn open_fails_when_store_dir_is_a_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("base/FCM").write_str("blocked").unwrap();

    assert!(Stash::open(StoreConfig::at(temp.child("base").path())).is_err());
}

#[test]
fn read_range_uses_configured_default_length() {
    let test = TestStash::new();
    let content: Vec<u8> = (0..3000u32).map(|i| (i % 256) as u8).collect();
    let path = test.stash.attachments().save_whole("big.bin", &content).unwrap();

    let bytes = test.stash.read_range(&path, 100, None).unwrap();
    assert_eq!(bytes, content[100..1124].to_vec());

    let small = TestStash::with_config(|config| StoreConfig {
        read_length: 16,
        ..config
    });
    let path = small.stash.attachments().save_whole("big.bin", &content).unwrap();
    assert_eq!(small.stash.read_range(&path, 0, None).unwrap().len(), 16);
}

#[test]
fn read_range_past_end_is_empty() {
    let test = TestStash::new();
    let path = test.stash.attachments().save_whole("short.txt", b"abc").unwrap();

    assert!(test.stash.read_range(&path, 10, Some(5)).unwrap().is_empty());
    assert_eq!(test.stash.read_range(&path, 1, Some(100)).unwrap(), b"bc");
}

#[test]
fn read_range_missing_file_is_not_found() {
    let test = TestStash::new();
    let missing = NormalizedPath::new(test.path("Attachments/missing.bin"));

    let err = test.stash.read_range(&missing, 0, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn config_file_drives_open() {
    let temp = assert_fs::TempDir::new().unwrap();
    let base = temp.child("from-config");
    let config_file = temp.child("stash.toml");
    config_file
        .write_str(&format!(
            "base_dir = {:?}\nread_length = 8\n\n[robustness]\nenable_fsync = false\n",
            base.path().to_string_lossy()
        ))
        .unwrap();

    let loaded = StoreConfig::load(&NormalizedPath::new(config_file.path())).unwrap();
    let stash = Stash::open(loaded).unwrap();

    assert_eq!(stash.config().read_length, 8);
    base.child("Attachments").assert(predicate::path::is_dir());
}

#[test]
fn snapshot_tree_after_use() {
    let test = TestStash::new();
    test.stash.attachments().save_whole("photo.jpg", b"jpg").unwrap();
    test.write_chunks("abc", &[(1, b"B".to_vec()), (0, b"A".to_vec())]);
    test.stash.credentials().set_client(&json!({"k": 1})).unwrap();
    test.stash
        .provision(StaticCatalog::new(vec![Script::new("restart.sh", "exit 0")]))
        .unwrap();

    insta::assert_snapshot!(visible_tree(&test.base()), @r###"
    Attachments/
    Attachments/abc/
    Attachments/abc/0.chunk
    Attachments/abc/1.chunk
    Attachments/photo.jpg
    Contacts/
    FCM/
    FCM/client.json
    Scripts/
    Scripts/restart.sh
    "###);
}
