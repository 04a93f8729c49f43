//! Chunked attachment storage and reassembly against a real directory.

use pretty_assertions::assert_eq;
use stash_core::{Assembler, AssemblyPolicy, ChunkIndex, Error, ErrorKind, Removal};
use stash_test_utils::{TestStash, random_guid, split_chunks};

// ============================================================================
// Reassembly order
// ============================================================================

#[test]
fn chunks_written_out_of_order_reassemble_by_index() {
    let test = TestStash::new();
    let attachments = test.stash.attachments();

    attachments.save_chunk("abc", 2, b"C").unwrap();
    attachments.save_chunk("abc", 0, b"A").unwrap();
    attachments.save_chunk("abc", 1, b"B").unwrap();

    assert_eq!(test.stash.assembler().reconstruct("abc").unwrap(), b"ABC");
}

#[test]
fn numeric_order_not_lexical() {
    let test = TestStash::new();
    let guid = random_guid();
    let chunks: Vec<(u32, Vec<u8>)> = (0..12).map(|i| (i, vec![b'a' + i as u8])).collect();
    test.write_chunks(&guid, &chunks);

    // "10.chunk" sorts before "2.chunk" as a string
    assert_eq!(test.stash.assembler().reconstruct(&guid).unwrap(), b"abcdefghijkl");
}

#[test]
fn large_payload_round_trips_through_chunks() {
    let test = TestStash::new();
    let guid = random_guid();
    let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();

    let mut chunks = split_chunks(&payload, 64 * 1024);
    chunks.reverse();
    test.write_chunks(&guid, &chunks);

    assert_eq!(test.stash.assembler().reconstruct(&guid).unwrap(), payload);
}

#[test]
fn same_index_last_write_wins() {
    let test = TestStash::new();
    let attachments = test.stash.attachments();

    attachments.save_chunk("abc", 0, b"A").unwrap();
    attachments.save_chunk("abc", 1, b"first").unwrap();
    attachments.save_chunk("abc", 1, b"second").unwrap();

    assert_eq!(test.stash.assembler().reconstruct("abc").unwrap(), b"Asecond");
}

#[test]
fn reconstruct_to_streams_and_counts() {
    let test = TestStash::new();
    test.write_chunks("abc", &[(0, b"hello ".to_vec()), (1, b"world".to_vec())]);

    let mut out = Vec::new();
    let written = test.stash.assembler().reconstruct_to("abc", &mut out).unwrap();

    assert_eq!(written, 11);
    assert_eq!(out, b"hello world");
}

#[test]
fn chunks_returns_index_payload_pairs() {
    let test = TestStash::new();
    test.write_chunks("abc", &[(1, b"B".to_vec()), (0, b"A".to_vec())]);

    let chunks = test.stash.assembler().chunks("abc").unwrap();
    let indices: Vec<u32> = chunks.iter().map(|c| c.index.value()).collect();
    assert_eq!(indices, vec![0, 1]);
    assert_eq!(chunks[1].payload, b"B");
}

// ============================================================================
// Missing vs empty
// ============================================================================

#[test]
fn reconstruct_unknown_guid_is_not_found() {
    let test = TestStash::new();

    let err = test.stash.assembler().reconstruct("never-seen").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn reconstruct_empty_directory_is_empty() {
    let test = TestStash::new();
    std::fs::create_dir(test.path("Attachments/empty-guid")).unwrap();

    assert!(test.stash.assembler().reconstruct("empty-guid").unwrap().is_empty());
}

// ============================================================================
// Defensive listing
// ============================================================================

#[test]
fn malformed_and_bookkeeping_entries_are_skipped() {
    let test = TestStash::new();
    test.write_chunks("abc", &[(0, b"A".to_vec()), (1, b"B".to_vec())]);
    test.write_raw("Attachments/abc/notes.txt", "stray");
    test.write_raw("Attachments/abc/x.chunk", "bad index");
    test.write_raw("Attachments/abc/.1.chunk.999.0.tmp", "half written");

    let entries = test.stash.assembler().list_chunks("abc").unwrap();
    let indices: Vec<ChunkIndex> = entries.iter().map(|e| e.index).collect();

    assert_eq!(indices, vec![ChunkIndex(0), ChunkIndex(1)]);
    assert_eq!(test.stash.assembler().reconstruct("abc").unwrap(), b"AB");
}

#[test]
fn directory_named_like_a_chunk_is_skipped() {
    let test = TestStash::new();
    test.write_chunks("abc", &[(0, b"A".to_vec()), (1, b"B".to_vec())]);
    std::fs::create_dir(test.path("Attachments/abc/3.chunk")).unwrap();

    let entries = test.stash.assembler().list_chunks("abc").unwrap();
    let indices: Vec<ChunkIndex> = entries.iter().map(|e| e.index).collect();

    assert_eq!(indices, vec![ChunkIndex(0), ChunkIndex(1)]);
    assert_eq!(test.stash.assembler().reconstruct("abc").unwrap(), b"AB");
}

#[test]
fn permissive_policy_ignores_gaps() {
    let test = TestStash::new();
    test.write_chunks("gappy", &[(0, b"A".to_vec()), (5, b"F".to_vec())]);

    assert_eq!(test.stash.assembler().reconstruct("gappy").unwrap(), b"AF");
}

#[test]
fn contiguous_policy_rejects_gaps() {
    let test = TestStash::new();
    test.write_chunks("gappy", &[(0, b"A".to_vec()), (2, b"C".to_vec())]);

    let strict = Assembler::new(test.stash.attachments().clone()).with_policy(AssemblyPolicy::Contiguous);
    let err = strict.reconstruct("gappy").unwrap_err();

    assert!(matches!(err, Error::ChunkSequence { expected: 1, found: 2, .. }));
}

#[test]
fn contiguous_policy_rejects_duplicate_indices() {
    let test = TestStash::new();
    test.write_chunks("dup", &[(0, b"A".to_vec()), (1, b"B".to_vec())]);
    test.write_raw("Attachments/dup/01.chunk", "B again");

    let strict = Assembler::new(test.stash.attachments().clone()).with_policy(AssemblyPolicy::Contiguous);
    assert!(strict.reconstruct("dup").is_err());

    // Permissive keeps both, ordered by name within the same index
    assert_eq!(test.stash.assembler().reconstruct("dup").unwrap(), b"AB againB");
}

// ============================================================================
// Deletion
// ============================================================================

#[test]
fn delete_chunks_is_idempotent() {
    let test = TestStash::new();
    let attachments = test.stash.attachments();
    test.write_chunks("abc", &[(0, b"A".to_vec()), (1, b"B".to_vec())]);

    assert!(attachments.delete_chunks("abc").unwrap());
    assert!(!attachments.delete_chunks("abc").unwrap());
    assert!(!attachments.delete_chunks("never-had-chunks").unwrap());

    test.assert_file_not_exists("Attachments/abc");
    assert!(!attachments.has_chunks("abc"));
}

#[test]
fn save_and_remove_whole_attachment() {
    let test = TestStash::new();
    let attachments = test.stash.attachments();

    attachments.save_whole("IMG_0001.HEIC", b"v1").unwrap();
    attachments.save_whole("IMG_0001.HEIC", b"v2").unwrap();
    assert_eq!(std::fs::read(test.path("Attachments/IMG_0001.HEIC")).unwrap(), b"v2");

    assert!(attachments.remove_whole("IMG_0001.HEIC").is_removed());
    test.assert_file_not_exists("Attachments/IMG_0001.HEIC");
}

#[test]
fn remove_whole_failure_is_reported_not_raised() {
    let test = TestStash::new();

    match test.stash.attachments().remove_whole("missing.png") {
        Removal::Failed(err) => assert_eq!(err.kind(), ErrorKind::NotFound),
        Removal::Removed => panic!("missing file cannot be removed"),
    }
}

#[test]
fn invalid_guid_is_invalid_input() {
    let test = TestStash::new();
    let err = test.stash.attachments().save_chunk("a/b", 0, b"x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

// ============================================================================
// Purge
// ============================================================================

#[test]
fn purge_removes_files_and_chunk_directories() {
    let test = TestStash::new();
    let attachments = test.stash.attachments();
    attachments.save_whole("a.jpg", b"a").unwrap();
    attachments.save_whole("b.mov", b"b").unwrap();
    test.write_chunks("abc", &[(0, b"A".to_vec())]);

    let report = attachments.purge_all().unwrap();

    assert!(report.is_clean());
    assert!(report.removed.contains(&"a.jpg".to_string()));
    assert!(report.removed.contains(&"abc".to_string()));
    assert!(test.list("Attachments").is_empty());
}

#[test]
fn purge_empty_root_is_clean() {
    let test = TestStash::new();
    let report = test.stash.attachments().purge_all().unwrap();
    assert!(report.is_clean());
    assert!(report.removed.is_empty());
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::{self, Permissions};
    use std::os::unix::fs::PermissionsExt;

    fn is_root() -> bool {
        match std::process::Command::new("id").arg("-u").output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim() == "0",
            Err(_) => false,
        }
    }

    #[test]
    fn purge_continues_past_permission_denied_entry() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let test = TestStash::new();
        test.stash.attachments().save_whole("regular.jpg", b"ok").unwrap();
        test.write_raw("Attachments/locked/secret.bin", "can't touch this");
        let locked = test.path("Attachments/locked");
        fs::set_permissions(&locked, Permissions::from_mode(0o555)).unwrap();

        let report = test.stash.attachments().purge_all();

        let _ = fs::set_permissions(&locked, Permissions::from_mode(0o755));

        let report = report.expect("purge must not fail because one entry did");
        assert_eq!(report.removed, vec!["regular.jpg".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "locked");
        assert_eq!(report.failed[0].error.kind(), ErrorKind::Io);
        test.assert_file_not_exists("Attachments/regular.jpg");
    }

    #[test]
    fn save_chunk_into_readonly_root_is_io_error() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let test = TestStash::new();
        let root = test.path("Attachments");
        fs::set_permissions(&root, Permissions::from_mode(0o555)).unwrap();

        let result = test.stash.attachments().save_chunk("abc", 0, b"A");

        let _ = fs::set_permissions(&root, Permissions::from_mode(0o755));

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Io);
    }
}
