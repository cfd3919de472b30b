//! End-to-end runs of the walk → digest → collect pipeline over temporary trees.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use treesum::{
    CancelToken, ChecksumError, ChecksumOpts, Checksummer, HashAlgorithm, ResultSet, checksum_tree,
    checksum_tree_with_cancel,
};

const HELLO_MD5: &str = "5d41402abc4b2a76b9719d911017c592";

fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn opts(workers: usize) -> ChecksumOpts {
    ChecksumOpts {
        workers,
        ..Default::default()
    }
}

fn paths(set: &ResultSet) -> Vec<PathBuf> {
    set.iter().map(|r| r.path.clone()).collect()
}

/// Tree of `n` files spread over a few nested directories.
fn populated_tree(n: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    for i in 0..n {
        let rel = format!("d{}/sub{}/file{:03}.bin", i % 3, i % 5, i);
        write(dir.path(), &rel, format!("content {i}").as_bytes());
    }
    dir
}

#[cfg(unix)]
fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

// --- success path ---

#[test]
fn test_empty_dir_yields_empty_set() {
    let dir = TempDir::new().unwrap();
    let set = checksum_tree(dir.path(), &ChecksumOpts::default()).unwrap();
    assert!(set.is_empty());
}

#[test]
fn test_single_file_md5() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "a.txt", b"hello");

    let set = checksum_tree(dir.path(), &ChecksumOpts::default()).unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.records()[0].path, file);
    assert_eq!(set.records()[0].digest, HELLO_MD5);
}

#[test]
fn test_empty_file_gets_digest_of_zero_bytes() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "empty", b"");

    let set = checksum_tree(dir.path(), &ChecksumOpts::default()).unwrap();

    assert_eq!(set.records()[0].digest, "d41d8cd98f00b204e9800998ecf8427e");
}

#[test]
fn test_identical_content_gives_identical_digests() {
    let dir = TempDir::new().unwrap();
    let b = write(dir.path(), "b.txt", b"same bytes");
    let a = write(dir.path(), "a.txt", b"same bytes");

    let set = checksum_tree(dir.path(), &ChecksumOpts::default()).unwrap();

    assert_eq!(paths(&set), vec![a, b]);
    assert_eq!(set.records()[0].digest, set.records()[1].digest);
}

#[test]
fn test_output_sorted_by_path_bytes() {
    let dir = TempDir::new().unwrap();
    for rel in ["b", "a/c/d", "a/b", "a.txt", "Z"] {
        write(dir.path(), rel, rel.as_bytes());
    }

    let set = checksum_tree(dir.path(), &opts(4)).unwrap();

    // '.' (0x2e) sorts before '/' (0x2f), and upper case before lower case.
    let expected: Vec<PathBuf> = ["Z", "a.txt", "a/b", "a/c/d", "b"]
        .iter()
        .map(|rel| dir.path().join(rel))
        .collect();
    assert_eq!(paths(&set), expected);
}

#[test]
fn test_directories_are_not_records() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("x/y/z")).unwrap();
    let file = write(dir.path(), "x/y/file", b"data");

    let set = checksum_tree(dir.path(), &ChecksumOpts::default()).unwrap();

    assert_eq!(paths(&set), vec![file]);
}

#[test]
fn test_root_that_is_a_file_yields_itself() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "solo.txt", b"hello");

    let set = checksum_tree(&file, &ChecksumOpts::default()).unwrap();

    assert_eq!(paths(&set), vec![file]);
    assert_eq!(set.records()[0].digest, HELLO_MD5);
}

#[test]
fn test_pool_size_does_not_change_results() {
    let dir = populated_tree(60);
    let baseline = checksum_tree(dir.path(), &opts(1)).unwrap();
    assert_eq!(baseline.len(), 60);

    for workers in [2, 3, 8, 20, 64] {
        let set = checksum_tree(dir.path(), &opts(workers)).unwrap();
        assert_eq!(set, baseline, "workers = {workers}");
    }
}

#[test]
fn test_rerun_is_identical() {
    let dir = populated_tree(25);
    let first = checksum_tree(dir.path(), &ChecksumOpts::default()).unwrap();
    let second = checksum_tree(dir.path(), &ChecksumOpts::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_every_file_digested_exactly_once() {
    let dir = populated_tree(40);
    let calls = AtomicUsize::new(0);
    let counting = |path: &Path| {
        calls.fetch_add(1, Ordering::SeqCst);
        treesum::engine::digest_file(HashAlgorithm::Md5, path)
    };

    let set = Checksummer::new(opts(6))
        .unwrap()
        .run_with(dir.path(), &counting, &CancelToken::new())
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 40);
    let mut unique = paths(&set);
    unique.dedup();
    assert_eq!(unique.len(), 40);
}

#[test]
fn test_other_algorithms() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"hello");

    let sha = checksum_tree(
        dir.path(),
        &ChecksumOpts {
            algorithm: HashAlgorithm::Sha256,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        sha.records()[0].digest,
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );

    let b3 = checksum_tree(
        dir.path(),
        &ChecksumOpts {
            algorithm: HashAlgorithm::Blake3,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        b3.records()[0].digest,
        blake3::hash(b"hello").to_hex().to_string()
    );
}

// --- special files ---

#[cfg(unix)]
#[test]
fn test_symlinks_are_skipped() {
    let dir = TempDir::new().unwrap();
    let target = write(dir.path(), "sub/b.txt", b"hello");
    std::os::unix::fs::symlink(&target, dir.path().join("link")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("sub"), dir.path().join("dirlink")).unwrap();

    let set = checksum_tree(dir.path(), &ChecksumOpts::default()).unwrap();

    assert_eq!(paths(&set), vec![target]);
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_is_skipped() {
    let dir = TempDir::new().unwrap();
    std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling")).unwrap();

    let set = checksum_tree(dir.path(), &ChecksumOpts::default()).unwrap();

    assert!(set.is_empty());
}

#[cfg(unix)]
#[test]
fn test_fifo_is_skipped() {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "regular", b"x");
    let fifo = CString::new(dir.path().join("pipe").as_os_str().as_bytes()).unwrap();
    assert_eq!(unsafe { libc::mkfifo(fifo.as_ptr(), 0o644) }, 0);

    let set = checksum_tree(dir.path(), &ChecksumOpts::default()).unwrap();

    assert_eq!(paths(&set), vec![file]);
}

// --- failures ---

#[test]
fn test_missing_root_is_traversal_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = checksum_tree(&missing, &ChecksumOpts::default()).unwrap_err();

    match err {
        ChecksumError::Traversal { path, source } => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("expected traversal error, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_traversal_error() {
    use std::os::unix::fs::PermissionsExt;
    if running_as_root() {
        return;
    }

    let dir = TempDir::new().unwrap();
    write(dir.path(), "ok/a.txt", b"a");
    write(dir.path(), "locked/b.txt", b"b");
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let result = checksum_tree(dir.path(), &opts(2));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    match result.unwrap_err() {
        ChecksumError::Traversal { path, source } => {
            assert_eq!(path, locked);
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected traversal error, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_read_error() {
    use std::os::unix::fs::PermissionsExt;
    if running_as_root() {
        return;
    }

    let dir = populated_tree(10);
    let secret = write(dir.path(), "secret.txt", b"nope");
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();

    let err = checksum_tree(dir.path(), &opts(3)).unwrap_err();

    match err {
        ChecksumError::Read { path, source } => {
            assert_eq!(path, secret);
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn test_one_failing_file_fails_the_whole_run() {
    let dir = populated_tree(30);
    let poisoned = dir.path().join("d1/sub1/file001.bin");
    let digester = |path: &Path| {
        if path == poisoned.as_path() {
            Err(io::Error::other("simulated read failure"))
        } else {
            treesum::engine::digest_file(HashAlgorithm::Md5, path)
        }
    };

    for workers in [1, 4, 20] {
        let err = Checksummer::new(opts(workers))
            .unwrap()
            .run_with(dir.path(), &digester, &CancelToken::new())
            .unwrap_err();
        match err {
            ChecksumError::Read { path, .. } => assert_eq!(path, poisoned),
            other => panic!("expected read error, got {other:?}"),
        }
    }
}

#[test]
fn test_first_failure_wins_when_every_file_fails() {
    let dir = populated_tree(20);
    let digester = |_: &Path| -> io::Result<String> { Err(io::Error::other("broken disk")) };

    let err = Checksummer::new(opts(8))
        .unwrap()
        .run_with(dir.path(), &digester, &CancelToken::new())
        .unwrap_err();

    assert!(matches!(err, ChecksumError::Read { .. }), "got {err:?}");
    assert!(!err.is_cancellation());
}

#[test]
fn test_zero_workers_is_invalid() {
    let err = Checksummer::new(opts(0)).unwrap_err();
    assert!(matches!(err, ChecksumError::InvalidConfig(_)));
}

#[test]
fn test_checksummer_keeps_its_options() {
    let checksummer = Checksummer::new(ChecksumOpts {
        workers: 3,
        algorithm: HashAlgorithm::Sha256,
        deadline: Some(Duration::from_secs(5)),
    })
    .unwrap();

    assert_eq!(checksummer.opts().workers, 3);
    assert_eq!(checksummer.opts().algorithm, HashAlgorithm::Sha256);
    assert_eq!(checksummer.opts().deadline, Some(Duration::from_secs(5)));
}

// --- cancellation ---

#[test]
fn test_cancelled_before_start() {
    let dir = populated_tree(5);
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = Checksummer::new(opts(4))
        .unwrap()
        .run(dir.path(), &cancel)
        .unwrap_err();

    assert!(matches!(err, ChecksumError::Cancelled), "got {err:?}");
}

#[test]
fn test_checksum_tree_with_cancel() {
    let dir = populated_tree(5);
    let cancel = CancelToken::new();

    let set = checksum_tree_with_cancel(dir.path(), &opts(2), &cancel).unwrap();
    assert_eq!(set.len(), 5);

    cancel.cancel();
    let err = checksum_tree_with_cancel(dir.path(), &opts(2), &cancel).unwrap_err();
    assert!(matches!(err, ChecksumError::Cancelled), "got {err:?}");
}

#[test]
fn test_cancel_mid_run_terminates_promptly() {
    let dir = populated_tree(200);
    let slow = |path: &Path| {
        thread::sleep(Duration::from_millis(20));
        treesum::engine::digest_file(HashAlgorithm::Md5, path)
    };
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(60));
        trigger.cancel();
    });

    let start = Instant::now();
    let err = Checksummer::new(opts(2))
        .unwrap()
        .run_with(dir.path(), &slow, &cancel)
        .unwrap_err();
    canceller.join().unwrap();

    assert!(matches!(err, ChecksumError::Cancelled), "got {err:?}");
    // 200 files at 20ms over 2 workers would take ~2s uncancelled.
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_run_failure_does_not_cancel_parent() {
    let dir = populated_tree(5);
    let parent = CancelToken::new();
    let failing = |_: &Path| -> io::Result<String> { Err(io::Error::other("boom")) };

    let result = Checksummer::new(opts(2))
        .unwrap()
        .run_with(dir.path(), &failing, &parent);

    assert!(result.is_err());
    assert!(!parent.is_cancelled());
    // The same parent still drives a clean run afterwards.
    assert_eq!(
        Checksummer::new(opts(2))
            .unwrap()
            .run(dir.path(), &parent)
            .unwrap()
            .len(),
        5
    );
}

#[test]
fn test_deadline_exceeded_is_timed_out() {
    let dir = populated_tree(100);
    let slow = |path: &Path| {
        thread::sleep(Duration::from_millis(20));
        treesum::engine::digest_file(HashAlgorithm::Md5, path)
    };
    let deadline = Duration::from_millis(80);
    let checksummer = Checksummer::new(ChecksumOpts {
        workers: 1,
        deadline: Some(deadline),
        ..Default::default()
    })
    .unwrap();

    let start = Instant::now();
    let err = checksummer
        .run_with(dir.path(), &slow, &CancelToken::new())
        .unwrap_err();

    assert!(err.is_cancellation());
    match err {
        ChecksumError::TimedOut(d) => assert_eq!(d, deadline),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_generous_deadline_does_not_delay_success() {
    let dir = populated_tree(10);
    let checksummer = Checksummer::new(ChecksumOpts {
        deadline: Some(Duration::from_secs(3600)),
        ..Default::default()
    })
    .unwrap();

    let start = Instant::now();
    let set = checksummer.run(dir.path(), &CancelToken::new()).unwrap();

    assert_eq!(set.len(), 10);
    assert!(start.elapsed() < Duration::from_secs(10));
}
