use fs2::FileExt;
use keyword_core::{DirectoryMonitor, Error};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::{Duration, Instant};
use tempfile::tempdir;

// Enough of a JPEG header to be recognisably binary.
const JPEG_BYTES: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn copy_files(dest: &Path, names: &[&str]) {
    for name in names {
        if name.ends_with(".jpg") {
            fs::write(dest.join(name), JPEG_BYTES).unwrap();
        } else {
            fs::copy(fixtures().join(name), dest.join(name)).unwrap();
        }
        sleep(Duration::from_millis(10));
    }
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect()
}

/// Poll until `expected` entries have arrived or the deadline passes. With
/// nothing expected, keep polling briefly to catch stray events.
fn collect_new(monitor: &mut DirectoryMonitor, expected: usize) -> Vec<PathBuf> {
    let wait = if expected == 0 { Duration::from_millis(500) } else { Duration::from_secs(5) };
    let deadline = Instant::now() + wait;
    let mut found = Vec::new();
    while Instant::now() < deadline {
        found.extend(monitor.list_new_valid_entries());
        if expected > 0 && found.len() >= expected {
            break;
        }
        sleep(Duration::from_millis(50));
    }
    found
}

#[test]
fn configure_fails_for_missing_directory() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("nope");
    assert!(matches!(DirectoryMonitor::configure(&missing), Err(Error::DirectoryNotFound(_))));
}

#[test]
fn configure_fails_for_regular_file() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("file1.txt");
    fs::write(&file, "text").unwrap();
    assert!(DirectoryMonitor::configure(&file).is_err());
}

#[test]
fn current_files() {
    let cases: &[(&[&str], &[&str])] = &[
        (&[], &[]),
        (&["alien.jpg"], &[]),
        (&["file1.txt"], &["file1.txt"]),
        (&["file1.txt", "alien.jpg"], &["file1.txt"]),
        (&["file1.txt", "file2.txt"], &["file1.txt", "file2.txt"]),
        (&["file2.txt", "alien.jpg", "file1.txt"], &["file1.txt", "file2.txt"]),
        (&["file4.txt", "file3.txt", "file2.txt", "file1.txt", "alien.jpg"], &["file1.txt", "file2.txt", "file3.txt", "file4.txt"]),
    ];

    for (copied, expected) in cases {
        let tmp = tempdir().unwrap();
        copy_files(tmp.path(), copied);
        let monitor = DirectoryMonitor::configure(tmp.path()).unwrap();

        let current = monitor.list_current_valid_entries();
        assert_eq!(file_names(&current), expected.to_vec(), "copied {copied:?}");
    }
}

#[test]
fn current_listing_consumes_no_events() {
    let tmp = tempdir().unwrap();
    let mut monitor = DirectoryMonitor::configure(tmp.path()).unwrap();
    copy_files(tmp.path(), &["file1.txt"]);

    assert_eq!(file_names(&monitor.list_current_valid_entries()), vec!["file1.txt"]);
    assert_eq!(file_names(&collect_new(&mut monitor, 1)), vec!["file1.txt"]);
}

#[test]
fn new_files() {
    let cases: &[(&[&str], &[&str], &[&str])] = &[
        (&[], &["alien.jpg"], &[]),
        (&[], &["file1.txt", "alien.jpg"], &["file1.txt"]),
        (&[], &["file1.txt", "file2.txt", "file3.txt", "file4.txt", "alien.jpg"], &["file1.txt", "file2.txt", "file3.txt", "file4.txt"]),
        (&["file1.txt", "file2.txt"], &["alien.jpg"], &[]),
        (&["alien.jpg"], &["file1.txt", "file2.txt"], &["file1.txt", "file2.txt"]),
        (&["file1.txt"], &["file3.txt", "file2.txt"], &["file3.txt", "file2.txt"]),
    ];

    for (initial, copied, expected) in cases {
        let tmp = tempdir().unwrap();
        copy_files(tmp.path(), initial);
        let mut monitor = DirectoryMonitor::configure(tmp.path()).unwrap();
        copy_files(tmp.path(), copied);

        let found = collect_new(&mut monitor, expected.len());
        assert_eq!(file_names(&found), expected.to_vec(), "initial {initial:?}, copied {copied:?}");
    }
}

#[test]
fn empty_poll_is_not_an_error() {
    let tmp = tempdir().unwrap();
    let mut monitor = DirectoryMonitor::configure(tmp.path()).unwrap();
    assert!(monitor.list_new_valid_entries().is_empty());
    assert!(monitor.list_new_valid_entries().is_empty());
}

#[test]
fn locked_file_is_skipped_until_released() {
    let tmp = tempdir().unwrap();
    copy_files(tmp.path(), &["file1.txt", "file2.txt"]);
    let monitor = DirectoryMonitor::configure(tmp.path()).unwrap();

    let writer = File::open(tmp.path().join("file2.txt")).unwrap();
    FileExt::lock_exclusive(&writer).unwrap();
    assert_eq!(file_names(&monitor.list_current_valid_entries()), vec!["file1.txt"]);

    FileExt::unlock(&writer).unwrap();
    assert_eq!(file_names(&monitor.list_current_valid_entries()), vec!["file1.txt", "file2.txt"]);
}

#[test]
fn moved_in_file_is_new() {
    let tmp = tempdir().unwrap();
    let staging = tmp.path().join("staging");
    let watched = tmp.path().join("watched");
    fs::create_dir(&staging).unwrap();
    fs::create_dir(&watched).unwrap();
    fs::copy(fixtures().join("file1.txt"), staging.join("staged.txt")).unwrap();

    let mut monitor = DirectoryMonitor::configure(&watched).unwrap();
    fs::rename(staging.join("staged.txt"), watched.join("report.txt")).unwrap();

    assert_eq!(file_names(&collect_new(&mut monitor, 1)), vec!["report.txt"]);
}

#[test]
fn file_deleted_before_poll_is_dropped() {
    let tmp = tempdir().unwrap();
    let mut monitor = DirectoryMonitor::configure(tmp.path()).unwrap();

    copy_files(tmp.path(), &["file2.txt"]);
    fs::remove_file(tmp.path().join("file2.txt")).unwrap();
    copy_files(tmp.path(), &["file1.txt"]);

    assert_eq!(file_names(&collect_new(&mut monitor, 1)), vec!["file1.txt"]);
    assert!(collect_new(&mut monitor, 0).is_empty());
}
