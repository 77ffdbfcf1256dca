//! Tests for atomic file copy operations

use filetime::FileTime;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use treemirror::executor::copy_file_atomic;

fn create_test_file(path: &Path, content: &[u8]) {
    let mut file = fs::File::create(path).expect("Failed to create test file");
    file.write_all(content).expect("Failed to write test content");
    file.flush().expect("Failed to flush");
}

fn set_file_mtime(path: &Path, mtime: SystemTime) {
    filetime::set_file_mtime(path, FileTime::from_system_time(mtime)).expect("Failed to set mtime");
}

#[test]
fn test_copy_basic_content() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("source.txt");
    let content = b"Hello, treemirror! This is a test file.";
    create_test_file(&src_path, content);

    let dest_path = temp_dir.path().join("dest.txt");
    let bytes_copied = copy_file_atomic(&src_path, &dest_path).expect("copy should succeed");

    assert_eq!(bytes_copied, content.len() as u64);
    assert_eq!(fs::read(&dest_path).expect("read dest"), content);
}

#[test]
fn test_copy_preserves_mtime() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("source.txt");
    create_test_file(&src_path, b"timestamped");
    let past = SystemTime::now() - Duration::from_secs(3 * 24 * 3600);
    set_file_mtime(&src_path, past);

    let dest_path = temp_dir.path().join("dest.txt");
    copy_file_atomic(&src_path, &dest_path).expect("copy should succeed");

    let src_mtime = FileTime::from_last_modification_time(&fs::metadata(&src_path).expect("src"));
    let dest_mtime =
        FileTime::from_last_modification_time(&fs::metadata(&dest_path).expect("dest"));
    assert_eq!(src_mtime.unix_seconds(), dest_mtime.unix_seconds());
}

#[test]
fn test_copy_overwrites_existing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("source.txt");
    let dest_path = temp_dir.path().join("dest.txt");
    create_test_file(&src_path, b"new");
    create_test_file(&dest_path, b"a much longer old version of the file");

    let bytes_copied = copy_file_atomic(&src_path, &dest_path).expect("copy should succeed");

    assert_eq!(bytes_copied, 3);
    assert_eq!(fs::read(&dest_path).expect("read dest"), b"new");
}

#[test]
fn test_copy_leaves_no_staging_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("source.txt");
    create_test_file(&src_path, b"content");
    let dest_path = temp_dir.path().join("dest.txt");

    copy_file_atomic(&src_path, &dest_path).expect("copy should succeed");

    let mut names: Vec<String> = fs::read_dir(temp_dir.path())
        .expect("list dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["dest.txt", "source.txt"]);
}

#[test]
fn test_failed_copy_keeps_old_destination() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dest_path = temp_dir.path().join("dest.txt");
    create_test_file(&dest_path, b"previous");

    let error = copy_file_atomic(&temp_dir.path().join("vanished.txt"), &dest_path).unwrap_err();

    assert!(error.is_not_found());
    assert_eq!(fs::read(&dest_path).expect("read dest"), b"previous");
    assert_eq!(fs::read_dir(temp_dir.path()).expect("list dir").count(), 1);
}

#[test]
fn test_copy_empty_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src_path = temp_dir.path().join("empty.txt");
    create_test_file(&src_path, b"");
    let dest_path = temp_dir.path().join("copy.txt");

    assert_eq!(copy_file_atomic(&src_path, &dest_path).expect("copy"), 0);
    assert!(dest_path.is_file());
}
