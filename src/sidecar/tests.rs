use std::fs;
use std::path::Path;

use tempfile::tempdir;

use super::*;
use crate::record::ImageRecord;

fn touch(path: &Path) {
    fs::write(path, b"").expect("write fixture");
}

#[test]
fn parse_trims_and_drops_empty_pieces() {
    assert_eq!(parse_tags("  cat,dog ,, long tag ,\n"), ["cat", "dog", "long tag"]);
    assert!(parse_tags("").is_empty());
    assert!(parse_tags(" , ,").is_empty());
}

#[test]
fn format_joins_with_comma_space() {
    let tags = vec!["cat".to_string(), "dog".to_string()];
    assert_eq!(format_tags(&tags), "cat, dog");
}

#[test]
fn supported_extensions_ignore_case() {
    assert!(is_supported_image(Path::new("a.PNG")));
    assert!(is_supported_image(Path::new("b.JpEg")));
    assert!(is_supported_image(Path::new("c.webp")));
    assert!(!is_supported_image(Path::new("d.txt")));
    assert!(!is_supported_image(Path::new("noext")));
}

#[test]
fn missing_sidecar_gives_no_tags() {
    let dir = tempdir().expect("tempdir");
    assert!(load_tags(&dir.path().join("none.txt")).is_empty());
}

#[test]
fn unreadable_sidecar_gives_no_tags() {
    let dir = tempdir().expect("tempdir");
    // a directory named like a sidecar exists but cannot be read as text
    let bogus = dir.path().join("a.txt");
    fs::create_dir(&bogus).expect("mkdir");
    assert!(load_tags(&bogus).is_empty());
}

#[test]
fn scan_pairs_images_with_sidecars_in_name_order() {
    let dir = tempdir().expect("tempdir");
    touch(&dir.path().join("b.png"));
    touch(&dir.path().join("a.png"));
    touch(&dir.path().join("notes.md"));
    fs::write(dir.path().join("a.txt"), "cat, dog").expect("write");
    fs::create_dir(dir.path().join("sub")).expect("mkdir");
    touch(&dir.path().join("sub").join("c.png"));

    let records = scan_folder(dir.path()).expect("scan");
    let names: Vec<_> = records.iter().map(ImageRecord::file_name).collect();
    assert_eq!(names, ["a.png", "b.png"]);
    assert_eq!(records[0].tags(), ["cat", "dog"]);
    assert!(records[1].tags().is_empty());
    assert!(records.iter().all(|r| !r.is_dirty()));
}

#[test]
fn scan_of_missing_folder_fails() {
    let dir = tempdir().expect("tempdir");
    let err = scan_folder(&dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, crate::error::TaggerError::FolderScan { .. }));
}

#[test]
fn save_writes_dirty_records_and_clears_flag() {
    let dir = tempdir().expect("tempdir");
    let image = dir.path().join("a.png");
    touch(&image);
    let mut records = vec![ImageRecord::new(&image, vec!["cat".into()])];
    records[0].add_tag("dog");

    assert_eq!(save_all(&mut records), 1);
    assert!(!records[0].is_dirty());
    let written = fs::read_to_string(dir.path().join("a.txt")).expect("read");
    assert_eq!(written, "cat, dog");
}

#[test]
fn save_with_nothing_dirty_writes_nothing() {
    let dir = tempdir().expect("tempdir");
    let image = dir.path().join("a.png");
    let mut records = vec![ImageRecord::new(&image, vec!["cat".into()])];

    assert_eq!(save_all(&mut records), 0);
    assert!(!dir.path().join("a.txt").exists());
}

#[test]
fn failed_write_keeps_record_dirty() {
    let dir = tempdir().expect("tempdir");
    let image = dir.path().join("missing-dir").join("a.png");
    let mut record = ImageRecord::new(&image, vec![]);
    record.add_tag("cat");

    assert!(!save_if_dirty(&mut record));
    assert!(record.is_dirty());
}
