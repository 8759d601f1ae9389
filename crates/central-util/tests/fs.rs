use central_util::fs::{find_ancestor_entry, first_existing, read_optional};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_find_ancestor_entry_matches_directories() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join(".git")).unwrap();
    let nested = tmp.path().join("module");
    fs::create_dir_all(&nested).unwrap();

    let found = find_ancestor_entry(&nested, ".git").unwrap();
    assert_eq!(found, tmp.path().join(".git"));
}

#[test]
fn test_first_existing_prefers_order() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("build.gradle"), "").unwrap();
    fs::write(tmp.path().join("build.gradle.kts"), "").unwrap();

    let found = first_existing(tmp.path(), &["build.gradle.kts", "build.gradle"]).unwrap();
    assert!(found.ends_with("build.gradle.kts"));
}

#[test]
fn test_first_existing_none() {
    let tmp = TempDir::new().unwrap();
    assert!(first_existing(tmp.path(), &["build.gradle.kts"]).is_none());
}

#[test]
fn test_read_optional_missing_file() {
    let tmp = TempDir::new().unwrap();
    assert!(read_optional(&tmp.path().join("nope")).is_none());
}
