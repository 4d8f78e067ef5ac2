use std::fs;
use std::path::{Path, PathBuf};

use fwstamp::canonicalize_or_current;
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let cwd = std::env::current_dir().expect("cwd");
    let result = canonicalize_or_current(".").expect("canonicalize");
    assert_eq!(result, cwd);
}

#[test]
fn canonicalize_or_current_resolves_existing_absolute_path() {
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("fw.bin");
    fs::write(&file, b"x").expect("write");

    let result = canonicalize_or_current(file.to_str().unwrap()).expect("canonicalize");
    assert_eq!(result, file.canonicalize().expect("canonicalize file"));
}

#[test]
fn canonicalize_or_current_joins_missing_relative_path_with_cwd() {
    let cwd = std::env::current_dir().expect("cwd");
    let result = canonicalize_or_current("does/not/exist.bin").expect("fallback");
    assert_eq!(result, cwd.join(PathBuf::from("does/not/exist.bin")));
    assert!(result.is_absolute());
    assert!(!Path::new(&result).exists());
}
