//! Tests for DatumFileDb
//!
//! These tests verify:
//! - Open-time existence checks per mode
//! - Mode restrictions on cursors and transactions
//! - WRITE mode appends to existing files
//! - Idempotent close

use std::fs;

use datumstore::datumfile::DatumFileDb;
use datumstore::{Config, Cursor, Mode, StoreError, Transaction};

use crate::common::{drain, owned, read_all, setup_temp_file, write_records};

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_new_creates_empty_file() {
    let (_temp, path) = setup_temp_file();

    let db = DatumFileDb::open(&path, Mode::New, &Config::default()).unwrap();

    assert!(path.is_file());
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    assert_eq!(db.mode(), Mode::New);
    assert_eq!(db.path(), path.as_path());
}

#[test]
fn test_open_new_fails_if_exists() {
    let (_temp, path) = setup_temp_file();
    write_records(&path, &[("a", "1")]);

    let result = DatumFileDb::open(&path, Mode::New, &Config::default());

    assert!(matches!(result, Err(StoreError::AlreadyExists(p)) if p == path));
    // Existing data untouched
    assert_eq!(read_all(&path), owned(&[("a", "1")]));
}

#[test]
fn test_open_read_missing_file() {
    let (_temp, path) = setup_temp_file();

    let result = DatumFileDb::open(&path, Mode::Read, &Config::default());

    assert!(matches!(result, Err(StoreError::NotFound(_))));
    assert!(!path.exists());
}

#[test]
fn test_open_write_missing_file() {
    let (_temp, path) = setup_temp_file();

    let result = DatumFileDb::open(&path, Mode::Write, &Config::default());

    assert!(matches!(result, Err(StoreError::NotFound(_))));
    assert!(!path.exists());
}

#[test]
fn test_open_read_rejects_directory() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    let result = DatumFileDb::open(temp_dir.path(), Mode::Read, &Config::default());

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

// =============================================================================
// Mode Tests
// =============================================================================

#[test]
fn test_read_mode_cannot_write() {
    let (_temp, path) = setup_temp_file();
    write_records(&path, &[("a", "1")]);
    let mut db = DatumFileDb::open(&path, Mode::Read, &Config::default()).unwrap();

    let result = db.new_transaction();

    assert!(matches!(result, Err(StoreError::NotWritable(Mode::Read))));
}

#[test]
fn test_new_mode_cannot_read() {
    let (_temp, path) = setup_temp_file();
    let db = DatumFileDb::open(&path, Mode::New, &Config::default()).unwrap();

    let result = db.new_cursor();

    assert!(matches!(result, Err(StoreError::NotReadable(Mode::New))));
}

#[test]
fn test_write_mode_appends() {
    let (_temp, path) = setup_temp_file();
    write_records(&path, &[("a", "1")]);

    let mut db = DatumFileDb::open(&path, Mode::Write, &Config::default()).unwrap();
    {
        let mut txn = db.new_transaction().unwrap();
        txn.put(b"b", b"2").unwrap();
        txn.commit().unwrap();
    }

    // WRITE handles can also read
    let mut cursor = db.new_cursor().unwrap();
    assert_eq!(drain(&mut cursor), owned(&[("a", "1"), ("b", "2")]));
}

// =============================================================================
// Close Tests
// =============================================================================

#[test]
fn test_close_is_idempotent() {
    let (_temp, path) = setup_temp_file();
    let mut db = DatumFileDb::open(&path, Mode::New, &Config::default()).unwrap();

    db.close().unwrap();
    db.close().unwrap();

    assert!(db.is_closed());
}

#[test]
fn test_closed_store_rejects_use() {
    let (_temp, path) = setup_temp_file();
    write_records(&path, &[("a", "1")]);
    let mut db = DatumFileDb::open(&path, Mode::Write, &Config::default()).unwrap();
    db.close().unwrap();

    assert!(matches!(db.new_cursor(), Err(StoreError::Closed)));
    assert!(matches!(db.new_transaction(), Err(StoreError::Closed)));
}

#[test]
fn test_independent_cursors() {
    let (_temp, path) = setup_temp_file();
    write_records(&path, &[("a", "1"), ("b", "2")]);
    let db = DatumFileDb::open(&path, Mode::Read, &Config::default()).unwrap();

    let mut first = db.new_cursor().unwrap();
    let second = db.new_cursor().unwrap();
    first.next().unwrap();

    assert_eq!(first.key(), b"b");
    assert_eq!(second.key(), b"a");
}
