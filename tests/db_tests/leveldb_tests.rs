//! Tests for the LevelDB adapter (feature "leveldb")
//!
//! These tests verify:
//! - Directory-level open checks per mode
//! - Sorted iteration over committed records
//! - Conversion to and from the datum file backend

use datumstore::{convert, open_store, BackendKind, Config, Cursor, Mode, StoreError, Transaction};
use tempfile::TempDir;

fn collect<C: Cursor>(cursor: &mut C) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut out = Vec::new();
    while cursor.valid() {
        out.push((cursor.key().to_vec(), cursor.value().to_vec()));
        cursor.next().unwrap();
    }
    out
}

#[test]
fn test_leveldb_open_checks() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("db");
    let config = Config::default();

    assert!(matches!(
        open_store(BackendKind::LevelDb, &path, Mode::Read, &config),
        Err(StoreError::NotFound(_))
    ));

    let store = open_store(BackendKind::LevelDb, &path, Mode::New, &config).unwrap();
    drop(store);
    assert!(path.is_dir());

    assert!(matches!(
        open_store(BackendKind::LevelDb, &path, Mode::New, &config),
        Err(StoreError::AlreadyExists(_))
    ));
}

#[test]
fn test_leveldb_iterates_in_key_order() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("db");
    let config = Config::default();

    let mut store = open_store(BackendKind::LevelDb, &path, Mode::New, &config).unwrap();
    {
        let mut txn = store.new_transaction().unwrap();
        txn.put(b"c", b"3").unwrap();
        txn.put(b"a", b"1").unwrap();
        txn.put(b"b", b"22").unwrap();
        txn.commit().unwrap();
    }
    store.close().unwrap();

    let mut store = open_store(BackendKind::LevelDb, &path, Mode::Read, &config).unwrap();
    let mut cursor = store.new_cursor().unwrap();
    let expected = vec![
        (b"a".to_vec(), b"1".to_vec()),
        (b"b".to_vec(), b"22".to_vec()),
        (b"c".to_vec(), b"3".to_vec()),
    ];
    assert_eq!(collect(&mut cursor), expected);

    cursor.seek_to_first().unwrap();
    assert_eq!(cursor.key(), b"a");
}

#[test]
fn test_leveldb_mode_violations() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("db");
    let config = Config::default();

    let mut store = open_store(BackendKind::LevelDb, &path, Mode::New, &config).unwrap();
    assert!(matches!(store.new_cursor(), Err(StoreError::NotReadable(Mode::New))));
    store.close().unwrap();

    let mut store = open_store(BackendKind::LevelDb, &path, Mode::Read, &config).unwrap();
    assert!(matches!(store.new_transaction(), Err(StoreError::NotWritable(Mode::Read))));
}

#[test]
fn test_leveldb_datumfile_round_trip() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.datum");
    let middle = temp.path().join("middle");
    let target = temp.path().join("target.datum");
    let config = Config::default();

    let mut store = open_store(BackendKind::DatumFile, &source, Mode::New, &config).unwrap();
    {
        let mut txn = store.new_transaction().unwrap();
        for i in 0..100u32 {
            txn.put(format!("{:05}", i).as_bytes(), &i.to_le_bytes()).unwrap();
        }
        txn.commit().unwrap();
    }
    store.close().unwrap();

    for (from_kind, from, to_kind, to) in [
        (BackendKind::DatumFile, &source, BackendKind::LevelDb, &middle),
        (BackendKind::LevelDb, &middle, BackendKind::DatumFile, &target),
    ] {
        let mut input = open_store(from_kind, from, Mode::Read, &config).unwrap();
        let mut cursor = input.new_cursor().unwrap();
        let mut output = open_store(to_kind, to, Mode::New, &config).unwrap();
        let summary = {
            let mut txn = output.new_transaction().unwrap();
            convert(&mut cursor, &mut txn).unwrap()
        };
        output.close().unwrap();
        assert_eq!(summary.records, 100);
    }

    let mut original = open_store(BackendKind::DatumFile, &source, Mode::Read, &config).unwrap();
    let mut copied = open_store(BackendKind::DatumFile, &target, Mode::Read, &config).unwrap();
    assert_eq!(
        collect(&mut original.new_cursor().unwrap()),
        collect(&mut copied.new_cursor().unwrap())
    );
}

#[test]
fn test_leveldb_new_creates_missing_directory() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("db");
    assert!(!path.exists());

    let mut store = open_store(BackendKind::LevelDb, &path, Mode::New, &Config::default()).unwrap();

    assert_eq!(store.mode(), Mode::New);
    assert!(path.is_dir());
    store.close().unwrap();
}

#[test]
fn test_leveldb_dropped_transaction_keeps_puts() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("db");
    let config = Config::default();

    let mut store = open_store(BackendKind::LevelDb, &path, Mode::New, &config).unwrap();
    {
        let mut txn = store.new_transaction().unwrap();
        txn.put(b"a", b"1").unwrap();
        txn.put(b"b", b"22").unwrap();
    }
    store.close().unwrap();

    let mut store = open_store(BackendKind::LevelDb, &path, Mode::Read, &config).unwrap();
    let mut cursor = store.new_cursor().unwrap();
    let expected = vec![(b"a".to_vec(), b"1".to_vec()), (b"b".to_vec(), b"22".to_vec())];
    assert_eq!(collect(&mut cursor), expected);
}
