//! Shared helpers for datum file tests

use std::path::{Path, PathBuf};

use datumstore::datumfile::DatumFileDb;
use datumstore::{Config, Cursor, Mode, Transaction};
use tempfile::TempDir;

/// Owned (key, value) pairs in file order
pub type Records = Vec<(Vec<u8>, Vec<u8>)>;

pub fn setup_temp_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.datum");
    (temp_dir, path)
}

/// Create a new datum file holding `records`, committed and closed
pub fn write_records<K: AsRef<[u8]>, V: AsRef<[u8]>>(path: &Path, records: &[(K, V)]) {
    let mut db = DatumFileDb::open(path, Mode::New, &Config::default()).unwrap();
    let mut txn = db.new_transaction().unwrap();
    for (key, value) in records {
        txn.put(key.as_ref(), value.as_ref()).unwrap();
    }
    txn.commit().unwrap();
    drop(txn);
    db.close().unwrap();
}

/// Drain a cursor from its current position
pub fn drain<C: Cursor>(cursor: &mut C) -> Records {
    let mut out = Vec::new();
    while cursor.valid() {
        out.push((cursor.key().to_vec(), cursor.value().to_vec()));
        cursor.next().unwrap();
    }
    out
}

/// Read every record of a datum file with the given config
pub fn read_all_with(path: &Path, config: &Config) -> Records {
    let db = DatumFileDb::open(path, Mode::Read, config).unwrap();
    let mut cursor = db.new_cursor().unwrap();
    drain(&mut cursor)
}

pub fn read_all(path: &Path) -> Records {
    read_all_with(path, &Config::default())
}

pub fn owned<K: AsRef<[u8]>, V: AsRef<[u8]>>(records: &[(K, V)]) -> Records {
    records
        .iter()
        .map(|(k, v)| (k.as_ref().to_vec(), v.as_ref().to_vec()))
        .collect()
}

/// Hand-encode one record in the on-disk layout
pub fn frame(key: &[u8], value: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(key.len() as u32).to_le_bytes());
    out.extend_from_slice(key);
    out.extend_from_slice(&(value.len() as u32).to_le_bytes());
    out.extend_from_slice(value);
    out
}
