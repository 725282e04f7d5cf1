//! LMDB Backend
//!
//! Adapter over `heed`. The store is a directory holding one unnamed
//! database; keys are unique and iterate in sorted order.

use std::fs;
use std::path::{Path, PathBuf};

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::config::Config;
use crate::db::{Cursor, Mode, StopReason, Transaction};
use crate::error::{Result, StoreError};

type RecordDb = Database<Bytes, Bytes>;

fn backend_err(e: heed::Error) -> StoreError {
    StoreError::Backend(format!("lmdb: {}", e))
}

/// Store handle for an LMDB environment directory
pub struct Lmdb {
    path: PathBuf,
    mode: Mode,
    env: Option<Env>,
    db: Option<RecordDb>,
}

impl Lmdb {
    pub fn open(path: &Path, mode: Mode, config: &Config) -> Result<Self> {
        match mode {
            Mode::New => {
                if path.exists() {
                    return Err(StoreError::AlreadyExists(path.to_path_buf()));
                }
                fs::create_dir(path)?;
            }
            Mode::Read | Mode::Write => {
                if !path.is_dir() {
                    return Err(StoreError::NotFound(path.to_path_buf()));
                }
            }
        }

        let (env, db) = match open_env(path, mode, config) {
            Ok(opened) => opened,
            Err(e) => {
                // Don't leave behind the directory NEW just created
                if matches!(mode, Mode::New) {
                    if let Err(cleanup) = fs::remove_dir_all(path) {
                        tracing::warn!("Failed to remove {}: {}", path.display(), cleanup);
                    }
                }
                return Err(e);
            }
        };

        tracing::debug!("Opened lmdb {} in {} mode", path.display(), mode);

        Ok(Self {
            path: path.to_path_buf(),
            mode,
            env: Some(env),
            db,
        })
    }

    pub fn close(&mut self) -> Result<()> {
        if let Some(env) = self.env.take() {
            if self.mode.can_write() {
                env.force_sync().map_err(backend_err)?;
            }
            tracing::debug!("Closed lmdb {}", self.path.display());
        }
        Ok(())
    }

    pub fn new_cursor(&mut self) -> Result<LmdbCursor> {
        if !self.mode.can_read() {
            return Err(StoreError::NotReadable(self.mode));
        }
        let env = self.env.clone().ok_or(StoreError::Closed)?;
        LmdbCursor::new(env, self.db)
    }

    pub fn new_transaction(&mut self) -> Result<LmdbTransaction<'_>> {
        if !self.mode.can_write() {
            return Err(StoreError::NotWritable(self.mode));
        }
        let env = self.env.as_ref().ok_or(StoreError::Closed)?;
        let db = self
            .db
            .ok_or_else(|| StoreError::Backend("lmdb: database not created".to_string()))?;
        Ok(LmdbTransaction {
            env,
            db,
            pending: Vec::new(),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl Drop for Lmdb {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("Failed to close lmdb {}: {}", self.path.display(), e);
        }
    }
}

/// Map the environment and open the unnamed database, creating it when writable
fn open_env(path: &Path, mode: Mode, config: &Config) -> Result<(Env, Option<RecordDb>)> {
    // SAFETY: the environment is opened once per handle and this crate
    // never maps the same directory twice within one process.
    let env = unsafe {
        EnvOpenOptions::new()
            .map_size(config.lmdb_map_size)
            .open(path)
            .map_err(backend_err)?
    };

    let db = if mode.can_write() {
        let mut wtxn = env.write_txn().map_err(backend_err)?;
        let db: RecordDb = env.create_database(&mut wtxn, None).map_err(backend_err)?;
        wtxn.commit().map_err(backend_err)?;
        Some(db)
    } else {
        let rtxn = env.read_txn().map_err(backend_err)?;
        let db: Option<RecordDb> = env.open_database(&rtxn, None).map_err(backend_err)?;
        drop(rtxn);
        db
    };

    Ok((env, db))
}

/// Cursor walking the database in key order
///
/// Each step runs in its own short read transaction, positioned by the
/// previous key.
pub struct LmdbCursor {
    env: Env,
    /// `None` when the environment holds no database yet
    db: Option<RecordDb>,
    key: Vec<u8>,
    value: Vec<u8>,
    valid: bool,
}

impl LmdbCursor {
    fn new(env: Env, db: Option<RecordDb>) -> Result<Self> {
        let mut cursor = Self {
            env,
            db,
            key: Vec::new(),
            value: Vec::new(),
            valid: false,
        };
        cursor.seek_to_first()?;
        Ok(cursor)
    }

    fn step(&mut self, after: Option<&[u8]>) -> Result<()> {
        let db = match self.db {
            Some(db) => db,
            None => {
                self.valid = false;
                return Ok(());
            }
        };

        let rtxn = self.env.read_txn().map_err(backend_err)?;
        let found = match after {
            None => db.first(&rtxn),
            Some(key) => db.get_greater_than(&rtxn, key),
        }
        .map_err(backend_err)?;

        match found {
            Some((key, value)) => {
                self.key = key.to_vec();
                self.value = value.to_vec();
                self.valid = true;
            }
            None => {
                self.key.clear();
                self.value.clear();
                self.valid = false;
            }
        }
        Ok(())
    }
}

impl Cursor for LmdbCursor {
    fn seek_to_first(&mut self) -> Result<()> {
        self.step(None)
    }

    fn next(&mut self) -> Result<()> {
        if !self.valid {
            return Ok(());
        }
        let last = std::mem::take(&mut self.key);
        self.step(Some(&last))
    }

    fn valid(&self) -> bool {
        self.valid
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        self.valid.then(|| (self.key.as_slice(), self.value.as_slice()))
    }

    fn stop_reason(&self) -> Option<StopReason> {
        (!self.valid).then_some(StopReason::EndOfData)
    }
}

/// Buffers puts and applies them in one write transaction on commit
pub struct LmdbTransaction<'a> {
    env: &'a Env,
    db: RecordDb,
    pending: Vec<(Vec<u8>, Vec<u8>)>,
}

impl Transaction for LmdbTransaction<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.pending.push((key.to_vec(), value.to_vec()));
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let mut wtxn = self.env.write_txn().map_err(backend_err)?;
        for (key, value) in &self.pending {
            self.db.put(&mut wtxn, key, value).map_err(backend_err)?;
        }
        wtxn.commit().map_err(backend_err)?;

        tracing::debug!("Committed {} records to lmdb", self.pending.len());
        self.pending.clear();
        Ok(())
    }
}

impl Drop for LmdbTransaction<'_> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            if let Err(e) = self.commit() {
                tracing::warn!("Failed to apply pending lmdb writes on drop: {}", e);
            }
        }
    }
}
