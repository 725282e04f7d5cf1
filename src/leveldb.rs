//! LevelDB Backend
//!
//! Adapter over `rusty-leveldb`. The store is a directory; keys are unique
//! and iterate in sorted order.

use std::path::{Path, PathBuf};

use rusty_leveldb::{LdbIterator, Options, WriteBatch, DB};

use crate::config::Config;
use crate::db::{Cursor, Mode, StopReason, Transaction};
use crate::error::{Result, StoreError};

fn backend_err(e: rusty_leveldb::Status) -> StoreError {
    StoreError::Backend(format!("leveldb: {}", e))
}

/// Store handle for a LevelDB directory
pub struct LevelDb {
    path: PathBuf,
    mode: Mode,
    db: Option<DB>,
}

impl LevelDb {
    pub fn open(path: &Path, mode: Mode, _config: &Config) -> Result<Self> {
        let mut options = Options::default();
        match mode {
            Mode::New => {
                if path.exists() {
                    return Err(StoreError::AlreadyExists(path.to_path_buf()));
                }
                // The existence check above covers NEW; error_if_exists also
                // rejects missing paths in this engine.
                options.create_if_missing = true;
            }
            Mode::Read | Mode::Write => {
                if !path.is_dir() {
                    return Err(StoreError::NotFound(path.to_path_buf()));
                }
                options.create_if_missing = false;
            }
        }

        let db = DB::open(path, options).map_err(backend_err)?;
        tracing::debug!("Opened leveldb {} in {} mode", path.display(), mode);

        Ok(Self {
            path: path.to_path_buf(),
            mode,
            db: Some(db),
        })
    }

    pub fn close(&mut self) -> Result<()> {
        if let Some(mut db) = self.db.take() {
            if self.mode.can_write() {
                db.flush().map_err(backend_err)?;
            }
            tracing::debug!("Closed leveldb {}", self.path.display());
        }
        Ok(())
    }

    pub fn new_cursor(&mut self) -> Result<LevelDbCursor> {
        if !self.mode.can_read() {
            return Err(StoreError::NotReadable(self.mode));
        }
        let db = self.db.as_mut().ok_or(StoreError::Closed)?;
        let iter = db.new_iter().map_err(backend_err)?;
        LevelDbCursor::new(iter)
    }

    pub fn new_transaction(&mut self) -> Result<LevelDbTransaction<'_>> {
        if !self.mode.can_write() {
            return Err(StoreError::NotWritable(self.mode));
        }
        let db = self.db.as_mut().ok_or(StoreError::Closed)?;
        Ok(LevelDbTransaction {
            db,
            batch: WriteBatch::new(),
            pending: 0,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl Drop for LevelDb {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("Failed to close leveldb {}: {}", self.path.display(), e);
        }
    }
}

/// Cursor over a LevelDB snapshot iterator
pub struct LevelDbCursor {
    iter: rusty_leveldb::DBIterator,
    key: Vec<u8>,
    value: Vec<u8>,
    valid: bool,
}

impl LevelDbCursor {
    fn new(iter: rusty_leveldb::DBIterator) -> Result<Self> {
        let mut cursor = Self {
            iter,
            key: Vec::new(),
            value: Vec::new(),
            valid: false,
        };
        cursor.seek_to_first()?;
        Ok(cursor)
    }

    fn load(&mut self) {
        self.valid = self.iter.valid() && self.iter.current(&mut self.key, &mut self.value);
    }
}

impl Cursor for LevelDbCursor {
    fn seek_to_first(&mut self) -> Result<()> {
        self.iter.seek_to_first();
        self.load();
        Ok(())
    }

    fn next(&mut self) -> Result<()> {
        if self.valid {
            self.iter.advance();
            self.load();
        }
        Ok(())
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

/// Buffers puts in a write batch applied on commit
pub struct LevelDbTransaction<'a> {
    db: &'a mut DB,
    batch: WriteBatch,
    pending: u64,
}

impl Transaction for LevelDbTransaction<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.batch.put(key, value);
        self.pending += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let batch = std::mem::replace(&mut self.batch, WriteBatch::new());
        self.db.write(batch, false).map_err(backend_err)?;
        self.db.flush().map_err(backend_err)?;

        tracing::debug!("Committed {} records to leveldb", self.pending);
        self.pending = 0;
        Ok(())
    }
}

impl Drop for LevelDbTransaction<'_> {
    fn drop(&mut self) {
        if self.pending > 0 {
            if let Err(e) = self.commit() {
                tracing::warn!("Failed to apply pending leveldb writes on drop: {}", e);
            }
        }
    }
}
