//! Backend Factory
//!
//! Resolves a [`BackendKind`] to a concrete store and dispatches the
//! capability calls over the closed set of variants.

use std::path::Path;

use crate::config::Config;
use crate::datumfile::{DatumFileCursor, DatumFileDb, DatumFileTransaction};
use crate::error::{Result, StoreError};

#[cfg(feature = "leveldb")]
use crate::leveldb::{LevelDb, LevelDbCursor, LevelDbTransaction};
#[cfg(feature = "lmdb")]
use crate::lmdb::{Lmdb, LmdbCursor, LmdbTransaction};

use super::{BackendKind, Cursor, Mode, StopReason, Transaction};

/// Open a store of the given kind
///
/// Fails with `BackendUnavailable` if the backend's feature is not enabled.
pub fn open_store(kind: BackendKind, path: &Path, mode: Mode, config: &Config) -> Result<Store> {
    tracing::debug!("Opening {} store at {} ({})", kind, path.display(), mode);

    match kind {
        BackendKind::DatumFile => Ok(Store::DatumFile(DatumFileDb::open(path, mode, config)?)),

        #[cfg(feature = "leveldb")]
        BackendKind::LevelDb => Ok(Store::LevelDb(LevelDb::open(path, mode, config)?)),

        #[cfg(feature = "lmdb")]
        BackendKind::Lmdb => Ok(Store::Lmdb(Lmdb::open(path, mode, config)?)),

        #[allow(unreachable_patterns)]
        other => Err(StoreError::BackendUnavailable(other)),
    }
}

// =============================================================================
// Store Handle
// =============================================================================

/// An opened store of any backend
///
/// Dropping the handle closes it.
pub enum Store {
    DatumFile(DatumFileDb),
    #[cfg(feature = "leveldb")]
    LevelDb(LevelDb),
    #[cfg(feature = "lmdb")]
    Lmdb(Lmdb),
}

impl Store {
    pub fn kind(&self) -> BackendKind {
        match self {
            Store::DatumFile(_) => BackendKind::DatumFile,
            #[cfg(feature = "leveldb")]
            Store::LevelDb(_) => BackendKind::LevelDb,
            #[cfg(feature = "lmdb")]
            Store::Lmdb(_) => BackendKind::Lmdb,
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Store::DatumFile(db) => db.mode(),
            #[cfg(feature = "leveldb")]
            Store::LevelDb(db) => db.mode(),
            #[cfg(feature = "lmdb")]
            Store::Lmdb(db) => db.mode(),
        }
    }

    /// Release the store's resources. Safe to call repeatedly.
    pub fn close(&mut self) -> Result<()> {
        match self {
            Store::DatumFile(db) => db.close(),
            #[cfg(feature = "leveldb")]
            Store::LevelDb(db) => db.close(),
            #[cfg(feature = "lmdb")]
            Store::Lmdb(db) => db.close(),
        }
    }

    /// Create a cursor positioned at the first record
    pub fn new_cursor(&mut self) -> Result<StoreCursor> {
        match self {
            Store::DatumFile(db) => Ok(StoreCursor::DatumFile(db.new_cursor()?)),
            #[cfg(feature = "leveldb")]
            Store::LevelDb(db) => Ok(StoreCursor::LevelDb(db.new_cursor()?)),
            #[cfg(feature = "lmdb")]
            Store::Lmdb(db) => Ok(StoreCursor::Lmdb(db.new_cursor()?)),
        }
    }

    /// Create a write transaction borrowing this store
    pub fn new_transaction(&mut self) -> Result<StoreTransaction<'_>> {
        match self {
            Store::DatumFile(db) => Ok(StoreTransaction::DatumFile(db.new_transaction()?)),
            #[cfg(feature = "leveldb")]
            Store::LevelDb(db) => Ok(StoreTransaction::LevelDb(db.new_transaction()?)),
            #[cfg(feature = "lmdb")]
            Store::Lmdb(db) => Ok(StoreTransaction::Lmdb(db.new_transaction()?)),
        }
    }
}

// =============================================================================
// Cursor Dispatch
// =============================================================================

/// A cursor over any backend
pub enum StoreCursor {
    DatumFile(DatumFileCursor),
    #[cfg(feature = "leveldb")]
    LevelDb(LevelDbCursor),
    #[cfg(feature = "lmdb")]
    Lmdb(LmdbCursor),
}

macro_rules! dispatch_cursor {
    ($self:expr, $c:ident => $body:expr) => {
        match $self {
            StoreCursor::DatumFile($c) => $body,
            #[cfg(feature = "leveldb")]
            StoreCursor::LevelDb($c) => $body,
            #[cfg(feature = "lmdb")]
            StoreCursor::Lmdb($c) => $body,
        }
    };
}

impl Cursor for StoreCursor {
    fn seek_to_first(&mut self) -> Result<()> {
        dispatch_cursor!(self, c => c.seek_to_first())
    }

    fn next(&mut self) -> Result<()> {
        dispatch_cursor!(self, c => c.next())
    }

    fn valid(&self) -> bool {
        dispatch_cursor!(self, c => c.valid())
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        dispatch_cursor!(self, c => c.current())
    }

    fn stop_reason(&self) -> Option<StopReason> {
        dispatch_cursor!(self, c => c.stop_reason())
    }
}

// =============================================================================
// Transaction Dispatch
// =============================================================================

/// A write transaction over any backend
pub enum StoreTransaction<'a> {
    DatumFile(DatumFileTransaction<'a>),
    #[cfg(feature = "leveldb")]
    LevelDb(LevelDbTransaction<'a>),
    #[cfg(feature = "lmdb")]
    Lmdb(LmdbTransaction<'a>),
}

impl Transaction for StoreTransaction<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        match self {
            StoreTransaction::DatumFile(txn) => txn.put(key, value),
            #[cfg(feature = "leveldb")]
            StoreTransaction::LevelDb(txn) => txn.put(key, value),
            #[cfg(feature = "lmdb")]
            StoreTransaction::Lmdb(txn) => txn.put(key, value),
        }
    }

    fn commit(&mut self) -> Result<()> {
        match self {
            StoreTransaction::DatumFile(txn) => txn.commit(),
            #[cfg(feature = "leveldb")]
            StoreTransaction::LevelDb(txn) => txn.commit(),
            #[cfg(feature = "lmdb")]
            StoreTransaction::Lmdb(txn) => txn.commit(),
        }
    }
}
