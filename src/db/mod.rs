//! Storage Interface
//!
//! The contract every backend implements: a store handle opened under a
//! [`Mode`], a forward-only [`Cursor`] for reading and an append-only
//! [`Transaction`] for writing.
//!
//! ## Backends
//! ```text
//!   BackendKind ──► open_store() ──► Store
//!                                     ├── DatumFile  (always built)
//!                                     ├── LevelDb    (feature "leveldb")
//!                                     └── Lmdb       (feature "lmdb")
//! ```
//!
//! ## Cursor States
//! ```text
//!   uninitialized ──seek_to_first()──► positioned ──next()──► positioned
//!                         │                 │
//!                         ▼                 ▼
//!                     exhausted ◄───────────┘   (EOF or decode failure)
//! ```
//!
//! Handles, cursors and transactions are single-threaded objects. Sharing
//! one handle between threads is the caller's responsibility.

mod backend;
mod store;

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use crate::error::{Result, StoreError};

pub use backend::{BackendKind, DataSource};
pub use store::{open_store, Store, StoreCursor, StoreTransaction};

// =============================================================================
// Access Mode
// =============================================================================

/// How a store location is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Existing store, read-only
    Read,
    /// Create a fresh store; the location must not exist. Write-only.
    New,
    /// Existing store, writes allowed (reads too)
    Write,
}

impl Mode {
    /// Whether cursors may be created under this mode
    pub fn can_read(self) -> bool {
        matches!(self, Mode::Read | Mode::Write)
    }

    /// Whether transactions may be created under this mode
    pub fn can_write(self) -> bool {
        matches!(self, Mode::New | Mode::Write)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Read => "READ",
            Mode::New => "NEW",
            Mode::Write => "WRITE",
        };
        f.write_str(name)
    }
}

impl FromStr for Mode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(Mode::Read),
            "new" => Ok(Mode::New),
            "write" => Ok(Mode::Write),
            _ => Err(StoreError::Config(format!("unknown store mode: {:?}", s))),
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// One owned (key, value) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Bytes,
    pub value: Bytes,
}

impl Record {
    pub fn new(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Why a cursor stopped producing records
///
/// `valid()` alone cannot tell a finished scan from one that hit a damaged
/// tail; this is the distinct signal for callers that need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Clean end of data on a record boundary
    EndOfData,
    /// A record started at `offset` but the data ended before it did
    Truncated { offset: u64 },
    /// The record at `offset` declares `size` bytes, over the configured bound
    OversizedEntry { offset: u64, size: u64 },
    /// Reading failed at `offset` for a reason other than end of file
    Io { offset: u64 },
}

impl StopReason {
    /// True when the scan ended on a clean record boundary
    pub fn is_clean(self) -> bool {
        self == StopReason::EndOfData
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndOfData => f.write_str("end of data"),
            StopReason::Truncated { offset } => {
                write!(f, "truncated record at offset {}", offset)
            }
            StopReason::OversizedEntry { offset, size } => {
                write!(f, "oversized record ({} bytes) at offset {}", size, offset)
            }
            StopReason::Io { offset } => write!(f, "read failure at offset {}", offset),
        }
    }
}

// =============================================================================
// Capability Traits
// =============================================================================

/// Forward-only, single-pass reader over a store's records
pub trait Cursor {
    /// Restart from the first record. Reopens the underlying source.
    fn seek_to_first(&mut self) -> Result<()>;

    /// Advance to the next record. A no-op once exhausted.
    fn next(&mut self) -> Result<()>;

    /// True iff positioned at a record
    fn valid(&self) -> bool;

    /// The current record, or `None` when not positioned
    fn current(&self) -> Option<(&[u8], &[u8])>;

    /// Why the cursor is exhausted; `None` while positioned
    fn stop_reason(&self) -> Option<StopReason>;

    /// Key of the current record
    ///
    /// # Panics
    /// If the cursor is not positioned at a record.
    fn key(&self) -> &[u8] {
        match self.current() {
            Some((key, _)) => key,
            None => panic!("not valid state at key(): cursor is not positioned at a record"),
        }
    }

    /// Value of the current record
    ///
    /// # Panics
    /// If the cursor is not positioned at a record.
    fn value(&self) -> &[u8] {
        match self.current() {
            Some((_, value)) => value,
            None => panic!("not valid state at value(): cursor is not positioned at a record"),
        }
    }

    /// Owned copy of the current record
    fn record(&self) -> Option<Record> {
        self.current()
            .map(|(k, v)| Record::new(Bytes::copy_from_slice(k), Bytes::copy_from_slice(v)))
    }
}

/// Append-only write accumulator with an explicit flush point
///
/// There is no rollback: an accepted `put` reaches storage on the next
/// commit, or at the latest when the transaction is dropped or the owning
/// store is closed.
pub trait Transaction {
    /// Queue one record
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Make every queued record durable
    fn commit(&mut self) -> Result<()>;
}
