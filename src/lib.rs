//! # datumstore
//!
//! Ordered collections of opaque (key, value) records behind one storage
//! interface, with interchangeable backends:
//! - `datumfile`: flat append-only file, always built
//! - `leveldb`: LevelDB directory (feature `leveldb`)
//! - `lmdb`: LMDB environment (feature `lmdb`)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    convert-format (bin)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  BackendKind ("leveldb" | "lmdb" | "datumfile")
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  open_store() → Store                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Cursor    │          │ Transaction │
//!   │ (read path) │          │ (write path)│
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use datumstore::{open_store, BackendKind, Config, Cursor, Mode, Transaction};
//!
//! # fn main() -> datumstore::Result<()> {
//! let config = Config::default();
//! let mut store = open_store(BackendKind::DatumFile, "train.datum".as_ref(), Mode::New, &config)?;
//! let mut txn = store.new_transaction()?;
//! txn.put(b"00000001", b"payload")?;
//! txn.commit()?;
//! drop(txn);
//! store.close()?;
//!
//! let mut store = open_store(BackendKind::DatumFile, "train.datum".as_ref(), Mode::Read, &config)?;
//! let mut cursor = store.new_cursor()?;
//! while cursor.valid() {
//!     println!("{:?}", cursor.key());
//!     cursor.next()?;
//! }
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod db;
pub mod datumfile;
#[cfg(feature = "leveldb")]
pub mod leveldb;
#[cfg(feature = "lmdb")]
pub mod lmdb;
pub mod convert;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::Config;
pub use db::{
    open_store, BackendKind, Cursor, DataSource, Mode, Record, StopReason, Store, StoreCursor,
    StoreTransaction, Transaction,
};
pub use convert::{convert, ConvertSummary};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of datumstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
