//! Error types for datumstore
//!
//! Provides a unified error type for all store operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::db::{BackendKind, Mode};

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for datumstore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Backend Selection Errors
    // -------------------------------------------------------------------------
    /// The identifier is not one of the known backends. Callers treat this
    /// as fatal: no store can be produced without knowing the format.
    #[error("Unknown database backend: {0:?}")]
    UnknownBackend(String),

    #[error("Backend {0} is not compiled in (enable the \"{0}\" feature)")]
    BackendUnavailable(BackendKind),

    #[error("Backend error: {0}")]
    Backend(String),

    // -------------------------------------------------------------------------
    // Open / Mode Errors
    // -------------------------------------------------------------------------
    #[error("Store location does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Store location already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Store opened in {0} mode cannot be read")]
    NotReadable(Mode),

    #[error("Store opened in {0} mode cannot be written")]
    NotWritable(Mode),

    #[error("Store is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    #[error("Entry field of {len} bytes does not fit a u32 length prefix")]
    EntryTooLarge { len: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
