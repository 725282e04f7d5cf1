//! Backend identifiers
//!
//! Two entry points resolve to the same closed set of backends: a string
//! (command lines, free-form input) and a numeric code (structured config
//! messages). Both reject anything else with [`StoreError::UnknownBackend`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Result, StoreError};

use super::{open_store, Mode, Store};

/// The closed set of storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// LevelDB directory store
    LevelDb = 0,
    /// LMDB directory store
    Lmdb = 1,
    /// Flat append-only datum file
    DatumFile = 2,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [BackendKind::LevelDb, BackendKind::Lmdb, BackendKind::DatumFile];

    /// String identifier
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::LevelDb => "leveldb",
            BackendKind::Lmdb => "lmdb",
            BackendKind::DatumFile => "datumfile",
        }
    }

    /// Numeric code used in structured config messages
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Whether this backend was compiled into the binary
    pub fn is_available(self) -> bool {
        match self {
            BackendKind::LevelDb => cfg!(feature = "leveldb"),
            BackendKind::Lmdb => cfg!(feature = "lmdb"),
            BackendKind::DatumFile => true,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "leveldb" => Ok(BackendKind::LevelDb),
            "lmdb" => Ok(BackendKind::Lmdb),
            "datumfile" => Ok(BackendKind::DatumFile),
            other => Err(StoreError::UnknownBackend(other.to_string())),
        }
    }
}

impl TryFrom<i32> for BackendKind {
    type Error = StoreError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(BackendKind::LevelDb),
            1 => Ok(BackendKind::Lmdb),
            2 => Ok(BackendKind::DatumFile),
            other => Err(StoreError::UnknownBackend(other.to_string())),
        }
    }
}

/// Structured description of where records live
///
/// ```json
/// { "source": "train.datum", "backend": "datumfile" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub source: PathBuf,
    pub backend: BackendKind,
}

impl DataSource {
    pub fn new(backend: BackendKind, source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            backend,
        }
    }

    /// Open the described store
    pub fn open(&self, mode: Mode, config: &Config) -> Result<Store> {
        open_store(self.backend, &self.source, mode, config)
    }
}
