//! Configuration for datumstore
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, StoreError};

/// Default maximum encoded size of one datum file record (100 MiB)
pub const DEFAULT_MAX_ENTRY_SIZE: u64 = 100 * 1024 * 1024;

/// Default LMDB map size (1 TiB)
pub const DEFAULT_LMDB_MAP_SIZE: usize = 1 << 40;

/// Store configuration shared by every backend
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Datum File Configuration
    // -------------------------------------------------------------------------
    /// Largest encoded record (length prefixes included) a cursor accepts.
    /// Length fields implying more than this are treated as end of data.
    pub max_entry_size: u64,

    /// Capacity of the buffered writer behind transactions (in bytes)
    pub write_buffer_size: usize,

    /// fsync the file on every commit, not just flush the buffer
    pub sync_on_commit: bool,

    // -------------------------------------------------------------------------
    // LMDB Configuration
    // -------------------------------------------------------------------------
    /// Maximum size of the LMDB memory map (in bytes)
    pub lmdb_map_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
            write_buffer_size: 64 * 1024, // 64 KB
            sync_on_commit: false,
            lmdb_map_size: DEFAULT_LMDB_MAP_SIZE,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the maximum encoded record size (in bytes)
    pub fn max_entry_size(mut self, size: u64) -> Self {
        self.config.max_entry_size = size;
        self
    }

    /// Set the write buffer capacity (in bytes)
    pub fn write_buffer_size(mut self, size: usize) -> Self {
        self.config.write_buffer_size = size;
        self
    }

    /// fsync on every commit
    pub fn sync_on_commit(mut self, sync: bool) -> Self {
        self.config.sync_on_commit = sync;
        self
    }

    /// Set the LMDB map size (in bytes)
    pub fn lmdb_map_size(mut self, size: usize) -> Self {
        self.config.lmdb_map_size = size;
        self
    }

    /// Validate and return the config
    pub fn build(self) -> Result<Config> {
        let config = self.config;

        // Two length prefixes are the smallest possible record
        if config.max_entry_size < crate::datumfile::FRAME_OVERHEAD {
            return Err(StoreError::Config(format!(
                "max_entry_size must be at least {} bytes, got {}",
                crate::datumfile::FRAME_OVERHEAD,
                config.max_entry_size
            )));
        }
        if config.write_buffer_size == 0 {
            return Err(StoreError::Config(
                "write_buffer_size must be non-zero".to_string(),
            ));
        }
        if config.lmdb_map_size == 0 {
            return Err(StoreError::Config("lmdb_map_size must be non-zero".to_string()));
        }

        Ok(config)
    }
}
