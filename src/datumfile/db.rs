//! Datum File Store Handle
//!
//! Owns the write stream for the file. Cursors open their own read streams.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::db::Mode;
use crate::error::{Result, StoreError};

use super::{DatumFileCursor, DatumFileTransaction};

/// Store handle for a single datum file
pub struct DatumFileDb {
    /// Location of the file
    path: PathBuf,
    /// Access mode fixed at open
    mode: Mode,
    /// Read bound, buffer size, sync policy
    config: Config,
    /// Write stream, present for NEW/WRITE handles until close
    writer: Option<BufWriter<File>>,
    closed: bool,
}

impl DatumFileDb {
    /// Open a datum file
    ///
    /// - `Read`: the file must exist
    /// - `New`: the file must not exist; it is created empty right away
    /// - `Write`: the file must exist; records are appended after its end
    pub fn open(path: &Path, mode: Mode, config: &Config) -> Result<Self> {
        let file = match mode {
            Mode::Read => {
                if !path.is_file() {
                    return Err(StoreError::NotFound(path.to_path_buf()));
                }
                None
            }
            Mode::New => {
                let file = OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(path)
                    .map_err(|e| match e.kind() {
                        io::ErrorKind::AlreadyExists => StoreError::AlreadyExists(path.to_path_buf()),
                        _ => StoreError::Io(e),
                    })?;
                Some(file)
            }
            Mode::Write => {
                if !path.is_file() {
                    return Err(StoreError::NotFound(path.to_path_buf()));
                }
                Some(OpenOptions::new().append(true).open(path)?)
            }
        };

        tracing::debug!("Opened datum file {} in {} mode", path.display(), mode);

        Ok(Self {
            path: path.to_path_buf(),
            mode,
            config: config.clone(),
            writer: file.map(|f| BufWriter::with_capacity(config.write_buffer_size, f)),
            closed: false,
        })
    }

    /// Flush pending writes and release the file. Later calls are no-ops.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            if self.config.sync_on_commit {
                writer.get_ref().sync_data()?;
            }
        }

        tracing::debug!("Closed datum file {}", self.path.display());
        Ok(())
    }

    /// Create a cursor positioned at the first record
    pub fn new_cursor(&self) -> Result<DatumFileCursor> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        if !self.mode.can_read() {
            return Err(StoreError::NotReadable(self.mode));
        }
        DatumFileCursor::new(&self.path, self.config.max_entry_size)
    }

    /// Create a transaction appending to this handle's write stream
    pub fn new_transaction(&mut self) -> Result<DatumFileTransaction<'_>> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        if !self.mode.can_write() {
            return Err(StoreError::NotWritable(self.mode));
        }
        let writer = self.writer.as_mut().ok_or(StoreError::Closed)?;
        Ok(DatumFileTransaction::new(writer, &self.config))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for DatumFileDb {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("Failed to close datum file {}: {}", self.path.display(), e);
        }
    }
}
