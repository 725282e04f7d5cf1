//! Datum File Transaction
//!
//! Appends framed records to the store's buffered writer.

use std::fs::File;
use std::io::{BufWriter, Write};

use bytes::BytesMut;

use crate::config::Config;
use crate::db::Transaction;
use crate::error::Result;

use super::{encode_record, encoded_len};

/// Write accumulator over a datum file
///
/// Borrows the store's write stream, so it cannot outlive the store.
/// Several transactions on one store append to the same file; there is no
/// isolation between them and no rollback.
pub struct DatumFileTransaction<'a> {
    writer: &'a mut BufWriter<File>,
    /// Reused frame buffer
    frame: BytesMut,
    /// Read-side bound, only used to warn about unreadable records
    max_entry_size: u64,
    sync_on_commit: bool,
    /// Records put since the last commit
    pending: u64,
}

impl<'a> DatumFileTransaction<'a> {
    pub(super) fn new(writer: &'a mut BufWriter<File>, config: &Config) -> Self {
        Self {
            writer,
            frame: BytesMut::new(),
            max_entry_size: config.max_entry_size,
            sync_on_commit: config.sync_on_commit,
            pending: 0,
        }
    }

    /// Number of records put since the last commit
    pub fn pending(&self) -> u64 {
        self.pending
    }
}

impl Transaction for DatumFileTransaction<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let size = encoded_len(key.len(), value.len());
        if size > self.max_entry_size {
            // Accepted anyway; readers will stop at this record
            tracing::warn!(
                "Writing {} byte record over the {} byte read bound",
                size,
                self.max_entry_size
            );
        }

        self.frame.clear();
        encode_record(&mut self.frame, key, value)?;
        self.writer.write_all(&self.frame)?;

        self.pending += 1;
        tracing::trace!("Put record ({} byte key, {} byte value)", key.len(), value.len());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.writer.flush()?;
        if self.sync_on_commit {
            self.writer.get_ref().sync_data()?;
        }

        tracing::debug!("Committed {} records", self.pending);
        self.pending = 0;
        Ok(())
    }
}
