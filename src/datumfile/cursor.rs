//! Datum File Cursor
//!
//! Sequential decoding of records from the start of the file.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::db::{Cursor, StopReason};
use crate::error::Result;

use super::{FRAME_OVERHEAD, LEN_PREFIX_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Uninitialized,
    Positioned,
    Exhausted(StopReason),
}

/// Forward-only reader over a datum file
///
/// Owns an independent read stream, opened by `seek_to_first()` and closed
/// when the cursor is exhausted or dropped. Records appended after the
/// stream was opened are only seen after another `seek_to_first()`.
pub struct DatumFileCursor {
    path: PathBuf,
    reader: Option<BufReader<File>>,
    /// Records whose encoded size exceeds this are treated as end of data
    max_entry_size: u64,
    state: CursorState,
    key: Vec<u8>,
    value: Vec<u8>,
    /// Offset of the next undecoded byte
    offset: u64,
    /// Records decoded since the last seek
    records_read: u64,
}

impl DatumFileCursor {
    /// Open a cursor and position it at the first record
    pub fn new(path: &Path, max_entry_size: u64) -> Result<Self> {
        let mut cursor = Self {
            path: path.to_path_buf(),
            reader: None,
            max_entry_size,
            state: CursorState::Uninitialized,
            key: Vec::new(),
            value: Vec::new(),
            offset: 0,
            records_read: 0,
        };
        cursor.seek_to_first()?;
        Ok(cursor)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset just past the current record
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Decode the record at the current offset and update the state
    fn advance(&mut self) {
        let start = self.offset;
        let outcome = match self.reader.as_mut() {
            Some(reader) => read_record(
                reader,
                start,
                self.max_entry_size,
                &mut self.key,
                &mut self.value,
            ),
            None => Err(StopReason::Io { offset: start }),
        };

        match outcome {
            Ok(size) => {
                self.offset += size;
                self.records_read += 1;
                self.state = CursorState::Positioned;
                tracing::trace!("Decoded {} byte record at offset {}", size, start);
            }
            Err(reason) => {
                // Release the stream; only seek_to_first() leaves this state
                self.reader = None;
                self.key.clear();
                self.value.clear();
                self.state = CursorState::Exhausted(reason);

                if reason.is_clean() {
                    tracing::debug!(
                        "Reached end of {} after {} records",
                        self.path.display(),
                        self.records_read
                    );
                } else {
                    tracing::warn!(
                        "Stopped reading {} after {} records: {}",
                        self.path.display(),
                        self.records_read,
                        reason
                    );
                }
            }
        }
    }
}

impl Cursor for DatumFileCursor {
    fn seek_to_first(&mut self) -> Result<()> {
        // Drop any previous stream before reopening
        self.reader = None;
        self.offset = 0;
        self.records_read = 0;
        self.state = CursorState::Uninitialized;

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                self.state = CursorState::Exhausted(StopReason::Io { offset: 0 });
                return Err(e.into());
            }
        };
        self.reader = Some(BufReader::new(file));

        self.advance();
        Ok(())
    }

    fn next(&mut self) -> Result<()> {
        if self.state == CursorState::Positioned {
            self.advance();
        }
        Ok(())
    }

    fn valid(&self) -> bool {
        self.state == CursorState::Positioned
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        match self.state {
            CursorState::Positioned => Some((self.key.as_slice(), self.value.as_slice())),
            _ => None,
        }
    }

    fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            CursorState::Exhausted(reason) => Some(reason),
            _ => None,
        }
    }
}

// =============================================================================
// Record Decoding
// =============================================================================

/// Read one record starting at `offset` into `key`/`value`
///
/// Returns the record's encoded size, or why no record could be read.
fn read_record<R: Read>(
    reader: &mut R,
    offset: u64,
    max_entry_size: u64,
    key: &mut Vec<u8>,
    value: &mut Vec<u8>,
) -> std::result::Result<u64, StopReason> {
    let io_stop = |e: io::Error| {
        tracing::warn!("Read error at offset {}: {}", offset, e);
        StopReason::Io { offset }
    };

    // Key length: zero bytes here is the only clean end of data
    let mut prefix = [0u8; LEN_PREFIX_SIZE];
    match fill(reader, &mut prefix).map_err(io_stop)? {
        0 => return Err(StopReason::EndOfData),
        n if n < LEN_PREFIX_SIZE => return Err(StopReason::Truncated { offset }),
        _ => {}
    }
    let key_len = u32::from_le_bytes(prefix) as u64;

    // Check what is known so far before allocating for the key
    let known_size = FRAME_OVERHEAD + key_len;
    if known_size > max_entry_size {
        return Err(StopReason::OversizedEntry {
            offset,
            size: known_size,
        });
    }

    key.resize(key_len as usize, 0);
    if fill(reader, key).map_err(io_stop)? < key.len() {
        return Err(StopReason::Truncated { offset });
    }

    if fill(reader, &mut prefix).map_err(io_stop)? < LEN_PREFIX_SIZE {
        return Err(StopReason::Truncated { offset });
    }
    let value_len = u32::from_le_bytes(prefix) as u64;

    let size = known_size + value_len;
    if size > max_entry_size {
        return Err(StopReason::OversizedEntry { offset, size });
    }

    value.resize(value_len as usize, 0);
    if fill(reader, value).map_err(io_stop)? < value.len() {
        return Err(StopReason::Truncated { offset });
    }

    Ok(size)
}

/// Read until `buf` is full or the stream ends; returns the bytes read
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
