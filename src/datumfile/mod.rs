//! Datum File Module
//!
//! Flat, append-only record file. No header, footer, checksum or index: the
//! file is self-delimiting through per-record length prefixes only.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Record 1                                                │
//! │   [KeyLen: u32 LE][Key][ValLen: u32 LE][Value]          │
//! ├─────────────────────────────────────────────────────────┤
//! │ Record 2                                                │
//! │   ... repeated until end of file ...                    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! A record's encoded size is `8 + KeyLen + ValLen`. Readers reject any
//! record whose encoded size exceeds `Config::max_entry_size` (100 MiB by
//! default) before allocating for it, and treat that, like a truncated tail,
//! as the end of the data.

mod cursor;
mod db;
mod transaction;

use bytes::{BufMut, BytesMut};

use crate::error::{Result, StoreError};

pub use cursor::DatumFileCursor;
pub use db::DatumFileDb;
pub use transaction::DatumFileTransaction;

// =============================================================================
// Shared Constants (used by cursor and transaction)
// =============================================================================

/// Size of one length prefix
pub(crate) const LEN_PREFIX_SIZE: usize = 4;

/// Framing bytes per record: key length (4) + value length (4)
pub const FRAME_OVERHEAD: u64 = 2 * LEN_PREFIX_SIZE as u64;

/// Encoded size of a record with the given field lengths
pub fn encoded_len(key_len: usize, value_len: usize) -> u64 {
    FRAME_OVERHEAD + key_len as u64 + value_len as u64
}

/// Append one framed record to `buf`
pub(crate) fn encode_record(buf: &mut BytesMut, key: &[u8], value: &[u8]) -> Result<()> {
    let key_len = prefix_for(key)?;
    let value_len = prefix_for(value)?;

    buf.reserve(encoded_len(key.len(), value.len()) as usize);
    buf.put_u32_le(key_len);
    buf.put_slice(key);
    buf.put_u32_le(value_len);
    buf.put_slice(value);
    Ok(())
}

fn prefix_for(field: &[u8]) -> Result<u32> {
    u32::try_from(field.len()).map_err(|_| StoreError::EntryTooLarge { len: field.len() })
}
