//! Conversion Driver
//!
//! Drains one store's cursor into another store's transaction using only
//! the capability traits, so either side may be any backend.

use crate::db::{Cursor, StopReason, Transaction};
use crate::error::Result;

/// Outcome of a conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Records copied
    pub records: u64,
    /// Key and value bytes copied (framing excluded)
    pub bytes: u64,
    /// Why the source cursor stopped
    pub stop_reason: Option<StopReason>,
}

impl ConvertSummary {
    /// True if the source was read to a clean end
    pub fn is_complete(&self) -> bool {
        self.stop_reason.map_or(true, StopReason::is_clean)
    }
}

/// Copy every record the cursor yields into the transaction, then commit once
///
/// The cursor is consumed from its current position; a freshly created
/// cursor is already at the first record.
pub fn convert<C, T>(cursor: &mut C, txn: &mut T) -> Result<ConvertSummary>
where
    C: Cursor + ?Sized,
    T: Transaction + ?Sized,
{
    let mut records = 0u64;
    let mut bytes = 0u64;

    while let Some((key, value)) = cursor.current() {
        txn.put(key, value)?;
        records += 1;
        bytes += (key.len() + value.len()) as u64;
        cursor.next()?;
    }
    txn.commit()?;

    let summary = ConvertSummary {
        records,
        bytes,
        stop_reason: cursor.stop_reason(),
    };
    tracing::debug!("Converted {} records ({} bytes)", summary.records, summary.bytes);
    Ok(summary)
}
