// src/dataset/format.rs

use super::record::Record;

/// Separator between consecutive record blocks.
pub const RECORD_SEP: &str = "\n\n";

/// The `amount` most recent records, newest first.
///
/// Table order is oldest first, so this walks the slice backwards.
/// `amount <= 0` selects nothing and anything past the end selects all.
pub fn latest(records: &[Record], amount: i64) -> Vec<&Record> {
    let take = usize::try_from(amount).unwrap_or(0);
    records.iter().rev().take(take).collect()
}

/// Render the `amount` most recent records as blank-line separated blocks.
pub fn format(records: &[Record], amount: i64) -> String {
    latest(records, amount)
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(RECORD_SEP)
}
