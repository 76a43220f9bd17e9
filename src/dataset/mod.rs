// src/dataset/mod.rs

pub mod context;
pub mod format;
pub mod record;
pub mod row;

pub use context::TableContext;
pub use format::{format, latest};
pub use record::Record;
pub use row::{parse_row, Column, RawRow};

use std::{fmt, str::FromStr};
use tracing::{trace, warn};

use crate::error::DataSetError;

/// Where the presidents table comes from. Provenance only; fetching is
/// configured separately.
pub const SOURCE: &str = "https://en.wikipedia.org/wiki/List_of_presidents_of_the_United_States";

/// What to do with rows too short to supply both `id` and `name`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowPolicy {
    /// Keep the row as a record with absent fields.
    #[default]
    Permissive,
    /// Fail on the first malformed row.
    Strict,
    /// Drop malformed rows.
    Skip,
}

impl FromStr for RowPolicy {
    type Err = DataSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            "skip" => Ok(Self::Skip),
            _ => Err(DataSetError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for RowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Permissive => "permissive",
            Self::Strict => "strict",
            Self::Skip => "skip",
        })
    }
}

/// Parse every row in order, keeping malformed rows as partial records.
pub fn parsed_rows(rows: &[RawRow]) -> Vec<Record> {
    rows.iter().map(RawRow::parse).collect()
}

/// Parse every row in order, handling short rows according to `policy`.
pub fn parsed_rows_with(rows: &[RawRow], policy: RowPolicy) -> Result<Vec<Record>, DataSetError> {
    let mut out = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if row.is_malformed() {
            match policy {
                RowPolicy::Permissive => {
                    trace!(index, width = row.width(), "keeping partial row");
                }
                RowPolicy::Strict => {
                    return Err(DataSetError::MalformedRow {
                        index,
                        width: row.width(),
                    });
                }
                RowPolicy::Skip => {
                    warn!(index, width = row.width(), "skipping malformed row");
                    continue;
                }
            }
        }
        out.push(row.parse());
    }
    Ok(out)
}
