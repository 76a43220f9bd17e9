// src/error.rs

use thiserror::Error;

use crate::dataset::row::MIN_WIDTH;

/// Failures raised while reading rows out of a table context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataSetError {
    /// The document has no `<tbody>` to read rows from.
    #[error("no data source: document contains no <tbody>")]
    NoDataSource,

    /// A row supplied too few link texts under the strict policy.
    #[error("malformed row {index}: {width} link text(s), need at least {min}", min = MIN_WIDTH)]
    MalformedRow { index: usize, width: usize },

    #[error("unknown row policy `{0}` (expected permissive, strict or skip)")]
    UnknownPolicy(String),
}
