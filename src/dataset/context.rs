// src/dataset/context.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, trace};

use super::{format, parsed_rows_with, RawRow, Record, RowPolicy};
use crate::error::DataSetError;

static TBODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tbody").expect("CSS selector for tbody should be valid"));
static TR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("CSS selector for tr should be valid"));
static A: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("CSS selector for a should be valid"));

/// A parsed page holding the presidents table. The caller owns it and
/// decides how the HTML was obtained.
pub struct TableContext {
    document: Html,
}

impl TableContext {
    pub fn parse(html: &str) -> Self {
        Self::from_document(Html::parse_document(html))
    }

    pub fn from_document(document: Html) -> Self {
        Self { document }
    }

    /// Link texts of every `<tr>` under the first `<tbody>`.
    #[instrument(level = "debug", skip(self))]
    pub fn rows(&self) -> Result<Vec<RawRow>, DataSetError> {
        let body = self
            .document
            .select(&TBODY)
            .next()
            .ok_or(DataSetError::NoDataSource)?;

        let rows: Vec<RawRow> = body.select(&TR).map(link_texts).collect();
        debug!(rows = rows.len(), "read table rows");
        Ok(rows)
    }

    /// All rows as records, partial rows included.
    pub fn parsed(&self) -> Result<Vec<Record>, DataSetError> {
        self.parsed_with(RowPolicy::Permissive)
    }

    pub fn parsed_with(&self, policy: RowPolicy) -> Result<Vec<Record>, DataSetError> {
        parsed_rows_with(&self.rows()?, policy)
    }

    /// The `amount` most recent presidents as a text block.
    pub fn render(&self, amount: i64) -> Result<String, DataSetError> {
        Ok(format(&self.parsed()?, amount))
    }
}

fn link_texts(tr: ElementRef<'_>) -> RawRow {
    let row: RawRow = tr.select(&A).map(|a| a.text().collect::<String>()).collect();
    trace!(width = row.width(), "row");
    row
}
