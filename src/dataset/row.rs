// src/dataset/row.rs

use super::record::Record;

/// Positional meaning of the link texts found in one presidents-table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Icon,
    Name,
    Footnote,
    Source,
    Party,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Id,
        Column::Icon,
        Column::Name,
        Column::Footnote,
        Column::Source,
        Column::Party,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Fewest link texts a row needs for every retained field to be present.
pub const MIN_WIDTH: usize = Column::Name as usize + 1;

/// Link texts of one `<tr>`, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    tokens: Vec<String>,
}

impl RawRow {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn width(&self) -> usize {
        self.tokens.len()
    }

    pub fn get(&self, column: Column) -> Option<&str> {
        self.tokens.get(column.index()).map(String::as_str)
    }

    /// True when `id` or `name` would be missing from the parsed record.
    pub fn is_malformed(&self) -> bool {
        self.width() < MIN_WIDTH
    }

    /// Project the row onto a [`Record`]. Missing positions stay absent.
    pub fn parse(&self) -> Record {
        Record {
            id: self.get(Column::Id).map(str::to_owned),
            name: self.get(Column::Name).map(str::to_owned),
        }
    }
}

impl From<Vec<String>> for RawRow {
    fn from(tokens: Vec<String>) -> Self {
        Self::new(tokens)
    }
}

impl<S: Into<String>> FromIterator<S> for RawRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Parse a bare token slice, e.g. link texts gathered elsewhere.
pub fn parse_row<S: AsRef<str>>(row: &[S]) -> Record {
    let at = |column: Column| row.get(column.index()).map(|s| s.as_ref().to_owned());
    Record {
        id: at(Column::Id),
        name: at(Column::Name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biden() -> RawRow {
        ["46", "icon", "Joe Biden", "note", "src", "party"]
            .into_iter()
            .collect()
    }

    #[test]
    fn keeps_id_and_name_only() {
        let row = biden();
        assert_eq!(row.width(), Column::ALL.len());
        assert_eq!(row.parse(), Record::new("46", "Joe Biden"));
        assert_eq!(row.get(Column::Party), Some("party"));
        assert_eq!(row.get(Column::Icon), Some("icon"));
    }

    #[test]
    fn parsing_twice_is_stable() {
        let row = biden();
        let first = row.parse();
        let second = row.parse();
        assert_eq!(first, second);
        assert_eq!(row, biden());
    }

    #[test]
    fn short_rows_leave_fields_absent() {
        let two: RawRow = ["12", "icon"].into_iter().collect();
        assert!(two.is_malformed());
        assert_eq!(
            two.parse(),
            Record {
                id: Some("12".into()),
                name: None
            }
        );

        let empty = RawRow::default();
        assert!(empty.is_malformed());
        assert_eq!(empty.parse(), Record::default());
    }

    #[test]
    fn three_tokens_is_enough() {
        let row: RawRow = ["1", "", "George Washington"].into_iter().collect();
        assert!(!row.is_malformed());
        assert!(row.parse().is_complete());
    }

    #[test]
    fn parse_row_matches_raw_row() {
        let tokens = ["46", "icon", "Joe Biden", "note", "src", "party"];
        assert_eq!(parse_row(&tokens), biden().parse());
        assert_eq!(parse_row::<&str>(&[]), Record::default());
    }
}
