// src/dataset/record.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The `{id, name}` projection kept from one table row.
///
/// A field is `None` when the row did not supply a link text at that
/// position. Absent fields are left out of JSON output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Record {
    /// A record with both fields present.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }

    /// Field name/value pairs in output order.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 2] {
        [("id", self.id.as_deref()), ("name", self.name.as_deref())]
    }

    pub fn is_complete(&self) -> bool {
        self.id.is_some() && self.name.is_some()
    }
}

/// One `"<field> <value>"` line per field, newline separated. An absent
/// value renders as empty, leaving the trailing space after the field name.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.fields().into_iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{} {}", key, value.unwrap_or_default())?;
        }
        Ok(())
    }
}
