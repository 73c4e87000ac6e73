use super::Value;

use indexmap::IndexMap;

/// `INSERT INTO table (cols) VALUES (...), (...)`.
///
/// Every row must name the same columns as the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub rows: Vec<IndexMap<String, Value>>,
}

impl Insert {
    pub fn new(table: impl Into<String>) -> Insert {
        Insert {
            table: table.into(),
            rows: vec![],
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.rows
            .first()
            .into_iter()
            .flat_map(|row| row.keys().map(String::as_str))
    }
}
