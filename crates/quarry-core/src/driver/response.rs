use crate::stmt::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub rows: Rows,

    /// Row id assigned by the most recent successful insert.
    pub last_insert_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Rows returned by a query
    Values {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
            last_insert_id: None,
        }
    }

    pub fn values(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            rows: Rows::Values { columns, rows },
            last_insert_id: None,
        }
    }

    pub fn with_last_insert_id(mut self, id: Option<i64>) -> Self {
        self.last_insert_id = id;
        self
    }

    /// Rows affected, or rows returned for a query.
    pub fn row_count(&self) -> u64 {
        match &self.rows {
            Rows::Count(count) => *count,
            Rows::Values { rows, .. } => rows.len() as u64,
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values { .. })
    }
}
