use crate::stmt::Value;

use indexmap::IndexMap;

/// A compiled statement ready for dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySql {
    pub sql: String,

    /// Placeholder name (without the leading `:`) to bound value, in the
    /// order the placeholders appear in `sql`.
    pub params: IndexMap<String, Value>,

    /// The statement returns rows.
    pub returns_rows: bool,
}

impl QuerySql {
    pub fn new(sql: impl Into<String>) -> QuerySql {
        QuerySql {
            sql: sql.into(),
            params: IndexMap::new(),
            returns_rows: false,
        }
    }

    pub fn with_params(mut self, params: IndexMap<String, Value>) -> QuerySql {
        self.params = params;
        self
    }

    /// Looks up a bound value by placeholder, with or without the `:`.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name.trim_start_matches(':'))
    }
}
