use crate::{FromRow, Row, Error, Result};

use indexmap::IndexMap;
use quarry_core::{
    driver::{Response, Rows},
    stmt::Value,
};
use std::sync::Arc;

/// The outcome of one executed statement.
///
/// Queries carry their rows; mutations carry the affected row count and, for
/// inserts, the id the database assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    columns: Arc<[String]>,
    rows: Vec<Vec<Value>>,
    row_count: u64,
    last_insert_id: Option<i64>,
}

impl ResultSet {
    /// A result set holding rows, as returned by a query.
    pub fn values(columns: Vec<String>, rows: Vec<Vec<Value>>) -> ResultSet {
        ResultSet {
            columns: columns.into(),
            row_count: rows.len() as u64,
            rows,
            last_insert_id: None,
        }
    }

    /// A result set for a mutation that affected `count` rows.
    pub fn count(count: u64) -> ResultSet {
        ResultSet {
            columns: Arc::from(Vec::new()),
            rows: vec![],
            row_count: count,
            last_insert_id: None,
        }
    }

    pub fn with_last_insert_id(mut self, id: i64) -> ResultSet {
        self.last_insert_id = Some(id);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows affected by a mutation, or rows returned by a query.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Id assigned by the insert that produced this result.
    pub fn last_insert_id(&self) -> Result<i64> {
        self.last_insert_id.ok_or_else(|| {
            Error::invalid_state("no insert id is available; the statement was not an insert")
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row, by column name.
    pub fn one(self) -> Option<Row> {
        self.all().into_iter().next()
    }

    /// Every row, by column name.
    pub fn all(self) -> Vec<Row> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|values| Row::new(columns.clone(), values))
            .collect()
    }

    /// First row as positional values.
    pub fn one_values(self) -> Option<Vec<Value>> {
        self.rows.into_iter().next()
    }

    /// Every row as positional values.
    pub fn all_values(self) -> Vec<Vec<Value>> {
        self.rows
    }

    /// First column of the first row, as returned by aggregates.
    pub fn scalar(self) -> Option<Value> {
        self.one_values()
            .and_then(|values| values.into_iter().next())
    }

    pub fn one_as<T: FromRow>(self) -> Result<Option<T>> {
        self.one().map(T::from_row).transpose()
    }

    pub fn all_as<T: FromRow>(self) -> Result<Vec<T>> {
        self.all().into_iter().map(T::from_row).collect()
    }

    /// Every row, keyed by the value of `column`. Later rows replace earlier
    /// rows with the same key.
    pub fn all_indexed_by(self, column: &str) -> Result<IndexMap<Value, Row>> {
        let index = self
            .columns
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| Error::missing_index_column(column))?;

        Ok(self
            .all()
            .into_iter()
            .map(|row| (row.values()[index].clone(), row))
            .collect())
    }
}

impl From<Response> for ResultSet {
    fn from(response: Response) -> ResultSet {
        let ret = match response.rows {
            Rows::Count(count) => ResultSet::count(count),
            Rows::Values { columns, rows } => ResultSet::values(columns, rows),
        };

        ResultSet {
            last_insert_id: response.last_insert_id,
            ..ret
        }
    }
}
