use crate::{Error, Result};

use indexmap::IndexMap;
use quarry_core::{
    err,
    stmt::{FromValue, Value},
};
use std::sync::Arc;

/// One row of a result set. Values can be read by column name or position.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

/// Builds a value from a result row.
pub trait FromRow: Sized {
    fn from_row(row: Row) -> Result<Self>;
}

impl Row {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<Value>) -> Row {
        Row { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Value of `column`, if the row has it.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.position(column).map(|index| &self.values[index])
    }

    /// Reads `column` and converts it to `T`.
    pub fn get_as<T: FromValue>(&self, column: &str) -> Result<T> {
        let value = self.get(column).ok_or_else(|| {
            Error::invalid_result(format!("column `{column}` is not part of the row"))
        })?;
        T::from_value(value.clone()).map_err(|err| err.context(err!("column `{column}`")))
    }

    /// Value at a zero-based column position.
    pub fn index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn into_map(self) -> IndexMap<String, Value> {
        self.columns.iter().cloned().zip(self.values).collect()
    }
}

impl FromRow for Row {
    fn from_row(row: Row) -> Result<Self> {
        Ok(row)
    }
}

impl FromRow for IndexMap<String, Value> {
    fn from_row(row: Row) -> Result<Self> {
        Ok(row.into_map())
    }
}

impl FromRow for Vec<Value> {
    fn from_row(row: Row) -> Result<Self> {
        Ok(row.into_values())
    }
}

macro_rules! impl_from_row_for_tuple {
    ( $len:literal; $( $name:ident ),+ ) => {
        impl<$( $name: FromValue ),+> FromRow for ( $( $name, )+ ) {
            fn from_row(row: Row) -> Result<Self> {
                if row.len() < $len {
                    return Err(Error::invalid_result(format!(
                        "expected {} columns, found {}",
                        $len,
                        row.len()
                    )));
                }

                let mut values = row.into_values().into_iter();
                Ok(( $( $name::from_value(values.next().unwrap_or_default())?, )+ ))
            }
        }
    };
}

impl_from_row_for_tuple!(1; A);
impl_from_row_for_tuple!(2; A, B);
impl_from_row_for_tuple!(3; A, B, C);
impl_from_row_for_tuple!(4; A, B, C, D);
impl_from_row_for_tuple!(5; A, B, C, D, E);
impl_from_row_for_tuple!(6; A, B, C, D, E, F);
