use crate::{Error, Record, Result};

use indexmap::IndexMap;
use quarry_core::stmt::Value;
use std::collections::HashSet;

/// An ordered set of records keyed by an index column, with a visibility
/// mask.
///
/// Filtering hides records instead of removing them; [`Collection::reset`]
/// makes everything visible again. Lookups by key see hidden records,
/// iteration and counting do not.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    records: IndexMap<Value, Record>,
    hidden: HashSet<Value>,
}

impl Collection {
    pub fn new() -> Collection {
        Collection::default()
    }

    /// Builds a collection keyed by `index`. Every record must have a
    /// non-null value for the index column.
    pub fn from_records(records: impl IntoIterator<Item = Record>, index: &str) -> Result<Collection> {
        let mut ret = Collection::new();

        for record in records {
            let key = match record.get(index) {
                Ok(value) if !value.is_null() => value.clone(),
                _ => {
                    return Err(Error::invalid_result(format!(
                        "`{}` row has no value for index column `{index}`",
                        record.entity().name
                    )))
                }
            };
            ret.insert(key, record);
        }

        Ok(ret)
    }

    /// Adds a record, replacing any record stored under the same key. The
    /// record is visible.
    pub fn insert(&mut self, key: impl Into<Value>, record: Record) -> Option<Record> {
        let key = key.into();
        self.hidden.remove(&key);
        self.records.insert(key, record)
    }

    pub fn get(&self, key: &Value) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Record> {
        self.records.get_mut(key)
    }

    pub fn contains(&self, key: &Value) -> bool {
        self.records.contains_key(key)
    }

    pub fn is_visible(&self, key: &Value) -> bool {
        self.contains(key) && !self.hidden.contains(key)
    }

    /// Visible records in order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Record)> {
        self.records
            .iter()
            .filter(|(key, _)| !self.hidden.contains(*key))
    }

    /// All records, hidden ones included.
    pub fn iter_all(&self) -> impl Iterator<Item = (&Value, &Record)> {
        self.records.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.iter().map(|(key, _)| key)
    }

    /// Number of visible records.
    pub fn count(&self) -> usize {
        self.records.len() - self.hidden.len()
    }

    /// Number of records, hidden ones included.
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Hides every visible record for which `predicate` returns `false`.
    pub fn filter(&mut self, predicate: impl Fn(&Record) -> bool) -> &mut Self {
        for (key, record) in &self.records {
            if !predicate(record) {
                self.hidden.insert(key.clone());
            }
        }
        self
    }

    /// Hides the record under `key`. Returns `false` if there is none.
    pub fn hide(&mut self, key: &Value) -> bool {
        if !self.records.contains_key(key) {
            return false;
        }
        self.hidden.insert(key.clone());
        true
    }

    /// Shows the record under `key`. Returns `false` if there is none.
    pub fn show(&mut self, key: &Value) -> bool {
        if !self.records.contains_key(key) {
            return false;
        }
        self.hidden.remove(key);
        true
    }

    /// Makes every record visible.
    pub fn reset(&mut self) -> &mut Self {
        self.hidden.clear();
        self
    }

    /// The value of `column` for every visible record. Records without the
    /// column contribute `Null`.
    pub fn pluck(&self, column: &str) -> Vec<Value> {
        self.iter()
            .map(|(_, record)| record.get(column).cloned().unwrap_or_default())
            .collect()
    }

    /// First visible record.
    pub fn first(&self) -> Option<&Record> {
        self.iter().map(|(_, record)| record).next()
    }

    /// Visible records in order.
    pub fn into_records(self) -> Vec<Record> {
        let hidden = self.hidden;
        self.records
            .into_iter()
            .filter(|(key, _)| !hidden.contains(key))
            .map(|(_, record)| record)
            .collect()
    }
}
