mod related;
pub use related::Related;

use crate::{relation, Collection, Executor, Query, Result, Row};

use indexmap::IndexMap;
use quarry_core::{
    err,
    schema::{Entity, Relation},
    stmt::{FromValue, Value},
    Error,
};
use std::sync::Arc;

/// Where a record stands relative to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Built in memory, never persisted
    Created,

    /// Loaded from, or written to, the database
    Saved,

    /// Removed; the record can no longer be modified
    Deleted,
}

/// One row of an entity, with change tracking.
///
/// `values` holds exactly the entity's columns. Changes to a saved record
/// keep the persisted value of each changed column until the record is
/// saved, so `save` writes only changed columns and `restore` can undo
/// them. Extra result columns, values written with `set_unsafe` and
/// resolved relations are kept apart from the column values.
#[derive(Debug, Clone)]
pub struct Record {
    entity: Arc<Entity>,
    values: IndexMap<String, Value>,
    alt_values: IndexMap<String, AltValue>,

    /// Persisted value of every column changed since the last save
    saved_values: IndexMap<String, Value>,

    status: Status,
}

#[derive(Debug, Clone)]
enum AltValue {
    Value(Value),
    Related(Related),
}

static NULL: Value = Value::Null;

impl Record {
    /// A new record with every column null.
    pub fn new(entity: &Arc<Entity>) -> Record {
        Record {
            entity: entity.clone(),
            values: entity
                .columns
                .keys()
                .map(|name| (name.clone(), Value::Null))
                .collect(),
            alt_values: IndexMap::new(),
            saved_values: IndexMap::new(),
            status: Status::Created,
        }
    }

    /// A saved record built from a result row. Values are coerced to the
    /// declared column types; columns the entity does not declare are kept
    /// as extra values.
    pub fn init(entity: &Arc<Entity>, row: Row) -> Record {
        Record::from_values(entity, row.into_map())
    }

    /// A saved record holding `values`.
    pub fn from_values<K, V>(entity: &Arc<Entity>, values: impl IntoIterator<Item = (K, V)>) -> Record
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut record = Record::new(entity);
        record.status = Status::Saved;

        for (name, value) in values {
            let name = name.into();
            let value = value.into();

            match entity.column(&name) {
                Some(column) => {
                    record.values.insert(name, column.ty.coerce(value));
                }
                None => {
                    record.alt_values.insert(name, AltValue::Value(value));
                }
            }
        }

        record
    }

    pub fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_new(&self) -> bool {
        self.status == Status::Created
    }

    pub fn is_deleted(&self) -> bool {
        self.status == Status::Deleted
    }

    pub fn primary_key(&self) -> &Value {
        self.values.get(&self.entity.primary_key).unwrap_or(&NULL)
    }

    /// Reads a column or extra value.
    ///
    /// Relations are loaded with [`Record::related`]; naming one here is an
    /// invalid-state error until it has been loaded, and naming anything
    /// else the entity does not have is a missing-property error.
    pub fn get(&self, name: &str) -> Result<&Value> {
        if let Some(value) = self.values.get(name) {
            return Ok(value);
        }

        match self.alt_values.get(name) {
            Some(AltValue::Value(value)) => Ok(value),
            Some(AltValue::Related(_)) => Err(Error::invalid_state(format!(
                "`{}.{name}` is a relation; read it with `related()`",
                self.entity.name
            ))),
            None if self.entity.relation(name).is_some() => Err(Error::invalid_state(format!(
                "relation `{}.{name}` is not loaded; call `related()`",
                self.entity.name
            ))),
            None => Err(Error::missing_property(&self.entity.name, name)),
        }
    }

    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(self.get(name)?.clone())
            .map_err(|err| err.context(err!("`{}.{name}`", self.entity.name)))
    }

    /// Assigns a column after checking its type, requiredness and
    /// constraints. The value is stored as the column's declared type.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> Result<()> {
        self.ensure_mutable()?;

        let value = value.into();
        let decl = self.entity.expect_column(column)?;
        decl.check(&value)?;
        let value = decl.ty.coerce(value);
        self.assign(column, value);
        Ok(())
    }

    /// Assigns without validation. Names the entity does not declare are
    /// stored as extra values and are never persisted.
    pub fn set_unsafe(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.ensure_mutable()?;

        let value = value.into();
        if self.values.contains_key(name) {
            self.assign(name, value);
        } else {
            self.alt_values
                .insert(name.to_string(), AltValue::Value(value));
        }
        Ok(())
    }

    /// Assigns several columns. Stops at the first invalid value; earlier
    /// assignments are kept.
    pub fn fill<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (column, value) in values {
            self.set(column.as_ref(), value)?;
        }
        Ok(())
    }

    fn assign(&mut self, column: &str, value: Value) {
        let Some(current) = self.values.get_mut(column) else {
            return;
        };

        if *current == value {
            return;
        }

        let previous = std::mem::replace(current, value);

        if self.status == Status::Saved {
            match self.saved_values.get(column) {
                Some(persisted) if self.values.get(column) == Some(persisted) => {
                    self.saved_values.shift_remove(column);
                }
                Some(_) => {}
                None => {
                    self.saved_values.insert(column.to_string(), previous);
                }
            }
        }

        self.forget_relations_on(column);
    }

    /// Drops cached relations that depend on `column`.
    fn forget_relations_on(&mut self, column: &str) {
        let is_key = column == self.entity.primary_key;

        let stale = self
            .entity
            .relations
            .iter()
            .filter(|(_, relation)| match relation {
                Relation::BelongsTo(rel) => rel.foreign_key == column,
                Relation::HasMany(_) => is_key,
            })
            .map(|(name, _)| name.clone())
            .collect::<Vec<_>>();

        for name in stale {
            self.alt_values.shift_remove(&name);
        }
    }

    /// Returns `true` if a saved record has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        !self.saved_values.is_empty()
    }

    /// Changed columns with their current values.
    pub fn changed(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.saved_values
            .keys()
            .map(|column| (column.as_str(), self.values.get(column).unwrap_or(&NULL)))
    }

    /// Persisted value of `column`, which differs from the current value
    /// when the column has unsaved changes.
    pub fn original(&self, column: &str) -> Option<&Value> {
        self.saved_values
            .get(column)
            .or_else(|| self.values.get(column))
    }

    /// Reverts unsaved changes.
    pub fn restore(&mut self) -> Result<()> {
        self.ensure_mutable()?;

        if self.status == Status::Created {
            return Err(Error::invalid_state(format!(
                "cannot restore a `{}` record that was never saved",
                self.entity.name
            )));
        }

        for (column, value) in std::mem::take(&mut self.saved_values) {
            self.values.insert(column.clone(), value);
            self.forget_relations_on(&column);
        }
        Ok(())
    }

    /// Column values plus extra values. Relations are not included.
    pub fn to_map(&self) -> IndexMap<String, Value> {
        let mut map = self.values.clone();
        for (name, value) in &self.alt_values {
            if let AltValue::Value(value) = value {
                map.entry(name.clone()).or_insert_with(|| value.clone());
            }
        }
        map
    }

    /// Persists the record: an insert of every column for a new record, an
    /// update of the changed columns for a saved one.
    ///
    /// Returns `false`, without running any SQL, when a saved record has no
    /// changes.
    pub async fn save<E: Executor + ?Sized>(&mut self, exec: &E) -> Result<bool> {
        match self.status {
            Status::Created => {
                self.insert(exec).await?;
                Ok(true)
            }
            Status::Saved => self.update(exec).await,
            Status::Deleted => Err(self.deleted_error()),
        }
    }

    /// Writes the changed columns of a saved record. Fails for a record that
    /// was never saved.
    pub async fn update<E: Executor + ?Sized>(&mut self, exec: &E) -> Result<bool> {
        match self.status {
            Status::Saved => {}
            Status::Created => {
                return Err(Error::invalid_state(format!(
                    "cannot update a `{}` record that was never saved",
                    self.entity.name
                )))
            }
            Status::Deleted => return Err(self.deleted_error()),
        }

        if self.saved_values.is_empty() {
            return Ok(false);
        }

        let assignments = self
            .changed()
            .map(|(column, value)| (column.to_string(), value.clone()))
            .collect::<Vec<_>>();

        Query::entity(&self.entity)
            .eq(self.entity.primary_key.as_str(), self.persisted_key()?)
            .set(assignments)
            .update(exec)
            .await?;

        self.saved_values.clear();
        Ok(true)
    }

    async fn insert<E: Executor + ?Sized>(&mut self, exec: &E) -> Result<()> {
        let pk = &self.entity.primary_key;
        let mut row = IndexMap::new();

        for column in self.entity.columns.values() {
            let value = self.values.get(&column.name).unwrap_or(&NULL);

            if value.is_null() {
                if column.auto || column.name == *pk {
                    continue;
                }
                if column.required {
                    return Err(Error::validation_required(&column.name));
                }
            }

            row.insert(column.name.clone(), value.clone());
        }

        let result = Query::entity(&self.entity).set(row).insert(exec).await?;

        if self.primary_key().is_null() {
            if let Ok(id) = result.last_insert_id() {
                self.values.insert(pk.clone(), Value::I64(id));
            }
        }

        self.status = Status::Saved;
        self.saved_values.clear();
        Ok(())
    }

    /// Deletes the record's row and marks the record deleted. A record that
    /// was never saved is only marked.
    pub async fn remove<E: Executor + ?Sized>(&mut self, exec: &E) -> Result<()> {
        match self.status {
            Status::Deleted => return Err(self.deleted_error()),
            Status::Created => {}
            Status::Saved => {
                Query::entity(&self.entity)
                    .eq(self.entity.primary_key.as_str(), self.persisted_key()?)
                    .delete(exec)
                    .await?;
            }
        }

        self.status = Status::Deleted;
        Ok(())
    }

    /// Resolves the relation `name`, querying on first access and caching
    /// the result on the record.
    pub async fn related<E: Executor + ?Sized>(&mut self, name: &str, exec: &E) -> Result<&Related> {
        if !matches!(self.alt_values.get(name), Some(AltValue::Related(_))) {
            let relation = self.expect_relation(name)?.clone();
            let related = relation::resolve(self, &relation, exec.schema(), exec)
                .await
                .map_err(|err| err.context(err!("loading `{}.{name}`", self.entity.name)))?;
            self.alt_values
                .insert(name.to_string(), AltValue::Related(related));
        }

        self.cached(name)
            .ok_or_else(|| Error::invalid_state(format!("relation `{name}` was not cached")))
    }

    /// Resolves a has-many relation keyed by `column` instead of the target's
    /// primary key. Always queries, and replaces the cached result.
    pub async fn related_indexed_by<E: Executor + ?Sized>(
        &mut self,
        name: &str,
        column: &str,
        exec: &E,
    ) -> Result<&Collection> {
        let relation = self.expect_relation(name)?.clone();
        let related = relation::resolve_indexed_by(self, &relation, exec.schema(), exec, column)
            .await
            .map_err(|err| err.context(err!("loading `{}.{name}`", self.entity.name)))?;
        self.alt_values
            .insert(name.to_string(), AltValue::Related(related));

        self.cached(name)
            .and_then(Related::as_many)
            .ok_or_else(|| Error::invalid_state(format!("relation `{name}` was not cached")))
    }

    /// The cached result of relation `name`, if it has been loaded.
    pub fn cached(&self, name: &str) -> Option<&Related> {
        match self.alt_values.get(name) {
            Some(AltValue::Related(related)) => Some(related),
            _ => None,
        }
    }

    fn expect_relation(&self, name: &str) -> Result<&Relation> {
        self.entity
            .relation(name)
            .ok_or_else(|| Error::missing_property(&self.entity.name, name))
    }

    /// Primary key as last persisted.
    fn persisted_key(&self) -> Result<Value> {
        let pk = &self.entity.primary_key;
        let key = self
            .saved_values
            .get(pk)
            .unwrap_or_else(|| self.primary_key());

        if key.is_null() {
            return Err(Error::invalid_state(format!(
                "`{}` record has no value for primary key `{pk}`",
                self.entity.name
            )));
        }

        Ok(key.clone())
    }

    fn ensure_mutable(&self) -> Result<()> {
        match self.status {
            Status::Deleted => Err(self.deleted_error()),
            _ => Ok(()),
        }
    }

    fn deleted_error(&self) -> Error {
        Error::invalid_state(format!(
            "cannot modify a deleted `{}` record",
            self.entity.name
        ))
    }
}
