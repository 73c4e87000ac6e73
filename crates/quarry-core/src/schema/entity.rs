use super::{BelongsTo, Column, HasMany, Relation};
use crate::{stmt, Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// Descriptor of a mapped table: its columns, primary key and relations.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Name relations refer to the entity by
    pub name: String,

    pub table: String,

    /// Name of the connection schema the table lives in
    pub schema: String,

    pub primary_key: String,

    pub columns: IndexMap<String, Column>,

    pub relations: IndexMap<String, Relation>,
}

/// Builds an [`Entity`].
#[derive(Debug)]
pub struct EntityBuilder {
    entity: Entity,
}

impl Entity {
    pub const DEFAULT_SCHEMA: &'static str = "default";

    pub fn builder(name: impl Into<String>) -> EntityBuilder {
        let name = name.into();
        EntityBuilder {
            entity: Entity {
                table: name.clone(),
                name,
                schema: Entity::DEFAULT_SCHEMA.to_string(),
                primary_key: "id".to_string(),
                columns: IndexMap::new(),
                relations: IndexMap::new(),
            },
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Returns the column, or a validation error naming the entity.
    pub fn expect_column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| Error::unknown_column(&self.name, name))
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    /// Columns included in the default projection.
    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values().filter(|column| !column.hidden)
    }

    /// Validates a value assigned to `column`.
    pub fn check(&self, column: &str, value: &stmt::Value) -> Result<()> {
        self.expect_column(column)?.check(value)
    }
}

impl EntityBuilder {
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.entity.table = table.into();
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.entity.schema = schema.into();
        self
    }

    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.entity.primary_key = column.into();
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.entity.columns.insert(column.name.clone(), column);
        self
    }

    /// Declares that this entity holds `foreign_key` pointing at `target`'s
    /// primary key.
    pub fn belongs_to(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.entity.relations.insert(
            name.into(),
            BelongsTo {
                target: target.into(),
                foreign_key: foreign_key.into(),
            }
            .into(),
        );
        self
    }

    /// Declares that `target` rows hold `foreign_key` pointing at this
    /// entity's primary key.
    pub fn has_many(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.entity.relations.insert(
            name.into(),
            HasMany {
                target: target.into(),
                foreign_key: foreign_key.into(),
            }
            .into(),
        );
        self
    }

    pub fn build(self) -> Entity {
        self.entity
    }

    pub fn build_arc(self) -> Arc<Entity> {
        Arc::new(self.entity)
    }
}
