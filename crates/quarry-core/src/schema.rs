mod column;
pub use column::Column;

mod constraint;
pub use constraint::{Constraint, ConstraintLength, ConstraintOptions, ConstraintRange};

mod entity;
pub use entity::{Entity, EntityBuilder};

mod ident;
pub use ident::check_ident;

mod relation;
pub use relation::{BelongsTo, HasMany, Relation};

use crate::{Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// Registry of entity descriptors, keyed by entity name.
///
/// Relations name their target entity; the registry resolves those names.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    pub entities: IndexMap<String, Arc<Entity>>,
}

impl Schema {
    pub fn new() -> Schema {
        Schema::default()
    }

    /// Adds an entity, replacing any entity registered under the same name.
    pub fn register(&mut self, entity: impl Into<Arc<Entity>>) -> Arc<Entity> {
        let entity = entity.into();
        self.entities.insert(entity.name.clone(), entity.clone());
        entity
    }

    pub fn entity(&self, name: &str) -> Result<&Arc<Entity>> {
        self.entities
            .get(name)
            .ok_or_else(|| err!("entity `{name}` is not registered"))
    }

    pub fn entities(&self) -> impl Iterator<Item = &Arc<Entity>> {
        self.entities.values()
    }

    /// Checks that every relation targets a registered entity and that the
    /// foreign key column exists on the side that holds it.
    pub fn verify(&self) -> Result<()> {
        for entity in self.entities.values() {
            for (name, relation) in &entity.relations {
                let target = self.entity(relation.target()).map_err(|err| {
                    err.context(err!("relation `{}.{name}`", entity.name))
                })?;

                let (holder, fk) = match relation {
                    Relation::BelongsTo(rel) => (entity, &rel.foreign_key),
                    Relation::HasMany(rel) => (target, &rel.foreign_key),
                };

                if !holder.columns.is_empty() && !holder.has_column(fk) {
                    return Err(Error::unknown_column(&holder.name, fk)
                        .context(err!("relation `{}.{name}`", entity.name)));
                }
            }
        }

        Ok(())
    }
}
