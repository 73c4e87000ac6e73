//! Resolution of declared relations.
//!
//! Resolution only reads the owning record and issues queries through the
//! given executor; caching the result is up to the caller
//! ([`Record::related`]).

use crate::{Collection, Executor, Query, Record, Related, Result};

use quarry_core::{
    schema::{BelongsTo, HasMany, Relation},
    Schema,
};

/// Loads the target of `relation` for `record`. Has-many targets are keyed
/// by their primary key.
pub async fn resolve<E: Executor + ?Sized>(
    record: &Record,
    relation: &Relation,
    schema: &Schema,
    exec: &E,
) -> Result<Related> {
    match relation {
        Relation::BelongsTo(rel) => belongs_to(record, rel, schema, exec).await,
        Relation::HasMany(rel) => has_many(record, rel, schema, exec, None).await,
    }
}

/// Like [`resolve`], keying has-many targets by `column`. Belongs-to
/// relations ignore the index.
pub async fn resolve_indexed_by<E: Executor + ?Sized>(
    record: &Record,
    relation: &Relation,
    schema: &Schema,
    exec: &E,
    column: &str,
) -> Result<Related> {
    match relation {
        Relation::BelongsTo(rel) => belongs_to(record, rel, schema, exec).await,
        Relation::HasMany(rel) => has_many(record, rel, schema, exec, Some(column)).await,
    }
}

async fn belongs_to<E: Executor + ?Sized>(
    record: &Record,
    rel: &BelongsTo,
    schema: &Schema,
    exec: &E,
) -> Result<Related> {
    let key = record.get(&rel.foreign_key)?;

    // A null foreign key cannot match anything
    if key.is_null() {
        return Ok(Related::One(None));
    }

    let target = schema.entity(&rel.target)?;
    let found = Query::entity(target)
        .eq(target.primary_key.as_str(), key.clone())
        .one(exec)
        .await?;

    Ok(Related::One(found.map(Box::new)))
}

async fn has_many<E: Executor + ?Sized>(
    record: &Record,
    rel: &HasMany,
    schema: &Schema,
    exec: &E,
    index: Option<&str>,
) -> Result<Related> {
    let key = record.primary_key();

    // Nothing can reference a record that has no key yet
    if key.is_null() {
        return Ok(Related::Many(Collection::new()));
    }

    let target = schema.entity(&rel.target)?;
    let mut query = Query::entity(target).eq(rel.foreign_key.as_str(), key.clone());

    if let Some(column) = index {
        query = query.index_by(column);
    }

    Ok(Related::Many(query.all(exec).await?))
}
