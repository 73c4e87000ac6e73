mod belongs_to;
pub use belongs_to::BelongsTo;

mod has_many;
pub use has_many::HasMany;

/// Declarative relation metadata. Relations are resolved lazily by the
/// record mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    BelongsTo(BelongsTo),
    HasMany(HasMany),
}

impl Relation {
    /// Name of the target entity.
    pub fn target(&self) -> &str {
        match self {
            Relation::BelongsTo(rel) => &rel.target,
            Relation::HasMany(rel) => &rel.target,
        }
    }

    pub fn foreign_key(&self) -> &str {
        match self {
            Relation::BelongsTo(rel) => &rel.foreign_key,
            Relation::HasMany(rel) => &rel.foreign_key,
        }
    }

    pub fn is_belongs_to(&self) -> bool {
        matches!(self, Relation::BelongsTo(_))
    }

    pub fn is_has_many(&self) -> bool {
        matches!(self, Relation::HasMany(_))
    }
}
