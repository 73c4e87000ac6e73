use super::Relation;

/// Target rows hold `foreign_key`, referencing the owning entity's primary
/// key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasMany {
    /// Entity the relation points at
    pub target: String,

    /// Column on the target entity
    pub foreign_key: String,
}

impl From<HasMany> for Relation {
    fn from(value: HasMany) -> Self {
        Relation::HasMany(value)
    }
}
