use super::Relation;

/// The owning entity holds `foreign_key`, referencing the target's primary
/// key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BelongsTo {
    /// Entity the relation points at
    pub target: String,

    /// Column on the owning entity
    pub foreign_key: String,
}

impl From<BelongsTo> for Relation {
    fn from(value: BelongsTo) -> Self {
        Relation::BelongsTo(value)
    }
}
