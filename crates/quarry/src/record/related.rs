use crate::{Collection, Record};

/// A resolved relation cached on its owning record.
#[derive(Debug, Clone)]
pub enum Related {
    /// Target of a belongs-to relation. `None` when the foreign key is null
    /// or points at a missing row.
    One(Option<Box<Record>>),

    /// Targets of a has-many relation
    Many(Collection),
}

impl Related {
    pub fn as_one(&self) -> Option<&Record> {
        match self {
            Related::One(record) => record.as_deref(),
            Related::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&Collection> {
        match self {
            Related::Many(collection) => Some(collection),
            Related::One(_) => None,
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Related::One(_))
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Related::Many(_))
    }
}
