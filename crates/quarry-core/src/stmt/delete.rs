use super::{Filter, TableRef};

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub source: TableRef,
    pub filter: Filter,
    pub limit: Option<u64>,
    pub offset: Option<u64>,

    /// Permit compiling with an empty filter, deleting every row.
    pub allow_unconditional: bool,
}

impl Delete {
    pub fn new(source: TableRef) -> Delete {
        Delete {
            source,
            filter: Filter::new(),
            limit: None,
            offset: None,
            allow_unconditional: false,
        }
    }
}
