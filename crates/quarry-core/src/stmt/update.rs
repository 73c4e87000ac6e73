use super::{Filter, TableRef, Value};

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub source: TableRef,
    pub assignments: IndexMap<String, Value>,
    pub filter: Filter,
    pub limit: Option<u64>,
    pub offset: Option<u64>,

    /// Permit compiling with an empty filter, touching every row.
    pub allow_unconditional: bool,
}

impl Update {
    pub fn new(source: TableRef) -> Update {
        Update {
            source,
            assignments: IndexMap::new(),
            filter: Filter::new(),
            limit: None,
            offset: None,
            allow_unconditional: false,
        }
    }
}
