use super::{ColumnRef, Filter, Join, OrderBy, Pagination, Projection, TableRef};

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub source: TableRef,
    pub projection: Projection,
    pub joins: Vec<Join>,
    pub filter: Filter,
    pub group_by: Vec<ColumnRef>,
    pub having: Filter,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub pagination: Option<Pagination>,
}

impl Select {
    pub fn new(source: TableRef) -> Select {
        Select {
            source,
            projection: Projection::All,
            joins: vec![],
            filter: Filter::new(),
            group_by: vec![],
            having: Filter::new(),
            order_by: vec![],
            limit: None,
            offset: None,
            pagination: None,
        }
    }

    /// Rewrites the select into its `COUNT(1)` form. Ordering and paging do
    /// not change a count and are dropped.
    pub fn into_count(mut self) -> Select {
        self.projection = Projection::Count;
        self.order_by.clear();
        self.limit = None;
        self.offset = None;
        self.pagination = None;
        self
    }

    /// Rewrites the select into an existence probe: `SELECT 1 ... LIMIT 1`.
    pub fn into_exists(mut self) -> Select {
        self.projection = Projection::One;
        self.order_by.clear();
        self.pagination = None;
        self.offset = None;
        self.limit = Some(1);
        self
    }
}
