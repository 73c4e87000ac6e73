use super::ColumnRef;

/// What a select returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Projection {
    /// `*`
    #[default]
    All,

    Columns(Vec<ColumnRef>),

    /// `COUNT(1)`
    Count,

    /// `1`, used by existence checks
    One,

    Max(ColumnRef),

    Min(ColumnRef),
}

impl Projection {
    /// Aggregate projections ignore ordering and paging.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Projection::Count | Projection::Max(_) | Projection::Min(_))
    }
}
