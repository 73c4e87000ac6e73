use super::{ColumnRef, Direction};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: ColumnRef,
    pub direction: Direction,
}

impl OrderBy {
    pub fn new(column: impl Into<ColumnRef>, direction: Direction) -> OrderBy {
        OrderBy {
            column: column.into(),
            direction,
        }
    }

    /// Flips the direction by which the query is ordered.
    pub fn reverse(&mut self) {
        self.direction = self.direction.reverse();
    }
}
