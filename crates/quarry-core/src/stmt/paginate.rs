use super::{Direction, Op, Value};

/// How a select is paged. The two strategies are never mixed.
#[derive(Debug, Clone, PartialEq)]
pub enum Pagination {
    /// `LIMIT page_size OFFSET page * page_size`. The backend scans and
    /// discards every skipped row.
    Offset { page: u64, page_size: u64 },

    /// Keyset pagination: rows strictly after (or before) `last_id` on
    /// `column`, scanned in cursor order.
    ByCursor {
        last_id: Value,
        direction: CursorDirection,
        page_size: u64,
        column: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorDirection {
    #[default]
    Next,
    Prev,
}

impl CursorDirection {
    /// Order in which the backend scans the cursor column.
    pub fn scan_direction(self) -> Direction {
        match self {
            CursorDirection::Next => Direction::Asc,
            CursorDirection::Prev => Direction::Desc,
        }
    }

    /// Operator of the boundary condition.
    pub fn boundary_op(self) -> Op {
        match self {
            CursorDirection::Next => Op::Gt,
            CursorDirection::Prev => Op::Lt,
        }
    }

    /// Parses `"next"` / `"prev"`, case-insensitive.
    pub fn parse(src: &str) -> Option<CursorDirection> {
        if src.eq_ignore_ascii_case("next") {
            Some(CursorDirection::Next)
        } else if src.eq_ignore_ascii_case("prev") {
            Some(CursorDirection::Prev)
        } else {
            None
        }
    }
}

impl Pagination {
    pub fn offset(page: u64, page_size: u64) -> Pagination {
        Pagination::Offset { page, page_size }
    }

    pub fn page_size(&self) -> u64 {
        match self {
            Pagination::Offset { page_size, .. } | Pagination::ByCursor { page_size, .. } => {
                *page_size
            }
        }
    }
}
