use quarry_core::stmt::{
    ColumnRef, Condition, CursorDirection, Direction, OrderBy, Pagination, Select,
};

use std::borrow::Cow;

/// A select after pagination has been applied.
pub(super) enum Plan<'a> {
    Flat(Cow<'a, Select>),

    /// `SELECT * FROM (inner) AS alias ORDER BY ...`
    Wrapped {
        inner: Select,
        alias: String,
        order_by: Vec<OrderBy>,
    },
}

/// Lowers the select's pagination into limit, offset, boundary conditions and
/// ordering.
pub(super) fn resolve(select: &Select) -> Plan<'_> {
    let Some(pagination) = &select.pagination else {
        return Plan::Flat(Cow::Borrowed(select));
    };

    match pagination {
        Pagination::Offset { page, page_size } => {
            let mut stmt = select.clone();
            stmt.pagination = None;
            stmt.limit = Some(*page_size);
            stmt.offset = Some(page * page_size);
            Plan::Flat(Cow::Owned(stmt))
        }
        Pagination::ByCursor {
            last_id,
            direction,
            page_size,
            column,
        } => {
            let qualifier = select.source.qualifier();
            let cursor = ColumnRef::parse(column).or_qualify(qualifier);

            let mut inner = select.clone();
            inner.pagination = None;
            inner.limit = Some(*page_size);
            inner.offset = None;
            inner.filter.prepend_to_groups(Condition::compare(
                cursor.clone(),
                direction.boundary_op(),
                last_id.clone(),
            ));

            // The scan itself must be ordered by the cursor column. Any other
            // ordering is applied to the page afterwards.
            inner.order_by = vec![OrderBy::new(cursor.clone(), direction.scan_direction())];

            let order_by = if !select.order_by.is_empty() {
                select.order_by.clone()
            } else if *direction == CursorDirection::Prev {
                vec![OrderBy::new(cursor, Direction::Asc)]
            } else {
                return Plan::Flat(Cow::Owned(inner));
            };

            let order_by = order_by
                .into_iter()
                .map(|order| OrderBy {
                    column: ColumnRef::qualified(qualifier, order.column.name),
                    direction: order.direction,
                })
                .collect();

            Plan::Wrapped {
                inner,
                alias: qualifier.to_string(),
                order_by,
            }
        }
    }
}
