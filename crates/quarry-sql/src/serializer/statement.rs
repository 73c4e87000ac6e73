use super::{
    condition::Bound,
    paginate::{self, Plan},
    Comma, Conditions, Formatter, Ident, Qualified, ToSql,
};

use quarry_core::{
    stmt::{Delete, Insert, Join, JoinKind, OrderBy, Projection, Select, Statement, TableRef, Update},
    Error,
};

impl ToSql for &Statement {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &Select {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match paginate::resolve(self) {
            Plan::Flat(stmt) => select(&stmt, f),
            Plan::Wrapped {
                inner,
                alias,
                order_by,
            } => {
                f.dst.push_str("SELECT * FROM (");
                select(&inner, f);
                fmt!(f, ") AS ", Ident(&alias), " ORDER BY ");
                f.with_qualifier(None, |f| {
                    fmt!(f, Comma(order_by.iter()));
                });
            }
        }
    }
}

fn select(stmt: &Select, f: &mut Formatter<'_>) {
    f.with_qualifier(Some(stmt.source.qualifier()), |f| {
        fmt!(f, "SELECT ", &stmt.projection, " FROM ", &stmt.source);

        for join in &stmt.joins {
            join.to_sql(f);
        }

        if !stmt.filter.is_empty() {
            fmt!(f, " WHERE ", Conditions(&stmt.filter));
        }

        if !stmt.group_by.is_empty() {
            fmt!(f, " GROUP BY ", Comma(stmt.group_by.iter().map(Qualified)));
        }

        if !stmt.having.is_empty() {
            f.with_qualifier(None, |f| {
                fmt!(f, " HAVING ", Conditions(&stmt.having));
            });
        }

        if !stmt.order_by.is_empty() {
            fmt!(f, " ORDER BY ", Comma(stmt.order_by.iter()));
        }

        limit_offset(stmt.limit, stmt.offset, f);
    });
}

/// SQLite only accepts OFFSET after a LIMIT; `LIMIT -1` means unbounded.
fn limit_offset(limit: Option<u64>, offset: Option<u64>, f: &mut Formatter<'_>) {
    match (limit, offset) {
        (Some(limit), offset) => {
            fmt!(f, " LIMIT ", limit);
            if let Some(offset) = offset {
                fmt!(f, " OFFSET ", offset);
            }
        }
        (None, Some(offset)) => fmt!(f, " LIMIT -1 OFFSET ", offset),
        (None, None) => {}
    }
}

impl ToSql for &Projection {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Projection::All => f.dst.push('*'),
            Projection::Columns(columns) if columns.is_empty() => f.dst.push('*'),
            Projection::Columns(columns) => fmt!(f, Comma(columns.iter())),
            Projection::Count => f.dst.push_str("COUNT(1)"),
            Projection::One => f.dst.push('1'),
            Projection::Max(column) => fmt!(f, "MAX(", Qualified(column), ")"),
            Projection::Min(column) => fmt!(f, "MIN(", Qualified(column), ")"),
        }
    }
}

impl ToSql for &TableRef {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, Ident(&self.name));
        if let Some(alias) = &self.alias {
            fmt!(f, " AS ", Ident(alias));
        }
    }
}

impl ToSql for &Join {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, " ", self.kind.as_sql(), " ", Ident(&self.table));

        if let Some(alias) = &self.alias {
            fmt!(f, " AS ", Ident(alias));
        }

        if self.kind != JoinKind::Cross && !self.on.is_empty() {
            fmt!(f, " ON ", &self.on);
        }
    }
}

impl ToSql for &OrderBy {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, Qualified(&self.column), " ", self.direction.as_sql());
    }
}

impl ToSql for &Insert {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "INSERT INTO ", Ident(&self.table));

        let Some(first) = self.rows.first() else {
            f.fail(Error::validation(format!(
                "INSERT into `{}` has no rows",
                self.table
            )));
            return;
        };

        if first.is_empty() {
            if self.rows.len() > 1 {
                f.fail(Error::validation(
                    "multi-row INSERT requires at least one column",
                ));
            }
            f.dst.push_str(" DEFAULT VALUES");
            return;
        }

        fmt!(f, " (", Comma(first.keys().map(Ident)), ") VALUES ");

        let mut s = "";
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != first.len() || !first.keys().all(|column| row.contains_key(column)) {
                f.fail(Error::validation(format!(
                    "INSERT row {i} does not name the same columns as the first row"
                )));
                return;
            }

            for (column, value) in row {
                if !value.is_scalar() {
                    f.fail(Error::non_scalar_value(column));
                }
            }

            let values = first.keys().filter_map(|column| row.get(column)).map(|value| Bound {
                value,
                is_unsafe: false,
            });
            fmt!(f, s, "(", Comma(values), ")");
            s = ", ";
        }
    }
}

impl ToSql for &Update {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if self.assignments.is_empty() {
            f.fail(Error::validation(format!(
                "UPDATE on `{}` has no assignments",
                self.source.name
            )));
        }

        if self.filter.is_empty() && !self.allow_unconditional {
            f.fail(Error::unconditional_mutation("UPDATE", &self.source.name));
        }

        fmt!(f, "UPDATE ", &self.source, " SET ");

        let mut s = "";
        for (column, value) in &self.assignments {
            if !value.is_scalar() {
                f.fail(Error::non_scalar_value(column));
            }
            fmt!(f, s, Ident(column), " = ", Bound { value, is_unsafe: false });
            s = ", ";
        }

        f.with_qualifier(Some(self.source.qualifier()), |f| {
            if !self.filter.is_empty() {
                fmt!(f, " WHERE ", Conditions(&self.filter));
            }
        });

        limit_offset(self.limit, self.offset, f);
    }
}

impl ToSql for &Delete {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if self.filter.is_empty() && !self.allow_unconditional {
            f.fail(Error::unconditional_mutation("DELETE", &self.source.name));
        }

        fmt!(f, "DELETE FROM ", Ident(&self.source.name));

        // DELETE takes no alias; conditions resolve against the table name.
        f.with_qualifier(Some(&self.source.name), |f| {
            if !self.filter.is_empty() {
                fmt!(f, " WHERE ", Conditions(&self.filter));
            }
        });

        limit_offset(self.limit, self.offset, f);
    }
}
