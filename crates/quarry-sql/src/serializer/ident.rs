use super::{Formatter, ToSql};

use quarry_core::{schema::check_ident, stmt::ColumnRef, Error};

/// A backtick-quoted identifier. Anything other than a plain identifier is
/// recorded as a validation failure.
pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let ident = self.0.as_ref();

        if ident.contains('.') || check_ident(ident).is_err() {
            f.fail(Error::invalid_identifier(ident));
        }

        f.dst.push('`');
        f.dst.push_str(&ident.replace('`', "``"));
        f.dst.push('`');
    }
}

/// A column qualified by the formatter's current qualifier unless it names
/// its own.
pub(super) struct Qualified<'a>(pub(super) &'a ColumnRef);

impl ToSql for Qualified<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match (&self.0.qualifier, f.qualifier.clone()) {
            (Some(_), _) => self.0.to_sql(f),
            (None, Some(qualifier)) => column(Some(&qualifier), &self.0.name, f),
            (None, None) => column(None, &self.0.name, f),
        }
    }
}

/// Renders the column as written.
impl ToSql for &ColumnRef {
    fn to_sql(self, f: &mut Formatter<'_>) {
        column(self.qualifier.as_deref(), &self.name, f);
    }
}

fn column(qualifier: Option<&str>, name: &str, f: &mut Formatter<'_>) {
    if let Some(qualifier) = qualifier {
        fmt!(f, Ident(qualifier), ".");
    }

    if name == "*" {
        f.dst.push('*');
    } else {
        fmt!(f, Ident(name));
    }
}
