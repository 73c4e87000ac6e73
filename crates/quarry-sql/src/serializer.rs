#[macro_use]
mod fmt;
use fmt::ToSql;

mod condition;
use condition::Conditions;

mod delim;
use delim::Comma;

mod ident;
use ident::{Ident, Qualified};

mod inline;
pub use inline::{inline_params, literal};

mod paginate;

mod params;
pub use params::{ParamBinder, Placeholder};

mod statement;

use quarry_core::{driver::QuerySql, err, stmt::Statement, Error, Result};

/// Serializes statements to backtick-quoted SQL with named `:pN`
/// placeholders.
#[derive(Debug, Default, Clone)]
pub struct Serializer {
    _priv: (),
}

struct Formatter<'a> {
    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut ParamBinder,

    /// Name unqualified condition columns resolve against. `None` leaves
    /// them unqualified, as in HAVING.
    qualifier: Option<String>,

    /// First validation failure. Serialization continues so the fragment
    /// writers stay infallible; the error is returned at the end.
    error: Option<Error>,
}

impl Serializer {
    pub fn new() -> Serializer {
        Serializer::default()
    }

    pub fn serialize(&self, stmt: &Statement) -> Result<QuerySql> {
        let mut sql = String::new();
        let mut params = ParamBinder::new();

        let mut fmt = Formatter {
            dst: &mut sql,
            params: &mut params,
            qualifier: None,
            error: None,
        };

        stmt.to_sql(&mut fmt);

        if let Some(err) = fmt.error {
            return Err(err.context(err!("compiling {} on `{}`", stmt.action(), stmt.table())));
        }

        Ok(QuerySql {
            sql,
            params: params.into_params(),
            returns_rows: stmt.is_select(),
        })
    }
}

impl Formatter<'_> {
    /// Records a validation failure. Only the first one is kept.
    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Runs `f` with `qualifier` applied to unqualified condition columns.
    fn with_qualifier(&mut self, qualifier: Option<&str>, f: impl FnOnce(&mut Self)) {
        let prev = std::mem::replace(&mut self.qualifier, qualifier.map(str::to_string));
        f(self);
        self.qualifier = prev;
    }
}
