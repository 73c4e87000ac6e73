mod value;
pub(crate) use value::Value;

use quarry_core::{
    async_trait,
    driver::{Driver, QuerySql, Response},
    Error, Result,
};
use rusqlite::{types::ToSql, Connection as RusqliteConnection};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};
use url::Url;

/// SQLite driver for one configured schema.
#[derive(Debug)]
pub struct Sqlite {
    schema: String,
    target: Target,
}

#[derive(Debug)]
enum Target {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Creates a driver from a `sqlite:` connection URL, such as
    /// `sqlite::memory:` or `sqlite:/var/db/app.db`.
    pub fn new(schema: impl Into<String>, url: &str) -> Result<Self> {
        let schema = schema.into();
        let parsed = Url::parse(url).map_err(|err| {
            Error::invalid_configuration(&schema, format!("invalid connection URL `{url}`: {err}"))
        })?;

        if parsed.scheme() != "sqlite" {
            return Err(Error::invalid_configuration(
                &schema,
                format!("connection URL does not have a `sqlite` scheme; url={url}"),
            ));
        }

        let target = match parsed.path() {
            ":memory:" | "" => Target::InMemory,
            path => Target::File(PathBuf::from(path)),
        };

        Ok(Self { schema, target })
    }

    /// Create an in-memory SQLite database
    pub fn in_memory(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            target: Target::InMemory,
        }
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(schema: impl Into<String>, path: P) -> Self {
        Self {
            schema: schema.into(),
            target: Target::File(path.as_ref().to_path_buf()),
        }
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match &self.target {
            Target::InMemory => Cow::Borrowed("sqlite::memory:"),
            Target::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    fn host(&self) -> Cow<'_, str> {
        match &self.target {
            Target::InMemory => Cow::Borrowed(":memory:"),
            Target::File(path) => Cow::Owned(path.display().to_string()),
        }
    }

    async fn connect(&self) -> Result<Box<dyn quarry_core::Connection>> {
        let host = self.host().into_owned();
        let connection = match &self.target {
            Target::File(path) => RusqliteConnection::open(path),
            Target::InMemory => RusqliteConnection::open_in_memory(),
        }
        .map_err(|err| Error::configuration(&self.schema, &host, err.to_string()))?;

        tracing::debug!(schema = %self.schema, host = %host, "opened sqlite connection");

        Ok(Box::new(Connection {
            connection,
            schema: self.schema.clone(),
            host,
        }))
    }

    /// Every in-memory connection is a separate database, so the pool must
    /// hold exactly one.
    fn max_connections(&self) -> Option<usize> {
        matches!(self.target, Target::InMemory).then_some(1)
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
    schema: String,
    host: String,
}

impl Connection {
    fn prepare_error(&self, sql: &str, err: rusqlite::Error) -> Error {
        Error::prepare(sql, &self.schema, &self.host, err)
    }

    fn execute_error(&self, sql: &str, err: rusqlite::Error) -> Error {
        Error::execute(sql, &self.schema, &self.host, err)
    }
}

#[async_trait]
impl quarry_core::Connection for Connection {
    async fn exec(&mut self, query: &QuerySql) -> Result<Response> {
        let sql = &query.sql;

        let params = query
            .params
            .iter()
            .map(|(name, value)| (format!(":{name}"), Value::from(value.clone())))
            .collect::<Vec<_>>();
        let named = params
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect::<Vec<_>>();

        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(|err| self.prepare_error(sql, err))?;

        if stmt.column_count() == 0 {
            let count = stmt
                .execute(named.as_slice())
                .map_err(|err| self.execute_error(sql, err))?;

            let is_insert = sql
                .get(..6)
                .is_some_and(|verb| verb.eq_ignore_ascii_case("INSERT"));
            let last_insert_id = is_insert.then(|| self.connection.last_insert_rowid());

            return Ok(Response::count(count as u64).with_last_insert_id(last_insert_id));
        }

        let columns = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        let width = columns.len();

        let mut rows = stmt
            .query(named.as_slice())
            .map_err(|err| self.execute_error(sql, err))?;

        let mut ret = vec![];

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut items = Vec::with_capacity(width);

                    for index in 0..width {
                        let value =
                            Value::from_sql(row, index).map_err(|err| self.execute_error(sql, err))?;
                        items.push(value.into_inner());
                    }

                    ret.push(items);
                }
                Ok(None) => break,
                Err(err) => return Err(self.execute_error(sql, err)),
            }
        }

        Ok(Response::values(columns, ret))
    }
}
