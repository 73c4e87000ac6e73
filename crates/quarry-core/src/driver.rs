mod query_sql;
pub use query_sql::QuerySql;

mod response;
pub use response::{Response, Rows};

use crate::{async_trait, Result};

use std::{borrow::Cow, fmt::Debug};

/// A database backend. One driver instance serves one configured schema.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Connection URL, with credentials removed.
    fn url(&self) -> Cow<'_, str>;

    /// Host description used in error messages.
    fn host(&self) -> Cow<'_, str>;

    /// Opens a new connection.
    async fn connect(&self) -> Result<Box<dyn Connection>>;

    /// Upper bound the backend places on concurrent connections, if any.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

/// One open connection. Statements run sequentially on a connection.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Prepares and runs a compiled statement.
    ///
    /// Preparation failures are reported with [`crate::Error::prepare`] and
    /// runtime failures with [`crate::Error::execute`].
    async fn exec(&mut self, query: &QuerySql) -> Result<Response>;
}
