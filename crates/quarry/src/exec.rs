use crate::{ResultSet, Result};

use quarry_core::{async_trait, driver::QuerySql, Schema};

/// Runs compiled statements against a named schema.
///
/// [`Db`](crate::Db) is the production implementation. Queries, records and
/// relation resolution only ever talk to this trait, so tests can substitute
/// an executor that records statements and replays canned results.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Entity descriptors relations are resolved against.
    fn schema(&self) -> &Schema;

    async fn execute(&self, schema: &str, query: QuerySql, options: ExecOptions)
        -> Result<ResultSet>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Inline bound values into the SQL text as literals instead of sending
    /// them as parameters.
    pub emulate_params: bool,
}

impl ExecOptions {
    pub fn emulated() -> ExecOptions {
        ExecOptions {
            emulate_params: true,
        }
    }
}
