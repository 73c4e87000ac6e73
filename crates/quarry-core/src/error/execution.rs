use super::Error;

/// Stage of statement dispatch at which the backend reported a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The backend rejected the statement text.
    Prepare,
    /// The statement was accepted but failed while running.
    Execute,
}

/// Error reported by the backend while preparing or running a statement.
#[derive(Debug)]
pub(super) struct ExecutionError {
    stage: Stage,
    sql: Box<str>,
    schema: Box<str>,
    host: Box<str>,
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let verb = match self.stage {
            Stage::Prepare => "prepare",
            Stage::Execute => "execute",
        };
        write!(
            f,
            "failed to {verb} statement on schema `{}` (host: {}): {} [sql: {}]",
            self.schema, self.host, self.inner, self.sql
        )
    }
}

impl Error {
    fn execution(
        stage: Stage,
        sql: &str,
        schema: &str,
        host: &str,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Error {
        Error::from(super::ErrorKind::Execution(ExecutionError {
            stage,
            sql: sql.into(),
            schema: schema.into(),
            host: host.into(),
            inner: Box::new(err),
        }))
    }

    /// Creates an error for a statement the backend refused to prepare.
    pub fn prepare(
        sql: &str,
        schema: &str,
        host: &str,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Error {
        Error::execution(Stage::Prepare, sql, schema, host, err)
    }

    /// Creates an error for a statement that failed while running, for
    /// example a unique or foreign key violation.
    pub fn execute(
        sql: &str,
        schema: &str,
        host: &str,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Error {
        Error::execution(Stage::Execute, sql, schema, host, err)
    }

    /// Returns the dispatch stage if this error came from the backend.
    pub fn execution_stage(&self) -> Option<Stage> {
        self.chain().find_map(|err| match err.kind() {
            super::ErrorKind::Execution(err) => Some(err.stage),
            _ => None,
        })
    }

    /// Returns the SQL text that failed, if this error came from the backend.
    pub fn failed_sql(&self) -> Option<&str> {
        self.chain().find_map(|err| match err.kind() {
            super::ErrorKind::Execution(err) => Some(&*err.sql),
            _ => None,
        })
    }

    /// Returns `true` if the backend rejected the statement text.
    pub fn is_prepare(&self) -> bool {
        self.execution_stage() == Some(Stage::Prepare)
    }

    /// Returns `true` if the statement failed while running.
    pub fn is_execute(&self) -> bool {
        self.execution_stage() == Some(Stage::Execute)
    }
}
