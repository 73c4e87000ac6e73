mod exec_log;
pub use exec_log::ExecLog;

mod logging_driver;
pub use logging_driver::{DriverOp, LoggingDriver};

use quarry::{db::Builder, Db, ExecOptions, Executor, QuerySql, ResultSet};
use quarry_driver_sqlite::Sqlite;
use std::sync::Once;

/// Installs a `tracing` subscriber once per test binary. Output is captured
/// by the test harness and filtered with `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A registry whose `default` schema is an in-memory SQLite database
/// behind a [`LoggingDriver`].
pub struct TestDb {
    pub db: Db,
    log: ExecLog,
}

impl TestDb {
    /// Builds the registry from `builder` and runs `ddl` against the
    /// `default` schema. The log starts out empty.
    pub async fn setup(mut builder: Builder, ddl: &[&str]) -> TestDb {
        init_tracing();

        let driver = LoggingDriver::new(Sqlite::in_memory("default"));
        let log = ExecLog::new(driver.ops_log_handle(), driver.connects_handle());

        let db = builder.driver("default", driver).build().unwrap();
        let test = TestDb { db, log };

        for sql in ddl {
            test.exec_raw(sql).await;
        }

        test.log.clear();
        test
    }

    pub fn log(&self) -> &ExecLog {
        &self.log
    }

    /// Runs a literal statement on the `default` schema.
    pub async fn exec_raw(&self, sql: &str) -> ResultSet {
        self.db
            .execute("default", QuerySql::new(sql), ExecOptions::default())
            .await
            .unwrap()
    }
}
