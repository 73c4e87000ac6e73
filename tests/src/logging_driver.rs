use quarry_core::{
    async_trait,
    driver::{Connection, Driver, QuerySql, Response},
    Result,
};
use std::{
    borrow::Cow,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// Log of all statements executed through this driver
    ops_log: Arc<Mutex<Vec<DriverOp>>>,

    /// Number of connections opened
    connects: Arc<AtomicUsize>,
}

impl LoggingDriver {
    pub fn new(driver: impl Driver) -> Self {
        Self {
            inner: Box::new(driver),
            ops_log: Arc::new(Mutex::new(Vec::new())),
            connects: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }

    pub fn connects_handle(&self) -> Arc<AtomicUsize> {
        self.connects.clone()
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    fn url(&self) -> Cow<'_, str> {
        self.inner.url()
    }

    fn host(&self) -> Cow<'_, str> {
        self.inner.host()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        let inner = self.inner.connect().await?;
        self.connects.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(LoggingConnection {
            inner,
            ops_log: self.ops_log_handle(),
        }))
    }

    fn max_connections(&self) -> Option<usize> {
        self.inner.max_connections()
    }
}

/// One statement and what the backend answered. `response` is `None` when
/// the statement failed.
#[derive(Debug, Clone)]
pub struct DriverOp {
    pub query: QuerySql,
    pub response: Option<Response>,
}

#[derive(Debug)]
pub struct LoggingConnection {
    /// The underlying connection that actually executes statements
    inner: Box<dyn Connection>,

    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

#[async_trait]
impl Connection for LoggingConnection {
    async fn exec(&mut self, query: &QuerySql) -> Result<Response> {
        let result = self.inner.exec(query).await;

        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(DriverOp {
                query: query.clone(),
                response: result.as_ref().ok().cloned(),
            });

        result
    }
}
