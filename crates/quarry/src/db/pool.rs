//! Connection pooling for one configured schema.

use crate::{Error, Result};

use deadpool::managed::{PoolError, Timeouts};
use quarry_core::driver::{Connection, Driver};
use std::{
    ops::{Deref, DerefMut},
    sync::Arc,
    time::Duration,
};

/// Get the default maximum size of a pool, which is `cpu_core_count * 2`
/// including logical cores (Hyper-Threading).
fn get_default_pool_max_size() -> usize {
    deadpool::managed::PoolConfig::default().max_size
}

/// Configuration for connection pool behavior.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_size: usize,

    /// Bound on establishing a new connection.
    pub connect_timeout: Option<Duration>,
}

impl PoolConfig {
    /// Creates a new pool configuration with default settings.
    pub fn new() -> Self {
        Self {
            max_size: get_default_pool_max_size(),
            connect_timeout: None,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The connections of one schema.
#[derive(Debug)]
pub struct Pool {
    inner: deadpool::managed::Pool<Manager>,
    schema: String,
    host: String,
}

impl Pool {
    /// Creates the pool and opens its first connection, so that an
    /// unreachable database is reported here as a configuration error.
    pub async fn open(
        schema: impl Into<String>,
        driver: Arc<dyn Driver>,
        config: &PoolConfig,
    ) -> Result<Self> {
        let schema = schema.into();
        let host = driver.host().into_owned();

        let max_size = match driver.max_connections() {
            Some(max) => max.min(config.max_size),
            None => config.max_size,
        };

        let inner = deadpool::managed::Pool::builder(Manager { driver })
            .runtime(deadpool::Runtime::Tokio1)
            .max_size(max_size.max(1))
            .timeouts(Timeouts {
                create: config.connect_timeout,
                ..Timeouts::default()
            })
            .build()
            .map_err(|err| Error::configuration(&schema, &host, err.to_string()))?;

        let pool = Self {
            inner,
            schema,
            host,
        };

        pool.inner.get().await.map_err(|err| match err {
            PoolError::Backend(err) => err,
            PoolError::Timeout(_) => {
                Error::configuration(&pool.schema, &pool.host, "timed out connecting")
            }
            err => Error::configuration(&pool.schema, &pool.host, err.to_string()),
        })?;

        Ok(pool)
    }

    /// Retrieves a connection from the pool.
    pub async fn get(&self) -> Result<PoolConnection> {
        let connection = self.inner.get().await.map_err(|err| match err {
            PoolError::Backend(err) => err,
            err => Error::connection_pool(err),
        })?;
        Ok(PoolConnection { inner: connection })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Closes the pool. Checked out connections are dropped when returned.
    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

#[derive(Debug)]
struct Manager {
    driver: Arc<dyn Driver>,
}

impl deadpool::managed::Manager for Manager {
    type Type = Box<dyn Connection>;
    type Error = crate::Error;

    async fn create(&self) -> Result<Self::Type> {
        self.driver.connect().await
    }

    async fn recycle(
        &self,
        _obj: &mut Self::Type,
        _metrics: &deadpool::managed::Metrics,
    ) -> deadpool::managed::RecycleResult<Self::Error> {
        Ok(())
    }
}

/// A connection retrieved from a pool.
///
/// When dropped, the connection is returned to the pool for reuse.
pub struct PoolConnection {
    inner: deadpool::managed::Object<Manager>,
}

impl Deref for PoolConnection {
    type Target = Box<dyn Connection>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
