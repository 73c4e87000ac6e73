mod builder;
mod config;
mod connect;
mod pool;

pub use builder::Builder;
pub use config::{Config, SchemaConfig};
pub use pool::{Pool, PoolConfig, PoolConnection};

use crate::{ExecOptions, Executor, ResultSet, Result};

use indexmap::IndexMap;
use quarry_core::{
    async_trait,
    driver::{Driver, QuerySql},
    schema::Entity,
    Schema,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, trace};

/// Registry of per-schema connection pools plus the entity descriptors
/// queries map rows onto.
///
/// Pools are created on first use. Concurrent first uses of the same schema
/// share a single initialization, so a schema never has more than one pool.
/// Cloning a `Db` is cheap and every clone shares the same pools.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

struct Shared {
    config: Config,
    schema: Schema,

    /// Drivers supplied directly to the builder, keyed by schema name. They
    /// take precedence over `config`.
    drivers: IndexMap<String, Arc<dyn Driver>>,

    pool_config: PoolConfig,
    pools: Mutex<HashMap<String, Arc<OnceCell<Arc<Pool>>>>>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns the pool for `name`, opening it on first use.
    ///
    /// Fails with a configuration error if the schema is not configured or
    /// its database cannot be reached. A failed open is not cached; the next
    /// call tries again.
    pub async fn instance(&self, name: &str) -> Result<Arc<Pool>> {
        let cell = self
            .shared
            .pools
            .lock()
            .await
            .entry(name.to_string())
            .or_default()
            .clone();

        let pool = cell.get_or_try_init(|| self.open(name)).await?;
        Ok(pool.clone())
    }

    async fn open(&self, name: &str) -> Result<Arc<Pool>> {
        let mut pool_config = self.shared.pool_config.clone();

        let driver = match self.shared.drivers.get(name) {
            Some(driver) => driver.clone(),
            None => {
                let config = self.shared.config.schema(name)?;

                if let Some(max_size) = config.max_connections {
                    pool_config.max_size = max_size;
                }

                if let Some(timeout) = config.connect_timeout() {
                    pool_config.connect_timeout = Some(timeout);
                }

                connect::driver(name, config)?
            }
        };

        let pool = Pool::open(name, driver, &pool_config).await?;

        info!(
            schema = name,
            host = pool.host(),
            max_size = pool_config.max_size,
            "opened connection pool"
        );

        Ok(Arc::new(pool))
    }

    /// Returns `true` if the pool for `name` has been opened and not closed.
    pub async fn is_open(&self, name: &str) -> bool {
        self.shared
            .pools
            .lock()
            .await
            .get(name)
            .is_some_and(|cell| cell.initialized())
    }

    /// Closes and forgets the pool for `name`. Returns `false` if it was
    /// never opened.
    pub async fn close(&self, name: &str) -> bool {
        let Some(cell) = self.shared.pools.lock().await.remove(name) else {
            return false;
        };

        match cell.get() {
            Some(pool) => {
                pool.close();
                info!(schema = name, "closed connection pool");
                true
            }
            None => false,
        }
    }

    /// Closes every open pool.
    pub async fn close_all(&self) {
        let pools = std::mem::take(&mut *self.shared.pools.lock().await);

        for (name, cell) in pools {
            if let Some(pool) = cell.get() {
                pool.close();
                info!(schema = %name, "closed connection pool");
            }
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.shared.schema
    }

    /// Looks up a registered entity by name.
    pub fn entity(&self, name: &str) -> Result<&Arc<Entity>> {
        self.shared.schema.entity(name)
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }
}

#[async_trait]
impl Executor for Db {
    fn schema(&self) -> &Schema {
        &self.shared.schema
    }

    async fn execute(
        &self,
        schema: &str,
        query: QuerySql,
        options: ExecOptions,
    ) -> Result<ResultSet> {
        let pool = self.instance(schema).await?;

        let query = if options.emulate_params {
            QuerySql {
                sql: quarry_sql::inline_params(&query),
                params: IndexMap::new(),
                returns_rows: query.returns_rows,
            }
        } else {
            query
        };

        debug!(
            schema,
            sql = %query.sql,
            params = query.params.len(),
            "executing statement"
        );

        if !query.params.is_empty() {
            trace!(params = ?query.params, "bound parameters");
        }

        let mut connection = pool.get().await?;
        let response = connection.exec(&query).await?;
        Ok(ResultSet::from(response))
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("schemas", &self.shared.config.schemas.keys())
            .field("drivers", &self.shared.drivers)
            .field("entities", &self.shared.schema.entities.keys())
            .finish()
    }
}
