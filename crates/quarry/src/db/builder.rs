use super::{Config, Db, PoolConfig, SchemaConfig, Shared};
use crate::Result;

use indexmap::IndexMap;
use quarry_core::{driver::Driver, schema::Entity, Schema};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct Builder {
    config: Config,

    /// Entity registry
    schema: Schema,

    drivers: IndexMap<String, Arc<dyn Driver>>,

    pool: PoolConfig,
}

impl Builder {
    /// Replaces the schema connection settings.
    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    /// Adds or replaces the connection settings of one schema.
    pub fn schema_config(&mut self, name: impl Into<String>, config: SchemaConfig) -> &mut Self {
        self.config.insert(name, config);
        self
    }

    pub fn register(&mut self, entity: impl Into<Arc<Entity>>) -> &mut Self {
        self.schema.register(entity);
        self
    }

    /// Serves schema `name` with an already constructed driver instead of
    /// one built from configuration.
    pub fn driver(&mut self, name: impl Into<String>, driver: impl Driver) -> &mut Self {
        self.drivers.insert(name.into(), Arc::new(driver));
        self
    }

    /// Default upper bound on connections per schema.
    pub fn max_pool_size(&mut self, max_size: usize) -> &mut Self {
        self.pool.max_size = max_size;
        self
    }

    /// Default bound on opening one connection.
    pub fn connect_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.pool.connect_timeout = Some(timeout);
        self
    }

    /// Builds the registry. No connection is opened until a schema is first
    /// used.
    pub fn build(&mut self) -> Result<Db> {
        self.schema.verify()?;

        Ok(Db {
            shared: Arc::new(Shared {
                config: std::mem::take(&mut self.config),
                schema: std::mem::take(&mut self.schema),
                drivers: std::mem::take(&mut self.drivers),
                pool_config: self.pool.clone(),
                pools: Mutex::new(HashMap::new()),
            }),
        })
    }
}
