use super::SchemaConfig;
use crate::{Error, Result};

use quarry_core::driver::Driver;
use std::sync::Arc;

/// Instantiates the driver named by a schema's configuration.
pub(crate) fn driver(schema: &str, config: &SchemaConfig) -> Result<Arc<dyn Driver>> {
    match config.driver.as_str() {
        "sqlite" => connect_sqlite(schema, config),
        other => Err(Error::configuration(
            schema,
            config.host(),
            format!("unsupported driver `{other}`"),
        )),
    }
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(schema: &str, config: &SchemaConfig) -> Result<Arc<dyn Driver>> {
    let driver = match config.dbname.as_str() {
        "" | ":memory:" => quarry_driver_sqlite::Sqlite::in_memory(schema),
        path => quarry_driver_sqlite::Sqlite::open(schema, path),
    };
    Ok(Arc::new(driver))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(schema: &str, config: &SchemaConfig) -> Result<Arc<dyn Driver>> {
    Err(Error::configuration(
        schema,
        config.host(),
        "`sqlite` feature not enabled",
    ))
}
