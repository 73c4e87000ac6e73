pub mod serializer;
pub use serializer::{inline_params, literal, ParamBinder, Placeholder, Serializer};

use quarry_core::{driver::QuerySql, stmt::Statement, Result};

/// Compiles a statement into SQL text and its bound parameters.
pub fn compile(stmt: &Statement) -> Result<QuerySql> {
    Serializer::new().serialize(stmt)
}

/// Compiles a statement and inlines every bound value as a SQL literal.
/// Intended for logs and debugging output.
pub fn compile_debug(stmt: &Statement) -> Result<String> {
    Ok(inline_params(&compile(stmt)?))
}
