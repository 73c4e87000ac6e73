mod collection;
pub use collection::Collection;

pub mod db;
pub use db::Db;

mod exec;
pub use exec::{ExecOptions, Executor};

pub mod query;
pub use query::Query;

mod record;
pub use record::{Record, Related, Status};

pub mod relation;

mod result;
pub use result::ResultSet;

mod row;
pub use row::{FromRow, Row};

pub use quarry_core::{
    async_trait, bail,
    driver::{self, QuerySql},
    err,
    schema::{self, Column, Entity, Schema},
    stmt::{self, Condition, CursorDirection, Direction, FromValue, JoinKind, Op, Type, Value},
    Error, Result,
};

pub use quarry_sql as sql;
