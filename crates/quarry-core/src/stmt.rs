mod column_ref;
pub use column_ref::ColumnRef;

mod condition;
pub use condition::{Comparison, Condition, RawCondition};

mod delete;
pub use delete::Delete;

mod direction;
pub use direction::Direction;

mod filter;
pub use filter::Filter;

mod insert;
pub use insert::Insert;

mod join;
pub use join::{Join, JoinKind};

mod op;
pub use op::Op;

mod order_by;
pub use order_by::OrderBy;

mod paginate;
pub use paginate::{CursorDirection, Pagination};

mod projection;
pub use projection::Projection;

mod select;
pub use select::Select;

mod table_ref;
pub use table_ref::TableRef;

mod ty;
pub use ty::Type;

mod update;
pub use update::Update;

mod value;
pub use value::{FromValue, Value};

/// The declarative shape of one SQL operation before compilation.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    /// Name of the table the statement targets.
    pub fn table(&self) -> &str {
        match self {
            Statement::Select(stmt) => &stmt.source.name,
            Statement::Insert(stmt) => &stmt.table,
            Statement::Update(stmt) => &stmt.source.name,
            Statement::Delete(stmt) => &stmt.source.name,
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(self, Statement::Select(_))
    }

    /// Returns `true` for statements that modify rows.
    pub fn is_mutation(&self) -> bool {
        !self.is_select()
    }

    /// The SQL verb of the statement, for diagnostics.
    pub fn action(&self) -> &'static str {
        match self {
            Statement::Select(_) => "SELECT",
            Statement::Insert(_) => "INSERT",
            Statement::Update(_) => "UPDATE",
            Statement::Delete(_) => "DELETE",
        }
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Statement::Select(value)
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Statement::Insert(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Statement::Update(value)
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Statement::Delete(value)
    }
}
