use crate::{Collection, Error, ExecOptions, Executor, Record, ResultSet, Result, Row};

use indexmap::IndexMap;
use quarry_core::{
    driver::QuerySql,
    schema::Entity,
    stmt::{
        ColumnRef, Condition, CursorDirection, Delete, Direction, Filter, Insert, Join, JoinKind,
        Op, OrderBy, Pagination, Projection, Select, Statement, TableRef, Update, Value,
    },
};
use std::sync::Arc;
use tracing::warn;

/// A fluent description of one statement.
///
/// Builder methods never fail. The first problem they detect, such as an
/// empty `IN` list or a column the entity does not declare, is stored and
/// returned by every compile or terminal call before any SQL is produced.
///
/// ```
/// use quarry::{Direction, Query};
///
/// let sql = Query::select(["id", "name"])
///     .from("users")
///     .eq("active", 1)
///     .order_by("id", Direction::Desc)
///     .limit(5)
///     .to_sql()
///     .unwrap();
///
/// assert_eq!(
///     sql.sql,
///     "SELECT `id`, `name` FROM `users` WHERE (`users`.`active` = :p1) ORDER BY `users`.`id` DESC LIMIT 5"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    kind: Kind,
    schema: Option<String>,
    entity: Option<Arc<Entity>>,
    source: Option<TableRef>,

    /// `None` selects the entity's visible columns, or `*` without an entity
    projection: Option<Projection>,

    joins: Vec<Join>,
    filter: Filter,
    group_by: Vec<ColumnRef>,
    having: Filter,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
    pagination: Option<Pagination>,
    cursor_column: Option<String>,

    /// Insert rows. The first row doubles as the `SET` list of an update.
    rows: Vec<IndexMap<String, Value>>,

    allow_unconditional: bool,
    index_by: Option<String>,
    options: ExecOptions,
    error: Option<Error>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Kind {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
}

impl Query {
    /// A select with no table yet. Call [`Query::from`].
    pub fn new() -> Query {
        Query::default()
    }

    /// Selects `columns`, rendered as written.
    pub fn select<I, C>(columns: I) -> Query
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnRef>,
    {
        Query {
            projection: Some(Projection::Columns(
                columns.into_iter().map(Into::into).collect(),
            )),
            ..Query::default()
        }
    }

    /// Selects `*`, even for an entity query.
    pub fn select_all() -> Query {
        Query {
            projection: Some(Projection::All),
            ..Query::default()
        }
    }

    /// A select over an entity's table. Unless overridden, it projects the
    /// entity's visible columns, runs on the entity's schema, pages by the
    /// primary key and keys collections by the primary key.
    pub fn entity(entity: &Arc<Entity>) -> Query {
        Query {
            entity: Some(entity.clone()),
            source: Some(TableRef::new(&entity.table)),
            ..Query::default()
        }
    }

    pub fn insert_into(table: impl Into<String>) -> Query {
        Query {
            kind: Kind::Insert,
            source: Some(TableRef::new(table)),
            ..Query::default()
        }
    }

    pub fn update_table(table: impl Into<String>) -> Query {
        Query {
            kind: Kind::Update,
            source: Some(TableRef::new(table)),
            ..Query::default()
        }
    }

    pub fn delete_from(table: impl Into<String>) -> Query {
        Query {
            kind: Kind::Delete,
            source: Some(TableRef::new(table)),
            ..Query::default()
        }
    }

    pub fn from(mut self, table: impl Into<String>) -> Query {
        self.source = Some(TableRef::new(table));
        self
    }

    pub fn from_as(mut self, table: impl Into<String>, alias: impl Into<String>) -> Query {
        self.source = Some(TableRef::aliased(table, alias));
        self
    }

    /// Target table of an insert.
    pub fn into_table(self, table: impl Into<String>) -> Query {
        self.from(table)
    }

    /// Aliases the current table.
    pub fn alias(mut self, alias: impl Into<String>) -> Query {
        match self.source.take() {
            Some(source) => self.source = Some(TableRef::aliased(source.name, alias)),
            None => self.fail(Error::validation("cannot alias a query with no table")),
        }
        self
    }

    /// Runs the query on the named connection schema.
    pub fn schema(mut self, name: impl Into<String>) -> Query {
        self.schema = Some(name.into());
        self
    }

    /// Maps rows onto `entity` without changing the table or projection.
    pub fn with_entity(mut self, entity: &Arc<Entity>) -> Query {
        if self.source.is_none() {
            self.source = Some(TableRef::new(&entity.table));
        }
        self.entity = Some(entity.clone());
        self
    }

    pub fn filter(mut self, condition: Condition) -> Query {
        self.check_condition(&condition);
        self.filter.push(condition);
        self
    }

    pub fn eq(self, column: impl Into<ColumnRef>, value: impl Into<Value>) -> Query {
        self.filter(Condition::eq(column, value))
    }

    pub fn ne(self, column: impl Into<ColumnRef>, value: impl Into<Value>) -> Query {
        self.filter(Condition::ne(column, value))
    }

    pub fn lt(self, column: impl Into<ColumnRef>, value: impl Into<Value>) -> Query {
        self.filter(Condition::lt(column, value))
    }

    pub fn le(self, column: impl Into<ColumnRef>, value: impl Into<Value>) -> Query {
        self.filter(Condition::le(column, value))
    }

    pub fn gt(self, column: impl Into<ColumnRef>, value: impl Into<Value>) -> Query {
        self.filter(Condition::gt(column, value))
    }

    pub fn ge(self, column: impl Into<ColumnRef>, value: impl Into<Value>) -> Query {
        self.filter(Condition::ge(column, value))
    }

    pub fn like(self, column: impl Into<ColumnRef>, pattern: impl Into<Value>) -> Query {
        self.filter(Condition::like(column, pattern))
    }

    pub fn not_like(self, column: impl Into<ColumnRef>, pattern: impl Into<Value>) -> Query {
        self.filter(Condition::not_like(column, pattern))
    }

    pub fn is_in<V: Into<Value>>(
        self,
        column: impl Into<ColumnRef>,
        values: impl IntoIterator<Item = V>,
    ) -> Query {
        self.filter(Condition::in_list(column, values))
    }

    pub fn not_in<V: Into<Value>>(
        self,
        column: impl Into<ColumnRef>,
        values: impl IntoIterator<Item = V>,
    ) -> Query {
        self.filter(Condition::not_in(column, values))
    }

    pub fn between(
        self,
        column: impl Into<ColumnRef>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Query {
        self.filter(Condition::between(column, low, high))
    }

    pub fn not_between(
        self,
        column: impl Into<ColumnRef>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Query {
        self.filter(Condition::not_between(column, low, high))
    }

    pub fn is_null(self, column: impl Into<ColumnRef>) -> Query {
        self.filter(Condition::is_null(column))
    }

    pub fn is_not_null(self, column: impl Into<ColumnRef>) -> Query {
        self.filter(Condition::is_not_null(column))
    }

    /// Adds the negation of `condition`.
    pub fn not(self, condition: Condition) -> Query {
        self.filter(condition.not())
    }

    /// Adds free-form SQL. See [`Condition::raw`].
    pub fn raw<K, V>(self, sql: impl Into<String>, params: impl IntoIterator<Item = (K, V)>) -> Query
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.filter(Condition::raw(sql, params))
    }

    /// Compares `column` against `literal` spliced into the SQL unescaped.
    /// Only for text produced by trusted code.
    pub fn unsafe_condition(
        self,
        column: impl Into<ColumnRef>,
        op: Op,
        literal: impl Into<String>,
    ) -> Query {
        self.filter(Condition::unsafe_literal(column, op, literal))
    }

    /// Starts a new OR group.
    pub fn or(mut self) -> Query {
        self.filter.or();
        self
    }

    /// Joins `table` under `alias` (empty for none) on a SQL condition.
    pub fn join(
        mut self,
        kind: JoinKind,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Query {
        let alias = alias.into();
        self.joins.push(Join {
            kind,
            table: table.into(),
            alias: (!alias.is_empty()).then_some(alias),
            on: on.into(),
        });
        self
    }

    pub fn inner_join(
        self,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Query {
        self.join(JoinKind::Inner, table, alias, on)
    }

    pub fn left_join(
        self,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Query {
        self.join(JoinKind::Left, table, alias, on)
    }

    pub fn group_by(mut self, column: impl Into<ColumnRef>) -> Query {
        let column = column.into();
        self.check_column(&column);
        self.group_by.push(column);
        self
    }

    /// Adds a condition on grouped rows. Columns are rendered unqualified
    /// so aggregates can be referenced by their alias.
    pub fn having(mut self, condition: Condition) -> Query {
        self.check_in_list(&condition);
        self.having.push(condition);
        self
    }

    pub fn order_by(mut self, column: impl Into<ColumnRef>, direction: Direction) -> Query {
        let column = column.into();
        self.check_column(&column);
        self.order_by.push(OrderBy::new(column, direction));
        self
    }

    pub fn limit(mut self, limit: u64) -> Query {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Query {
        self.offset = Some(offset);
        self
    }

    /// Pages by offset. `page` is zero based. Replaces any limit, offset or
    /// previous pagination.
    pub fn paginate(mut self, page: u64, page_size: u64) -> Query {
        self.pagination = Some(Pagination::Offset { page, page_size });
        self
    }

    /// Pages by keyset: the `page_size` rows after (`Next`) or before
    /// (`Prev`) `last_id` on the cursor column, returned in ascending
    /// cursor order unless a business ordering is set.
    pub fn paginate_by_id(
        mut self,
        last_id: impl Into<Value>,
        direction: CursorDirection,
        page_size: u64,
    ) -> Query {
        self.pagination = Some(Pagination::ByCursor {
            last_id: last_id.into(),
            direction,
            page_size,
            // resolved when the statement is built
            column: String::new(),
        });
        self
    }

    /// Column keyset pagination runs on. Defaults to the entity's primary
    /// key, or `id`.
    pub fn cursor_column(mut self, column: impl Into<String>) -> Query {
        self.cursor_column = Some(column.into());
        self
    }

    /// Assigns values for an insert or update, merged into the first row.
    pub fn set<K, V>(mut self, values: impl IntoIterator<Item = (K, V)>) -> Query
    where
        K: Into<String>,
        V: Into<Value>,
    {
        if self.rows.is_empty() {
            self.rows.push(IndexMap::new());
        }

        for (column, value) in values {
            let column = column.into();
            self.check_column(&ColumnRef::new(&column));
            self.rows[0].insert(column, value.into());
        }
        self
    }

    /// Assigns one value. See [`Query::set`].
    pub fn value(self, column: impl Into<String>, value: impl Into<Value>) -> Query {
        self.set([(column.into(), value.into())])
    }

    /// Adds another row to a multi-row insert.
    pub fn row<K, V>(mut self, values: impl IntoIterator<Item = (K, V)>) -> Query
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut row = IndexMap::new();
        for (column, value) in values {
            let column = column.into();
            self.check_column(&ColumnRef::new(&column));
            row.insert(column, value.into());
        }
        self.rows.push(row);
        self
    }

    /// Column [`Query::all`] keys its collection by.
    pub fn index_by(mut self, column: impl Into<String>) -> Query {
        self.index_by = Some(column.into());
        self
    }

    /// Permits an update or delete with no condition to affect every row.
    pub fn allow_unconditional(mut self) -> Query {
        self.allow_unconditional = true;
        self
    }

    /// Inline bound values into the SQL text before dispatch.
    pub fn emulate_params(mut self) -> Query {
        self.options.emulate_params = true;
        self
    }

    /// The statement this query describes.
    pub fn to_statement(&self) -> Result<Statement> {
        Ok(match self.kind {
            Kind::Select => self.select_stmt()?.into(),
            Kind::Insert => self.insert_stmt()?.into(),
            Kind::Update => self.update_stmt()?.into(),
            Kind::Delete => self.delete_stmt()?.into(),
        })
    }

    /// Compiled SQL and bound parameters, without executing.
    pub fn to_sql(&self) -> Result<QuerySql> {
        quarry_sql::compile(&self.to_statement()?)
    }

    /// Compiled SQL with every parameter inlined as a literal.
    pub fn to_debug_sql(&self) -> Result<String> {
        quarry_sql::compile_debug(&self.to_statement()?)
    }

    /// Executes the statement and returns the raw result.
    pub async fn fetch<E: Executor + ?Sized>(&self, exec: &E) -> Result<ResultSet> {
        let stmt = self.to_statement()?;
        self.dispatch(&stmt, exec).await
    }

    /// Every row of a select, untyped.
    pub async fn rows<E: Executor + ?Sized>(&self, exec: &E) -> Result<Vec<Row>> {
        let stmt = self.select_stmt()?;
        Ok(self.dispatch(&stmt.into(), exec).await?.all())
    }

    /// The first row of a select, untyped.
    pub async fn first_row<E: Executor + ?Sized>(&self, exec: &E) -> Result<Option<Row>> {
        let stmt = self.select_one()?;
        Ok(self.dispatch(&stmt.into(), exec).await?.one())
    }

    /// Every row of a select as entity records, keyed by the index column.
    pub async fn all<E: Executor + ?Sized>(&self, exec: &E) -> Result<Collection> {
        let entity = self.expect_entity("all")?;
        let stmt = self.select_stmt()?;
        let result = self.dispatch(&stmt.into(), exec).await?;

        let index = self.index_by.as_deref().unwrap_or(&entity.primary_key);
        if !result.columns().iter().any(|column| column == index) {
            return Err(Error::missing_index_column(index));
        }

        let records = result
            .all()
            .into_iter()
            .map(|row| Record::init(entity, row));
        Collection::from_records(records, index)
    }

    /// The first matching record.
    pub async fn one<E: Executor + ?Sized>(&self, exec: &E) -> Result<Option<Record>> {
        let entity = self.expect_entity("one")?;
        let stmt = self.select_one()?;
        let result = self.dispatch(&stmt.into(), exec).await?;
        Ok(result.one().map(|row| Record::init(entity, row)))
    }

    /// The first matching record, or a record-not-found error.
    pub async fn first_or_fail<E: Executor + ?Sized>(&self, exec: &E) -> Result<Record> {
        match self.one(exec).await? {
            Some(record) => Ok(record),
            None => Err(Error::record_not_found(format!(
                "table={}",
                self.source()?.name
            ))),
        }
    }

    pub async fn count<E: Executor + ?Sized>(&self, exec: &E) -> Result<u64> {
        let stmt = self.select_stmt()?.into_count();
        let value = self
            .dispatch(&stmt.into(), exec)
            .await?
            .scalar()
            .unwrap_or_default();

        match value {
            Value::Null => Ok(0),
            value => Ok(value.to::<u64>()?),
        }
    }

    pub async fn exists<E: Executor + ?Sized>(&self, exec: &E) -> Result<bool> {
        let stmt = self.select_stmt()?.into_exists();
        Ok(!self.dispatch(&stmt.into(), exec).await?.is_empty())
    }

    /// Largest value of `column`, or `Null` when no row matches.
    pub async fn max<E: Executor + ?Sized>(
        &self,
        column: impl Into<ColumnRef>,
        exec: &E,
    ) -> Result<Value> {
        let column = column.into();
        self.aggregate(Projection::Max(column), exec).await
    }

    /// Smallest value of `column`, or `Null` when no row matches.
    pub async fn min<E: Executor + ?Sized>(
        &self,
        column: impl Into<ColumnRef>,
        exec: &E,
    ) -> Result<Value> {
        let column = column.into();
        self.aggregate(Projection::Min(column), exec).await
    }

    /// Inserts the rows. The result carries the affected row count and the
    /// id assigned to the last inserted row.
    pub async fn insert<E: Executor + ?Sized>(&self, exec: &E) -> Result<ResultSet> {
        let stmt = self.insert_stmt()?;
        self.dispatch(&stmt.into(), exec).await
    }

    /// Updates matching rows, returning how many were affected.
    pub async fn update<E: Executor + ?Sized>(&self, exec: &E) -> Result<u64> {
        let stmt = self.update_stmt()?;
        if stmt.filter.is_empty() {
            warn!(table = %stmt.source.name, "updating every row");
        }
        Ok(self.dispatch(&stmt.into(), exec).await?.row_count())
    }

    /// Deletes matching rows, returning how many were affected.
    pub async fn delete<E: Executor + ?Sized>(&self, exec: &E) -> Result<u64> {
        let stmt = self.delete_stmt()?;
        if stmt.filter.is_empty() {
            warn!(table = %stmt.source.name, "deleting every row");
        }
        Ok(self.dispatch(&stmt.into(), exec).await?.row_count())
    }

    async fn aggregate<E: Executor + ?Sized>(
        &self,
        projection: Projection,
        exec: &E,
    ) -> Result<Value> {
        if let Projection::Max(column) | Projection::Min(column) = &projection {
            self.known_column(column)?;
        }

        let mut stmt = self.select_stmt()?.into_count();
        stmt.projection = projection;

        Ok(self
            .dispatch(&stmt.into(), exec)
            .await?
            .scalar()
            .unwrap_or_default())
    }

    async fn dispatch<E: Executor + ?Sized>(&self, stmt: &Statement, exec: &E) -> Result<ResultSet> {
        let query = quarry_sql::compile(stmt)?;
        exec.execute(self.schema_name(), query, self.options).await
    }

    fn schema_name(&self) -> &str {
        match (&self.schema, &self.entity) {
            (Some(schema), _) => schema,
            (None, Some(entity)) => &entity.schema,
            (None, None) => Entity::DEFAULT_SCHEMA,
        }
    }

    fn expect_entity(&self, op: &str) -> Result<&Arc<Entity>> {
        self.entity.as_ref().ok_or_else(|| {
            Error::invalid_state(format!(
                "`{op}()` maps rows onto an entity; use `rows()` for untyped results"
            ))
        })
    }

    fn source(&self) -> Result<TableRef> {
        self.source
            .clone()
            .ok_or_else(|| Error::validation("query has no table; call `from()`"))
    }

    /// Returns the first recorded builder error.
    fn check(&self) -> Result<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn select_stmt(&self) -> Result<Select> {
        self.check()?;

        let source = self.source()?;
        let mut stmt = Select::new(source.clone());

        stmt.projection = match (&self.projection, &self.entity) {
            (Some(projection), _) => projection.clone(),
            (None, Some(entity)) if !entity.columns.is_empty() => Projection::Columns(
                entity
                    .visible_columns()
                    .map(|column| ColumnRef::qualified(source.qualifier(), &column.name))
                    .collect(),
            ),
            (None, _) => Projection::All,
        };

        stmt.joins = self.joins.clone();
        stmt.filter = self.filter.clone();
        stmt.group_by = self.group_by.clone();
        stmt.having = self.having.clone();
        stmt.order_by = self.order_by.clone();
        stmt.limit = self.limit;
        stmt.offset = self.offset;
        stmt.pagination = self.pagination.clone().map(|pagination| match pagination {
            Pagination::ByCursor {
                last_id,
                direction,
                page_size,
                ..
            } => Pagination::ByCursor {
                last_id,
                direction,
                page_size,
                column: self.cursor_column_name().to_string(),
            },
            offset => offset,
        });

        Ok(stmt)
    }

    fn select_one(&self) -> Result<Select> {
        let mut stmt = self.select_stmt()?;
        if stmt.limit.is_none() && stmt.pagination.is_none() {
            stmt.limit = Some(1);
        }
        Ok(stmt)
    }

    fn insert_stmt(&self) -> Result<Insert> {
        self.check()?;

        let mut stmt = Insert::new(self.source()?.name);
        stmt.rows = self.rows.clone();
        Ok(stmt)
    }

    fn update_stmt(&self) -> Result<Update> {
        self.check()?;

        let mut stmt = Update::new(self.source()?);
        stmt.assignments = self.rows.first().cloned().unwrap_or_default();
        stmt.filter = self.filter.clone();
        stmt.limit = self.limit;
        stmt.offset = self.offset;
        stmt.allow_unconditional = self.allow_unconditional;
        Ok(stmt)
    }

    fn delete_stmt(&self) -> Result<Delete> {
        self.check()?;

        let mut stmt = Delete::new(TableRef::new(self.source()?.name));
        stmt.filter = self.filter.clone();
        stmt.limit = self.limit;
        stmt.offset = self.offset;
        stmt.allow_unconditional = self.allow_unconditional;
        Ok(stmt)
    }

    fn cursor_column_name(&self) -> &str {
        match (&self.cursor_column, &self.entity) {
            (Some(column), _) => column,
            (None, Some(entity)) => &entity.primary_key,
            (None, None) => "id",
        }
    }

    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn check_condition(&mut self, condition: &Condition) {
        self.check_in_list(condition);

        if let Some(cmp) = condition.as_comparison() {
            self.check_column(&cmp.column);
        }
    }

    fn check_in_list(&mut self, condition: &Condition) {
        let Some(cmp) = condition.as_comparison() else {
            return;
        };

        if cmp.op.is_in_list() && cmp.value.as_list().is_some_and(<[Value]>::is_empty) {
            self.fail(Error::empty_in_list(cmp.column.to_string()));
        }
    }

    fn check_column(&mut self, column: &ColumnRef) {
        if let Err(err) = self.known_column(column) {
            self.fail(err);
        }
    }

    /// Columns of the query's own table must be declared by the entity.
    /// Columns of joined tables are not checked.
    fn known_column(&self, column: &ColumnRef) -> Result<()> {
        let Some(entity) = &self.entity else {
            return Ok(());
        };

        if entity.columns.is_empty() || column.name == "*" {
            return Ok(());
        }

        let own_table = match (&column.qualifier, &self.source) {
            (None, _) => true,
            (Some(qualifier), Some(source)) => {
                qualifier == source.qualifier() || *qualifier == source.name
            }
            (Some(_), None) => false,
        };

        if own_table {
            entity.expect_column(&column.name)?;
        }

        Ok(())
    }
}
