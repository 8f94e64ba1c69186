mod builder;
mod connect;
mod pool;

pub use builder::Builder;
pub use connect::*;
pub use pool::*;

use crate::{
    access::{self, Authorize, Permission},
    engine, CascadeResult, CountResult, Error, PrimaryKeyChange, QueryResult, ReferenceImpact,
    Result, Snapshot,
};

use indexmap::IndexMap;
use quarry_core::{request::ConditionSpec, stmt::Value, QueryRequest, Schema};

use std::sync::Arc;

/// Shared state between all `Db` clones.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) pool: Pool,
}

/// A handle to a database. Cloning is cheap and every clone shares the
/// connection pool.
///
/// Every operation takes the caller's authorization first and checks it
/// before touching storage. Each operation checks out one connection, reads
/// the live schema on it, and runs on it.
#[derive(Debug, Clone)]
pub struct Db {
    pub(crate) shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Connects with the default pool configuration.
    pub async fn connect(url: &str) -> Result<Db> {
        Db::builder().connect(url).await
    }

    /// Describes every base table of the database.
    pub async fn describe_schema(&self, caller: impl Authorize) -> Result<Schema> {
        access::require(&caller, Permission::Read)?;

        let mut connection = self.shared.pool.get().await?;
        connection.describe_schema().await
    }

    /// Validates, compiles and executes a query request.
    pub async fn run_query(&self, caller: impl Authorize, request: QueryRequest) -> Result<QueryResult> {
        let permission = if request.is_read() {
            Permission::Read
        } else {
            Permission::Write
        };
        access::require(&caller, permission)?;

        engine::validate(&request)?;

        let mut connection = self.shared.pool.get().await?;
        let schema = connection.describe_schema().await?;
        let plan = engine::compile(&request, &schema, self.shared.pool.capability())?;

        tracing::debug!(
            operation = request.operation(),
            table = request.table(),
            "running query"
        );

        engine::exec(connection, &schema, plan).await
    }

    /// Counts the rows of `table` matching every condition. At least one
    /// condition is required.
    pub async fn count_matching(
        &self,
        caller: impl Authorize,
        table: &str,
        conditions: &[ConditionSpec],
    ) -> Result<CountResult> {
        access::require(&caller, Permission::Read)?;

        if conditions.is_empty() {
            return Err(Error::missing_conditions("COUNT"));
        }

        let mut connection = self.shared.pool.get().await?;
        let schema = connection.describe_schema().await?;
        let select = engine::compile_count(table, conditions, &schema)?;
        let count = engine::count(&mut **connection, select).await?;
        Ok(CountResult { count })
    }

    /// Reports the rows that reference the row of `table` keyed by `from`,
    /// i.e. the rows a change of its primary key would have to rewrite.
    /// `from` must hold the complete primary key.
    pub async fn preview_primary_key_change(
        &self,
        caller: impl Authorize,
        table: &str,
        from: &IndexMap<String, Value>,
    ) -> Result<Vec<ReferenceImpact>> {
        access::require(&caller, Permission::Read)?;

        let mut connection = self.shared.pool.get().await?;
        let schema = connection.describe_schema().await?;

        let table = schema.expect_table(table)?;
        let key: IndexMap<String, Value> = engine::validate_key(table, from)?
            .into_iter()
            .map(|(column, value)| (column.to_string(), value.clone()))
            .collect();

        engine::plan_primary_key_change(&mut **connection, &schema, table, &key).await
    }

    /// Moves a row to a new primary key, rewriting every reference to it in
    /// the same transaction. Refused unless `change.update_references` is
    /// set.
    pub async fn run_cascade(
        &self,
        caller: impl Authorize,
        change: PrimaryKeyChange,
    ) -> Result<CascadeResult> {
        access::require(&caller, Permission::Write)?;

        let mut connection = self.shared.pool.get().await?;
        let schema = connection.describe_schema().await?;

        engine::run_cascade(connection, &schema, &change).await
    }

    /// Copies the rows of `tables`, or of every table when `None`.
    pub async fn snapshot(
        &self,
        caller: impl Authorize,
        tables: Option<&[String]>,
    ) -> Result<Snapshot> {
        access::require(&caller, Permission::Admin)?;

        let mut connection = self.shared.pool.get().await?;
        let schema = connection.describe_schema().await?;

        engine::snapshot(&mut **connection, &schema, tables).await
    }

    /// Replaces the contents of the snapshot's tables with the snapshot rows,
    /// atomically. Returns the number of rows restored.
    pub async fn restore(&self, caller: impl Authorize, snapshot: Snapshot) -> Result<u64> {
        access::require(&caller, Permission::Admin)?;

        let mut connection = self.shared.pool.get().await?;
        let schema = connection.describe_schema().await?;

        engine::restore(connection, &schema, &snapshot).await
    }
}
