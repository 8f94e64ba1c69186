mod cascade;
pub(crate) use cascade::{run_cascade, validate_key};

mod compile;
pub use compile::compile;
pub(crate) use compile::compile_count;

mod exec;
pub(crate) use exec::count;

mod guard;
pub(crate) use guard::plan_primary_key_change;

mod plan;
pub use plan::ExecutionPlan;

mod snapshot;
pub(crate) use snapshot::{restore, snapshot};

use crate::{db::PoolConnection, transaction::Transaction, Error, QueryResult, Result};

use quarry_core::{
    request::{Fields, QueryRequest},
    stmt::Statement,
    Schema,
};

/// Shape checks that need no schema. Failing requests never reach storage.
pub(crate) fn validate(request: &QueryRequest) -> Result<()> {
    match request {
        QueryRequest::Select(select) => match &select.fields {
            Fields::List(fields) if fields.is_empty() => {
                Err(Error::no_fields_selected(&select.table))
            }
            _ => Ok(()),
        },
        QueryRequest::Insert(_) => Ok(()),
        QueryRequest::Update(update) if update.conditions.is_empty() => {
            Err(Error::missing_conditions("UPDATE"))
        }
        QueryRequest::Delete(delete) if delete.conditions.is_empty() => {
            Err(Error::missing_conditions("DELETE"))
        }
        QueryRequest::Update(_) | QueryRequest::Delete(_) => Ok(()),
    }
}

/// Executes a compiled plan. Deletes are checked by the reference-integrity
/// guard first, in the same transaction as the delete.
pub(crate) async fn exec(
    mut connection: PoolConnection,
    schema: &Schema,
    plan: ExecutionPlan,
) -> Result<QueryResult> {
    if !matches!(plan.statement, Statement::Delete(_)) {
        return exec::exec_plan(&mut **connection, plan).await;
    }

    let mut tx = Transaction::begin(connection).await?;

    match guarded_delete(&mut tx, schema, plan).await {
        Ok(result) => {
            tx.commit().await?;
            Ok(result)
        }
        Err(err) => tx.abort(err).await,
    }
}

async fn guarded_delete(
    tx: &mut Transaction,
    schema: &Schema,
    plan: ExecutionPlan,
) -> Result<QueryResult> {
    let Statement::Delete(delete) = &plan.statement else {
        unreachable!("plan={plan:#?}")
    };

    let impacts = guard::plan_delete(tx.connection(), schema, delete).await?;

    if !impacts.is_empty() {
        tracing::info!(table = %delete.table, references = impacts.len(), "delete refused");
        return Err(Error::referential_conflict_with_impacts(&delete.table, impacts));
    }

    exec::exec_plan(tx.connection(), plan).await
}
