use super::ExecutionPlan;
use crate::{QueryResult, Result};

use quarry_core::{
    driver::{Connection, Rows},
    stmt::{Row, Select, Statement, Value},
};

/// Runs a compiled plan on `connection`.
pub(crate) async fn exec_plan(
    connection: &mut dyn Connection,
    plan: ExecutionPlan,
) -> Result<QueryResult> {
    let ExecutionPlan {
        statement,
        output,
        generated_key,
        ..
    } = plan;

    let response = connection.exec(statement.into()).await?;

    Ok(match response.rows {
        Rows::Values(values) => QueryResult::Rows(
            values
                .into_iter()
                .map(|values| output.iter().cloned().zip(values).collect::<Row>())
                .collect(),
        ),
        Rows::Count(rows_affected) => QueryResult::Affected {
            rows_affected,
            generated_key: generated_key.and(response.last_insert_id).map(Value::I64),
        },
    })
}

/// Runs a `COUNT(*)` query and returns the count.
pub(crate) async fn count(connection: &mut dyn Connection, select: Select) -> Result<u64> {
    let rows = connection
        .exec(Statement::from(select).into())
        .await?
        .rows
        .into_values();

    match rows.first().and_then(|row| row.first()) {
        Some(Value::I64(count)) if *count >= 0 => Ok(*count as u64),
        other => Err(crate::err!("expected a row count; got {other:?}")),
    }
}
