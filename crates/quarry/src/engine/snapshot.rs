use super::exec;
use crate::{
    db::PoolConnection,
    snapshot::{Snapshot, TableSnapshot},
    transaction::Transaction,
    Error, QueryResult, Result,
};

use quarry_core::{
    driver::Connection,
    stmt::{Delete, ExprColumn, Insert, Returning, Select, Source, Statement},
    Schema,
};

/// Copies the contents of `tables` (every table when `None`), parents first.
pub(crate) async fn snapshot(
    connection: &mut dyn Connection,
    schema: &Schema,
    tables: Option<&[String]>,
) -> Result<Snapshot> {
    if let Some(tables) = tables {
        for name in tables {
            schema.expect_table(name)?;
        }
    }

    let mut snapshot = Snapshot::default();

    for table in schema.dependency_order() {
        if tables.is_some_and(|tables| !tables.contains(&table.name)) {
            continue;
        }

        let columns: Vec<String> = table.columns.keys().cloned().collect();

        let select = Select::new(
            Source::table(&table.name),
            Returning::Columns(
                columns
                    .iter()
                    .map(|column| ExprColumn::new(&table.name, column))
                    .collect(),
            ),
        )
        .order_by(
            table
                .primary_keys
                .iter()
                .map(|pk| ExprColumn::new(&table.name, pk))
                .collect(),
        );

        let rows = connection
            .exec(Statement::from(select).into())
            .await?
            .rows
            .into_values();

        tracing::debug!(table = %table.name, rows = rows.len(), "copied table");

        snapshot.tables.push(TableSnapshot {
            name: table.name.clone(),
            columns,
            rows,
        });
    }

    Ok(snapshot)
}

/// Replaces the contents of every table in `snapshot` with its rows.
///
/// The snapshot is checked against the live schema before anything is
/// written. Returns the number of rows inserted.
pub(crate) async fn restore(
    connection: PoolConnection,
    schema: &Schema,
    snapshot: &Snapshot,
) -> Result<u64> {
    for table_snapshot in &snapshot.tables {
        let table = schema.expect_table(&table_snapshot.name)?;

        for column in &table_snapshot.columns {
            if table.column(column).is_none() {
                return Err(Error::unknown_column(&table.name, column));
            }
        }

        for (index, row) in table_snapshot.rows.iter().enumerate() {
            if row.len() != table_snapshot.columns.len() {
                return Err(crate::err!(
                    "row {index} of `{}` has {} values; expected {}",
                    table.name,
                    row.len(),
                    table_snapshot.columns.len()
                ));
            }
        }
    }

    let mut tx = Transaction::begin(connection).await?;

    match replace(&mut tx, snapshot).await {
        Ok(inserted) => {
            tx.commit().await?;
            tracing::info!(
                tables = snapshot.tables.len(),
                rows = inserted,
                "restored snapshot"
            );
            Ok(inserted)
        }
        Err(err) => tx.abort(err).await,
    }
}

async fn replace(tx: &mut Transaction, snapshot: &Snapshot) -> Result<u64> {
    tx.defer_foreign_keys().await?;

    // Children first
    for table in snapshot.tables.iter().rev() {
        let delete = Delete {
            table: table.name.clone(),
            filter: None,
        };

        let deleted = tx
            .connection()
            .exec(Statement::from(delete).into())
            .await?
            .rows
            .into_count();

        tracing::info!(table = %table.name, rows = deleted, "cleared table");
    }

    let mut inserted = 0;

    for table in &snapshot.tables {
        for row in &table.rows {
            let insert = Insert {
                table: table.name.clone(),
                columns: table.columns.clone(),
                values: row.clone(),
            };

            let plan = super::ExecutionPlan::new(insert);

            if let QueryResult::Affected { rows_affected, .. } =
                exec::exec_plan(tx.connection(), plan).await?
            {
                inserted += rows_affected;
            }
        }

        tracing::info!(table = %table.name, rows = table.rows.len(), "restored table");
    }

    Ok(inserted)
}
