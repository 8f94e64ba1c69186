use super::guard;
use crate::{
    db::PoolConnection, transaction::Transaction, CascadeResult, Error, PrimaryKeyChange, Result,
};

use indexmap::IndexMap;
use quarry_core::{
    schema::TableSchema,
    stmt::{Assignment, Expr, Statement, Update, Value},
    Schema,
};

/// A key column whose value changes.
#[derive(Debug)]
struct KeyUpdate<'a> {
    column: &'a str,
    to: &'a Value,
}

/// Checks that `from` names a single row by its complete primary key. Keys
/// are returned in primary key order.
pub(crate) fn validate_key<'a>(
    table: &'a TableSchema,
    from: &'a IndexMap<String, Value>,
) -> Result<Vec<(&'a str, &'a Value)>> {
    check_key_columns(table, from)?;

    table
        .primary_keys
        .iter()
        .map(|pk| match from.get(pk) {
            Some(value) => Ok((pk.as_str(), value)),
            None => Err(Error::invalid_condition(format!(
                "key of `{}` is missing primary key column `{pk}`",
                table.name
            ))),
        })
        .collect()
}

/// Every entry names a primary key column of `table` and holds a non-null
/// value.
pub(crate) fn check_key_columns(
    table: &TableSchema,
    values: &IndexMap<String, Value>,
) -> Result<()> {
    for (column, value) in values {
        if table.column(column).is_none() {
            return Err(Error::unknown_column(&table.name, column));
        }

        if !table.is_primary_key(column) {
            return Err(Error::invalid_condition(format!(
                "`{column}` is not a primary key column of `{}`",
                table.name
            )));
        }

        if value.is_null() {
            return Err(Error::invalid_condition(format!(
                "primary key column `{column}` cannot be null"
            )));
        }
    }

    Ok(())
}

/// Moves a row to a new primary key, rewriting every reference to it first.
///
/// Runs in one transaction with foreign key enforcement deferred. Either
/// every statement commits or none does.
pub(crate) async fn run_cascade(
    connection: PoolConnection,
    schema: &Schema,
    change: &PrimaryKeyChange,
) -> Result<CascadeResult> {
    let table = schema.expect_table(&change.table)?;
    let key = validate_key(table, &change.from)?;
    check_key_columns(table, &change.to)?;

    let updates: Vec<_> = change
        .to
        .iter()
        .filter_map(|(column, to)| {
            let from = change.from.get(column)?;
            (from != to).then_some(KeyUpdate {
                column: column.as_str(),
                to,
            })
        })
        .collect();

    if updates.is_empty() {
        return Err(Error::empty_update(&table.name));
    }

    if !change.update_references {
        return Err(Error::primary_key_update_refused(
            &table.name,
            updates.iter().map(|update| update.column),
        ));
    }

    let mut tx = Transaction::begin(connection).await?;

    match cascade(&mut tx, schema, table, &key, &updates).await {
        Ok(result) => {
            tx.commit().await?;
            tracing::info!(
                table = %table.name,
                references = result.references.len(),
                "primary key change committed"
            );
            Ok(result)
        }
        Err(err) => tx.abort(err).await,
    }
}

async fn cascade(
    tx: &mut Transaction,
    schema: &Schema,
    table: &TableSchema,
    key: &[(&str, &Value)],
    updates: &[KeyUpdate<'_>],
) -> Result<CascadeResult> {
    let old: IndexMap<String, Value> = key
        .iter()
        .map(|(column, value)| (column.to_string(), (*value).clone()))
        .collect();

    let found = guard::find_references(tx.connection(), schema, table, &old, |column| {
        updates.iter().any(|update| update.column == column)
    })
    .await?;

    tx.defer_foreign_keys().await?;

    let mut references = Vec::with_capacity(found.len());

    for reference in &found {
        // Only the referencing columns whose target changes are rewritten;
        // the filter still matches on every column of the foreign key.
        let assignments: Vec<_> = reference
            .foreign_key
            .edges
            .iter()
            .filter_map(|edge| {
                let update = updates.iter().find(|update| update.column == edge.to_column)?;
                Some(Assignment::new(&edge.from_column, update.to.clone()))
            })
            .collect();

        let stmt = Update {
            table: reference.referencing.name.clone(),
            assignments,
            filter: Some(reference.filter.clone()),
        };

        let count = tx
            .connection()
            .exec(Statement::from(stmt).into())
            .await?
            .rows
            .into_count();

        tracing::info!(
            table = %reference.referencing.name,
            columns = %reference.foreign_key.label(),
            rows = count,
            "rewrote references"
        );

        references.push(reference.impact(count));
    }

    let stmt = Update {
        table: table.name.clone(),
        assignments: updates
            .iter()
            .map(|update| Assignment::new(update.column, update.to.clone()))
            .collect(),
        filter: Expr::and_from_vec(
            key.iter()
                .map(|(column, value)| Expr::eq(Expr::column(&table.name, *column), (*value).clone()))
                .collect(),
        ),
    };

    let rows_affected = tx
        .connection()
        .exec(Statement::from(stmt).into())
        .await?
        .rows
        .into_count();

    if rows_affected == 0 {
        return Err(Error::record_not_found(format!(
            "no `{}` row with the given key",
            table.name
        )));
    }

    tracing::info!(table = %table.name, rows = rows_affected, "updated primary key");

    Ok(CascadeResult {
        rows_affected,
        references,
    })
}
