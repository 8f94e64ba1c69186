//! Reference-integrity guard.
//!
//! Before a delete or a primary key change, counts the rows of every table
//! (the target table included) whose foreign keys point at the affected
//! rows. A composite foreign key is matched on all of its columns at once.
//! Counting never writes.

use super::exec;
use crate::{Error, Result};

use indexmap::IndexMap;
use quarry_core::{
    driver::Connection,
    schema::{ForeignKey, ReferenceImpact, TableSchema},
    stmt::{self, Expr, ExprColumn, Returning, Select, Source, Value},
    Schema,
};

/// Rows of `referencing` that point at the guarded rows through
/// `foreign_key`.
#[derive(Debug)]
pub(crate) struct Reference<'a> {
    pub(crate) referencing: &'a TableSchema,
    pub(crate) foreign_key: ForeignKey<'a>,

    /// Selects exactly the referencing rows that were counted
    pub(crate) filter: Expr,
    pub(crate) count: u64,
}

impl Reference<'_> {
    pub(crate) fn impact(&self, affected_row_count: u64) -> ReferenceImpact {
        ReferenceImpact {
            referencing_table: self.referencing.name.clone(),
            referencing_column: self.foreign_key.label(),
            affected_row_count,
        }
    }
}

/// References to the rows `delete` would remove.
///
/// Each incoming foreign key is checked with one query: referencing rows
/// whose key tuple is among the key tuples selected by the delete's filter.
pub(crate) async fn plan_delete(
    connection: &mut dyn Connection,
    schema: &Schema,
    delete: &stmt::Delete,
) -> Result<Vec<ReferenceImpact>> {
    let mut impacts = vec![];

    for (referencing, foreign_key) in schema.incoming_foreign_keys(&delete.table) {
        let targets = Select::new(
            Source::table(&delete.table),
            Returning::Columns(
                foreign_key
                    .to_columns()
                    .map(|column| ExprColumn::new(&delete.table, column))
                    .collect(),
            ),
        )
        .filter(delete.filter.clone());

        let referencing_key = Expr::record_from_vec(
            foreign_key
                .from_columns()
                .map(|column| Expr::column(&referencing.name, column))
                .collect(),
        );

        let filter = Expr::in_subquery(referencing_key, targets);
        let count = count_references(connection, referencing, &foreign_key, filter.clone()).await?;

        if let Some(reference) = found(referencing, foreign_key, filter, count) {
            impacts.push(reference.impact(count));
        }
    }

    Ok(impacts)
}

/// References to the row of `table` keyed by `key`, reported for a change
/// of every key column.
pub(crate) async fn plan_primary_key_change(
    connection: &mut dyn Connection,
    schema: &Schema,
    table: &TableSchema,
    key: &IndexMap<String, Value>,
) -> Result<Vec<ReferenceImpact>> {
    let references = find_references(connection, schema, table, key, |_| true).await?;

    Ok(references
        .iter()
        .map(|reference| reference.impact(reference.count))
        .collect())
}

/// Foreign keys into `table` that target at least one `changed` column,
/// with the rows that currently reference the row keyed by `key`.
///
/// `key` holds the complete primary key of the row. Referenced columns
/// outside the primary key are read from that row with a subquery.
pub(crate) async fn find_references<'a>(
    connection: &mut dyn Connection,
    schema: &'a Schema,
    table: &'a TableSchema,
    key: &IndexMap<String, Value>,
    changed: impl Fn(&str) -> bool,
) -> Result<Vec<Reference<'a>>> {
    let mut references = vec![];

    for (referencing, foreign_key) in schema.incoming_foreign_keys(&table.name) {
        if !foreign_key.to_columns().any(&changed) {
            continue;
        }

        let Some(filter) = Expr::and_from_vec(
            foreign_key
                .edges
                .iter()
                .map(|edge| {
                    let column = Expr::column(&referencing.name, &edge.from_column);

                    match key.get(&edge.to_column) {
                        Some(old) => Expr::eq(column, old.clone()),
                        None => Expr::in_subquery(column, key_row(table, &edge.to_column, key)),
                    }
                })
                .collect(),
        ) else {
            continue;
        };

        let count = count_references(connection, referencing, &foreign_key, filter.clone()).await?;
        references.extend(found(referencing, foreign_key, filter, count));
    }

    Ok(references)
}

/// `SELECT column FROM table WHERE <primary key> = key`
fn key_row(table: &TableSchema, column: &str, key: &IndexMap<String, Value>) -> Select {
    Select::new(
        Source::table(&table.name),
        Returning::Columns(vec![ExprColumn::new(&table.name, column)]),
    )
    .filter(Expr::and_from_vec(
        key.iter()
            .map(|(pk, value)| Expr::eq(Expr::column(&table.name, pk), value.clone()))
            .collect(),
    ))
}

async fn count_references(
    connection: &mut dyn Connection,
    referencing: &TableSchema,
    foreign_key: &ForeignKey<'_>,
    filter: Expr,
) -> Result<u64> {
    exec::count(connection, Select::count(&referencing.name, Some(filter)))
        .await
        .map_err(|err| {
            err.context(Error::cascade_computation(format!(
                "{}.{}",
                referencing.name,
                foreign_key.label()
            )))
        })
}

fn found<'a>(
    referencing: &'a TableSchema,
    foreign_key: ForeignKey<'a>,
    filter: Expr,
    count: u64,
) -> Option<Reference<'a>> {
    if count == 0 {
        return None;
    }

    tracing::debug!(
        table = %referencing.name,
        columns = %foreign_key.label(),
        count,
        "rows still referenced"
    );

    Some(Reference {
        referencing,
        foreign_key,
        filter,
        count,
    })
}
