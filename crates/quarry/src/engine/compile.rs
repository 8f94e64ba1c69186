use super::ExecutionPlan;
use crate::{Error, Result};

use quarry_core::{
    driver::Capability,
    request::{self, ConditionSpec, Fields, JoinSpec, JoinType, Operator},
    schema::TableSchema,
    stmt::{self, Expr, ExprColumn, JoinOp, Returning, Source, Value},
    QueryRequest, Schema,
};

/// Validates `request` against the live schema and turns it into a typed
/// statement.
///
/// Nothing is executed here. Every client-input error is raised before a
/// statement exists.
pub fn compile(
    request: &QueryRequest,
    schema: &Schema,
    capability: &Capability,
) -> Result<ExecutionPlan> {
    let plan = match request {
        QueryRequest::Select(select) => compile_select(select, schema, capability)?,
        QueryRequest::Insert(insert) => compile_insert(insert, schema)?,
        QueryRequest::Update(update) => compile_update(update, schema)?,
        QueryRequest::Delete(delete) => compile_delete(delete, schema)?,
    };

    tracing::trace!(statement = ?plan.statement, "compiled request");

    Ok(plan)
}

/// `SELECT COUNT(*)` of the rows of `table` matching every condition.
pub(crate) fn compile_count(
    table: &str,
    conditions: &[ConditionSpec],
    schema: &Schema,
) -> Result<stmt::Select> {
    let table = schema.expect_table(table)?;

    if conditions.is_empty() {
        return Err(Error::missing_conditions("COUNT"));
    }

    let filter = Scope::new(table).filter(conditions)?;
    Ok(stmt::Select::count(&table.name, filter))
}

fn compile_select(
    select: &request::Select,
    schema: &Schema,
    capability: &Capability,
) -> Result<ExecutionPlan> {
    let table = schema.expect_table(&select.table)?;

    if matches!(&select.fields, Fields::List(fields) if fields.is_empty()) {
        return Err(Error::no_fields_selected(&table.name));
    }

    let mut scope = Scope::new(table);
    let mut joins = Vec::with_capacity(select.joins.len());

    for join in &select.joins {
        joins.push(scope.join(join, schema, capability)?);
    }

    let (columns, output) = match &select.fields {
        Fields::All => scope.all_columns(),
        Fields::List(fields) => scope.listed_columns(fields)?,
    };

    let filter = scope.filter(&select.conditions)?;

    let order_by = table
        .primary_keys
        .iter()
        .map(|pk| ExprColumn::new(&table.name, pk))
        .collect();

    let source = Source {
        table: table.name.clone(),
        joins,
    };

    let mut plan = ExecutionPlan::new(
        stmt::Select::new(source, Returning::Columns(columns))
            .filter(filter)
            .order_by(order_by),
    );
    plan.output = output;
    Ok(plan)
}

fn compile_insert(insert: &request::Insert, schema: &Schema) -> Result<ExecutionPlan> {
    let table = schema.expect_table(&insert.table)?;

    let mut columns = Vec::with_capacity(insert.data.len());
    let mut values = Vec::with_capacity(insert.data.len());

    for (name, value) in &insert.data {
        let column = table
            .column(name)
            .ok_or_else(|| Error::unknown_column(&table.name, name))?;

        if column.is_auto_generated() {
            tracing::debug!(table = %table.name, column = %name, "ignoring auto-generated column");
            continue;
        }

        columns.push(name.clone());
        values.push(value.clone());
    }

    if columns.is_empty() {
        return Err(Error::empty_payload(&table.name));
    }

    let mut plan = ExecutionPlan::new(stmt::Insert {
        table: table.name.clone(),
        columns,
        values,
    });
    plan.generated_key = table.generated_key().map(|column| column.name.clone());
    Ok(plan)
}

fn compile_update(update: &request::Update, schema: &Schema) -> Result<ExecutionPlan> {
    let table = schema.expect_table(&update.table)?;

    if update.conditions.is_empty() {
        return Err(Error::missing_conditions("UPDATE"));
    }

    let mut assignments = Vec::with_capacity(update.updates.len());
    let mut stripped = vec![];

    for (name, value) in &update.updates {
        if table.column(name).is_none() {
            return Err(Error::unknown_column(&table.name, name));
        }

        if table.is_primary_key(name) {
            stripped.push(name.clone());
        } else {
            assignments.push(stmt::Assignment::new(name, value.clone()));
        }
    }

    if assignments.is_empty() {
        return Err(if stripped.is_empty() {
            Error::empty_update(&table.name)
        } else {
            Error::primary_key_update_refused(&table.name, stripped)
        });
    }

    if !stripped.is_empty() {
        tracing::warn!(
            table = %table.name,
            columns = ?stripped,
            "primary key columns removed from update"
        );
    }

    let filter = Scope::new(table).filter(&update.conditions)?;

    let mut plan = ExecutionPlan::new(stmt::Update {
        table: table.name.clone(),
        assignments,
        filter,
    });
    plan.stripped_primary_keys = stripped;
    Ok(plan)
}

fn compile_delete(delete: &request::Delete, schema: &Schema) -> Result<ExecutionPlan> {
    let table = schema.expect_table(&delete.table)?;

    if delete.conditions.is_empty() {
        return Err(Error::missing_conditions("DELETE"));
    }

    let filter = Scope::new(table).filter(&delete.conditions)?;

    Ok(ExecutionPlan::new(stmt::Delete {
        table: table.name.clone(),
        filter,
    }))
}

/// The tables a statement reads from: the base table first, then each joined
/// table in join order.
struct Scope<'a> {
    tables: Vec<&'a TableSchema>,
}

impl<'a> Scope<'a> {
    fn new(table: &'a TableSchema) -> Scope<'a> {
        Scope {
            tables: vec![table],
        }
    }

    fn base(&self) -> &'a TableSchema {
        self.tables[0]
    }

    fn get(&self, name: &str) -> Option<&'a TableSchema> {
        self.tables.iter().copied().find(|table| table.name == name)
    }

    fn join(
        &mut self,
        spec: &JoinSpec,
        schema: &'a Schema,
        capability: &Capability,
    ) -> Result<stmt::Join> {
        let to = schema.expect_table(&spec.to_table)?;

        let Some(from) = self.get(&spec.from_table) else {
            return Err(Error::invalid_join(format!(
                "`{}` is not part of the query",
                spec.from_table
            )));
        };

        if self.get(&to.name).is_some() {
            return Err(Error::invalid_join(format!(
                "`{}` is already part of the query",
                to.name
            )));
        }

        if from
            .relationship_with(&spec.from_column, to, &spec.to_column)
            .is_none()
        {
            return Err(Error::invalid_join(format!(
                "no relationship between `{}.{}` and `{}.{}`",
                from.name, spec.from_column, to.name, spec.to_column
            )));
        }

        let op = match spec.join_type {
            JoinType::Inner => JoinOp::Inner,
            JoinType::Left => JoinOp::Left,
            JoinType::Right if capability.right_join => JoinOp::Right,
            JoinType::Full if capability.full_outer_join => JoinOp::Full,
            JoinType::Right | JoinType::Full => {
                return Err(Error::invalid_join(format!(
                    "{:?} joins are not supported by this database",
                    spec.join_type
                )))
            }
        };

        self.tables.push(to);

        Ok(stmt::Join {
            table: to.name.clone(),
            op,
            on: Expr::eq(
                Expr::column(&from.name, &spec.from_column),
                Expr::column(&to.name, &spec.to_column),
            ),
        })
    }

    /// Every column of every table in scope. Keys are qualified once the
    /// query joins tables.
    fn all_columns(&self) -> (Vec<ExprColumn>, Vec<String>) {
        let qualify = self.tables.len() > 1;
        let mut columns = vec![];
        let mut output = vec![];

        for table in &self.tables {
            for name in table.columns.keys() {
                columns.push(ExprColumn::new(&table.name, name));
                output.push(if qualify {
                    format!("{}.{}", table.name, name)
                } else {
                    name.clone()
                });
            }
        }

        (columns, output)
    }

    /// The requested columns in request order. A column requested twice is
    /// returned once.
    fn listed_columns(&self, fields: &[String]) -> Result<(Vec<ExprColumn>, Vec<String>)> {
        let mut columns: Vec<ExprColumn> = vec![];
        let mut output = vec![];

        for field in fields {
            let column = self.resolve(field)?;

            if !columns.contains(&column) {
                columns.push(column);
                output.push(field.clone());
            }
        }

        Ok((columns, output))
    }

    /// Resolves `column` or `table.column`. A bare name prefers the base
    /// table, then a unique match among the joined tables.
    fn resolve(&self, field: &str) -> Result<ExprColumn> {
        if let Some((table, column)) = field.split_once('.') {
            return match self.get(table) {
                Some(table) if table.column(column).is_some() => {
                    Ok(ExprColumn::new(&table.name, column))
                }
                _ => Err(Error::invalid_condition(format!(
                    "unknown column `{field}`"
                ))),
            };
        }

        if self.base().column(field).is_some() {
            return Ok(ExprColumn::new(&self.base().name, field));
        }

        let mut matches = self.tables[1..]
            .iter()
            .filter(|table| table.column(field).is_some());

        match (matches.next(), matches.next()) {
            (Some(table), None) => Ok(ExprColumn::new(&table.name, field)),
            (Some(_), Some(_)) => Err(Error::invalid_condition(format!(
                "column `{field}` is ambiguous; qualify it as `table.{field}`"
            ))),
            (None, _) => Err(Error::invalid_condition(format!(
                "unknown column `{field}`"
            ))),
        }
    }

    fn filter(&self, conditions: &[ConditionSpec]) -> Result<Option<Expr>> {
        let operands = conditions
            .iter()
            .map(|condition| self.condition(condition))
            .collect::<Result<Vec<_>>>()?;

        Ok(Expr::and_from_vec(operands))
    }

    fn condition(&self, condition: &ConditionSpec) -> Result<Expr> {
        let column = self.resolve(&condition.field)?;
        let value = &condition.value;

        if value.is_null() && !condition.operator.accepts_null() {
            return Err(Error::invalid_condition(format!(
                "`{}` cannot compare `{}` with null",
                condition.operator, condition.field
            )));
        }

        Ok(match condition.operator {
            Operator::Eq if value.is_null() => Expr::is_null(column),
            Operator::Ne if value.is_null() => Expr::is_not_null(column),
            Operator::Eq => Expr::eq(column, value.clone()),
            Operator::Ne => Expr::ne(column, value.clone()),
            Operator::Gt => Expr::gt(column, value.clone()),
            Operator::Lt => Expr::lt(column, value.clone()),
            Operator::Like => {
                let needle = match value {
                    Value::String(needle) => needle.clone(),
                    Value::I64(_) | Value::F64(_) | Value::Bool(_) => value.to_string(),
                    Value::Null | Value::Bytes(_) => {
                        return Err(Error::invalid_condition(format!(
                            "`LIKE` on `{}` needs a text value",
                            condition.field
                        )))
                    }
                };

                Expr::contains(column, &needle)
            }
        })
    }
}
