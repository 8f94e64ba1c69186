use anyhow::{Context, Result};
use clap::Subcommand;
use indexmap::IndexMap;
use quarry::{ConditionSpec, Db, Permission, PrimaryKeyChange, QueryRequest, Snapshot, Value};
use serde::{de::DeserializeOwned, Serialize};

use std::{io::Read, path::PathBuf};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Describe every base table
    Schema,

    /// Run a query request, e.g. `{"operation":"SELECT","table":"Person"}`
    Query {
        /// The request as JSON
        request: String,
    },

    /// Count the rows of a table matching a JSON array of conditions
    Count {
        table: String,

        /// e.g. `[{"field":"SaleID","operator":"=","value":4}]`
        conditions: String,
    },

    /// Show the rows referencing a primary key, e.g. `{"EmpID":7}`
    PreviewKey {
        table: String,

        /// Current key values as a JSON object
        key: String,
    },

    /// Change a primary key and rewrite its references
    Cascade {
        /// e.g. `{"table":"Employee","from":{"EmpID":7},"to":{"EmpID":70},"updateReferences":true}`
        change: String,
    },

    /// Copy table contents as JSON
    Snapshot {
        /// Tables to copy; every table when omitted
        #[arg(long, value_delimiter = ',')]
        tables: Vec<String>,
    },

    /// Replace table contents with a snapshot
    Restore {
        /// Snapshot file, or `-` for stdin
        path: PathBuf,
    },
}

type Output = quarry::Result<serde_json::Value>;

impl Command {
    pub(crate) async fn run(self, db: &Db, caller: Permission) -> Result<Output> {
        Ok(match self {
            Command::Schema => json(db.describe_schema(caller).await)?,
            Command::Query { request } => {
                let request: QueryRequest = parse(&request, "query request")?;
                json(db.run_query(caller, request).await)?
            }
            Command::Count { table, conditions } => {
                let conditions: Vec<ConditionSpec> = parse(&conditions, "conditions")?;
                json(db.count_matching(caller, &table, &conditions).await)?
            }
            Command::PreviewKey { table, key } => {
                let key: IndexMap<String, Value> = parse(&key, "key")?;
                json(db.preview_primary_key_change(caller, &table, &key).await)?
            }
            Command::Cascade { change } => {
                let change: PrimaryKeyChange = parse(&change, "key change")?;
                json(db.run_cascade(caller, change).await)?
            }
            Command::Snapshot { tables } => {
                let tables = (!tables.is_empty()).then_some(&tables[..]);
                json(db.snapshot(caller, tables).await)?
            }
            Command::Restore { path } => {
                let snapshot: Snapshot = parse(&read_input(&path)?, "snapshot")?;
                json(
                    db.restore(caller, snapshot)
                        .await
                        .map(|rows| serde_json::json!({ "rowsRestored": rows })),
                )?
            }
        })
    }
}

fn parse<T: DeserializeOwned>(input: &str, what: &str) -> Result<T> {
    serde_json::from_str(input).with_context(|| format!("invalid {what} JSON"))
}

fn json<T: Serialize>(result: quarry::Result<T>) -> Result<Output> {
    Ok(match result {
        Ok(value) => Ok(serde_json::to_value(value)?),
        Err(err) => Err(err),
    })
}

fn read_input(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}
