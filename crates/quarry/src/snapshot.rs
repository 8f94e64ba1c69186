use crate::Value;

use serde::{Deserialize, Serialize};

/// A copy of the rows of a set of tables, taken by
/// [`Db::snapshot`](crate::Db::snapshot) and put back by
/// [`Db::restore`](crate::Db::restore).
///
/// Tables are stored parents first, so restoring inserts referenced rows
/// before the rows that reference them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub(crate) tables: Vec<TableSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub(crate) name: String,
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<Value>>,
}

impl Snapshot {
    pub fn tables(&self) -> &[TableSnapshot] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableSnapshot> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Total number of rows across every table.
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(|table| table.rows.len()).sum()
    }
}

impl TableSnapshot {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }
}
