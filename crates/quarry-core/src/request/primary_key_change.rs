use crate::stmt::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Moves one row to a new primary key.
///
/// `from` identifies the row by its full primary key. `to` gives the new
/// value of every key column that changes. Referencing rows are rewritten
/// only when `update_references` is set; otherwise the change is refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryKeyChange {
    pub table: String,
    pub from: IndexMap<String, Value>,
    pub to: IndexMap<String, Value>,
    #[serde(default)]
    pub update_references: bool,
}

impl PrimaryKeyChange {
    pub fn new(table: impl Into<String>) -> PrimaryKeyChange {
        PrimaryKeyChange {
            table: table.into(),
            from: IndexMap::new(),
            to: IndexMap::new(),
            update_references: false,
        }
    }

    /// Changes `column` from `from` to `to`.
    pub fn key(mut self, column: impl Into<String>, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        let column = column.into();
        self.from.insert(column.clone(), from.into());
        self.to.insert(column, to.into());
        self
    }

    pub fn update_references(mut self, update_references: bool) -> Self {
        self.update_references = update_references;
        self
    }
}
