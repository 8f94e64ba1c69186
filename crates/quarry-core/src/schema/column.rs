use super::ColumnType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A column of a base table, as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    /// The column name
    pub name: String,

    /// Semantic type tag derived from the declared type
    #[serde(rename = "type")]
    pub ty: ColumnType,

    /// The raw type string as declared in the catalog
    pub data_type: String,

    /// Length bound for text, decimal, and binary types
    pub length: Option<u64>,

    pub nullable: bool,

    pub default_value: Option<String>,

    /// Allowed values of an enum column, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,

    #[serde(default)]
    pub extra: BTreeSet<ColumnFlag>,
}

/// Engine-maintained behaviors of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFlag {
    /// The engine assigns the value on insert (auto increment, rowid alias).
    /// Such a column is never client-settable.
    AutoGenerated,

    /// The default is an expression evaluated by the engine.
    DefaultGenerated,

    OnUpdateCurrentTimestamp,
}

impl ColumnInfo {
    pub fn is_auto_generated(&self) -> bool {
        self.extra.contains(&ColumnFlag::AutoGenerated)
    }
}

impl ColumnFlag {
    /// Parses a MySQL `EXTRA` column value into the flags it carries.
    ///
    /// Unrecognized words are ignored.
    pub fn parse_mysql_extra(extra: &str) -> BTreeSet<ColumnFlag> {
        let extra = extra.to_ascii_lowercase();
        let mut flags = BTreeSet::new();

        if extra.contains("auto_increment") {
            flags.insert(ColumnFlag::AutoGenerated);
        }

        if extra.contains("default_generated") {
            flags.insert(ColumnFlag::DefaultGenerated);
        }

        if extra.contains("on update current_timestamp") {
            flags.insert(ColumnFlag::OnUpdateCurrentTimestamp);
        }

        flags
    }
}
