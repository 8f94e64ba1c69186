//! The data contract for dynamic queries.
//!
//! A [`QueryRequest`] is a structural description of a statement. It carries
//! table, column, and value names as data; nothing in it is ever spliced into
//! statement text.

mod condition;
pub use condition::{ConditionSpec, Operator};

mod join;
pub use join::{JoinSpec, JoinType};

mod primary_key_change;
pub use primary_key_change::PrimaryKeyChange;

use crate::stmt::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "UPPERCASE")]
pub enum QueryRequest {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub table: String,

    #[serde(default, skip_serializing_if = "Fields::is_all")]
    pub fields: Fields,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<JoinSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    pub table: String,
    pub data: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub table: String,
    pub updates: IndexMap<String, Value>,

    #[serde(default)]
    pub conditions: Vec<ConditionSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    pub table: String,

    #[serde(default)]
    pub conditions: Vec<ConditionSpec>,
}

/// The field list of a SELECT.
///
/// An absent list and `["*"]` both select every column. An explicit empty
/// list means the caller chose no fields, which is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Fields {
    #[default]
    All,
    List(Vec<String>),
}

impl QueryRequest {
    pub fn table(&self) -> &str {
        match self {
            QueryRequest::Select(select) => &select.table,
            QueryRequest::Insert(insert) => &insert.table,
            QueryRequest::Update(update) => &update.table,
            QueryRequest::Delete(delete) => &delete.table,
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, QueryRequest::Select(_))
    }

    /// The operation keyword, as it appears in the JSON tag.
    pub fn operation(&self) -> &'static str {
        match self {
            QueryRequest::Select(_) => "SELECT",
            QueryRequest::Insert(_) => "INSERT",
            QueryRequest::Update(_) => "UPDATE",
            QueryRequest::Delete(_) => "DELETE",
        }
    }
}

impl Select {
    pub fn new(table: impl Into<String>) -> Select {
        Select {
            table: table.into(),
            fields: Fields::All,
            joins: vec![],
            conditions: vec![],
        }
    }

    pub fn fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.fields = Fields::from_list(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }

    pub fn condition(mut self, condition: ConditionSpec) -> Self {
        self.conditions.push(condition);
        self
    }
}

impl Fields {
    pub fn from_list(list: Vec<String>) -> Fields {
        match &list[..] {
            [star] if star == "*" => Fields::All,
            _ => Fields::List(list),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Fields::All)
    }
}

impl Serialize for Fields {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Fields::All => ["*"].serialize(serializer),
            Fields::List(list) => list.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Fields::from_list(Vec::deserialize(deserializer)?))
    }
}

impl From<Select> for QueryRequest {
    fn from(value: Select) -> Self {
        QueryRequest::Select(value)
    }
}

impl From<Insert> for QueryRequest {
    fn from(value: Insert) -> Self {
        QueryRequest::Insert(value)
    }
}

impl From<Update> for QueryRequest {
    fn from(value: Update) -> Self {
        QueryRequest::Update(value)
    }
}

impl From<Delete> for QueryRequest {
    fn from(value: Delete) -> Self {
        QueryRequest::Delete(value)
    }
}
