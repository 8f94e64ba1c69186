use crate::stmt::Value;
use serde::{Deserialize, Serialize};

/// A single `field operator value` filter. Conditions of a request are
/// combined with AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    /// Column name, or `table.column` when the query joins tables
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    /// Substring containment
    #[serde(rename = "LIKE", alias = "like")]
    Like,
}

impl ConditionSpec {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        ConditionSpec {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        ConditionSpec::new(field, Operator::Eq, value)
    }

    pub fn like(field: impl Into<String>, value: impl Into<Value>) -> Self {
        ConditionSpec::new(field, Operator::Like, value)
    }
}

impl Operator {
    /// `=` and `!=` accept null (compiled to `IS NULL` / `IS NOT NULL`); the
    /// other operators do not.
    pub fn accepts_null(self) -> bool {
        matches!(self, Operator::Eq | Operator::Ne)
    }
}

impl core::fmt::Display for Operator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Like => "LIKE",
        })
    }
}
