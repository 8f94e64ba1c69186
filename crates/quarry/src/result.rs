//! Operation results and the error payload, in their JSON shapes.

use crate::{Error, ReferenceImpact, Row, Value};

use serde::{Deserialize, Serialize};

/// The result of [`Db::run_query`](crate::Db::run_query).
///
/// Serializes as an array of row objects for SELECT and as
/// `{"rowsAffected": n, "generatedKey": k}` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResult {
    Rows(Vec<Row>),

    #[serde(rename_all = "camelCase")]
    Affected {
        rows_affected: u64,

        /// Key assigned to an inserted row by the database
        #[serde(default, skip_serializing_if = "Option::is_none")]
        generated_key: Option<Value>,
    },
}

impl QueryResult {
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            QueryResult::Rows(rows) => Some(rows),
            QueryResult::Affected { .. } => None,
        }
    }

    #[track_caller]
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            QueryResult::Rows(rows) => rows,
            _ => panic!("expected rows; result={self:?}"),
        }
    }

    pub fn rows_affected(&self) -> Option<u64> {
        match self {
            QueryResult::Affected { rows_affected, .. } => Some(*rows_affected),
            QueryResult::Rows(_) => None,
        }
    }

    pub fn generated_key(&self) -> Option<&Value> {
        match self {
            QueryResult::Affected { generated_key, .. } => generated_key.as_ref(),
            QueryResult::Rows(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResult {
    pub count: u64,
}

/// The result of a primary key cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeResult {
    /// Rows of the changed table that moved to the new key
    pub rows_affected: u64,

    /// Referencing rows rewritten, per referencing column
    pub references: Vec<ReferenceImpact>,
}

/// The payload reported to a caller for a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<ReferenceImpact>>,

    /// HTTP-style status for transports that have one
    #[serde(skip)]
    pub status: u16,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        ErrorResponse {
            error: err.to_string(),
            kind: err.kind_name(),
            references: err
                .reference_impacts()
                .filter(|impacts| !impacts.is_empty())
                .map(<[_]>::to_vec),
            status: err.category().status_code(),
        }
    }
}
