use serde::{Deserialize, Serialize};

/// Rows of `referencing_table` whose `referencing_column` points at a key
/// being changed or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceImpact {
    pub referencing_table: String,
    pub referencing_column: String,
    pub affected_row_count: u64,
}
