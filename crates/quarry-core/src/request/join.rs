use serde::{Deserialize, Serialize};

/// A join between a table already in the query and a new table.
///
/// The column pair must match a declared foreign key between the two tables,
/// in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSpec {
    pub from_table: String,
    pub to_table: String,
    pub from_column: String,
    pub to_column: String,
    #[serde(default)]
    pub join_type: JoinType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinSpec {
    pub fn new(
        from_table: impl Into<String>,
        from_column: impl Into<String>,
        to_table: impl Into<String>,
        to_column: impl Into<String>,
    ) -> JoinSpec {
        JoinSpec {
            from_table: from_table.into(),
            to_table: to_table.into(),
            from_column: from_column.into(),
            to_column: to_column.into(),
            join_type: JoinType::Inner,
        }
    }

    pub fn join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        self
    }
}
