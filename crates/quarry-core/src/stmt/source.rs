use super::Join;

/// The FROM clause: a base table followed by its joins.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub table: String,
    pub joins: Vec<Join>,
}

impl Source {
    pub fn table(table: impl Into<String>) -> Source {
        Source {
            table: table.into(),
            joins: vec![],
        }
    }

    /// Returns `true` if `table` is the base table or already joined.
    pub fn contains(&self, table: &str) -> bool {
        self.table == table || self.joins.iter().any(|join| join.table == table)
    }
}
