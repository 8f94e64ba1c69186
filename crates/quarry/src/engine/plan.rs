use quarry_core::stmt::Statement;

/// A validated statement ready to run.
///
/// Every value from the request is a [`Value`](quarry_core::stmt::Value)
/// leaf of `statement` and reaches the database as a bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    pub statement: Statement,

    /// Row keys of a SELECT, one per returned column
    pub output: Vec<String>,

    /// Auto-generated key column reported back by an INSERT
    pub generated_key: Option<String>,

    /// Primary key columns removed from an UPDATE set
    pub stripped_primary_keys: Vec<String>,
}

impl ExecutionPlan {
    pub(crate) fn new(statement: impl Into<Statement>) -> ExecutionPlan {
        ExecutionPlan {
            statement: statement.into(),
            output: vec![],
            generated_key: None,
            stripped_primary_keys: vec![],
        }
    }
}
