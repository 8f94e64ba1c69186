use super::Operation;
use crate::stmt::Statement;

#[derive(Debug)]
pub struct QuerySql {
    /// The SQL query to execute
    pub stmt: Statement,
}

impl From<QuerySql> for Operation {
    fn from(value: QuerySql) -> Self {
        Self::QuerySql(value)
    }
}

impl From<Statement> for Operation {
    fn from(stmt: Statement) -> Self {
        Self::QuerySql(QuerySql { stmt })
    }
}
