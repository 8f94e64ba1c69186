mod query_sql;
pub use query_sql::QuerySql;

mod transaction;
pub use transaction::Transaction;

#[derive(Debug)]
pub enum Operation {
    /// Execute a SQL query
    QuerySql(QuerySql),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),

    /// Suspend foreign key enforcement until the current transaction ends.
    ///
    /// Engines that support deferred constraints check them at commit; others
    /// switch checks off for the session and switch them back on when the
    /// transaction commits or rolls back.
    DeferForeignKeys,
}
