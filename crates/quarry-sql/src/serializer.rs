#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod expr;
mod statement;

use quarry_core::{driver::operation::Transaction, stmt::Statement};

/// Serialize a statement to a SQL string
#[derive(Debug)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl Serializer {
    /// Serializes `stmt`, pushing every value it carries onto `params`.
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }

    /// Serialize a transaction control operation to a SQL string.
    pub fn serialize_transaction(&self, op: Transaction) -> &'static str {
        match op {
            Transaction::Start => match self.flavor {
                Flavor::Mysql => "START TRANSACTION",
                Flavor::Sqlite => "BEGIN",
            },
            Transaction::Commit => "COMMIT",
            Transaction::Rollback => "ROLLBACK",
        }
    }

    /// Statement suspending foreign key enforcement for the current
    /// transaction.
    pub fn defer_foreign_keys(&self) -> &'static str {
        match self.flavor {
            Flavor::Mysql => "SET foreign_key_checks = 0",
            // Reset automatically when the transaction ends
            Flavor::Sqlite => "PRAGMA defer_foreign_keys = ON",
        }
    }

    /// Statement undoing [`Serializer::defer_foreign_keys`] once the
    /// transaction has ended, for flavors where the setting outlives it.
    pub fn restore_foreign_keys(&self) -> Option<&'static str> {
        match self.flavor {
            Flavor::Mysql => Some("SET foreign_key_checks = 1"),
            Flavor::Sqlite => None,
        }
    }
}
