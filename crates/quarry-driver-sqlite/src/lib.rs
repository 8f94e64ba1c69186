mod introspect;

mod value;
pub(crate) use value::Value;

use rusqlite::Connection as RusqliteConnection;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};
use quarry_core::{
    async_trait,
    driver::{Capability, Driver, Operation, Response},
    schema::Schema,
    stmt::{self, Statement},
    Error, Result,
};
use quarry_sql::Serializer;
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(|err| {
            Error::invalid_connection_url(format!("{err}; url={url_str}"))
        })?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url_str
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else if url.path().is_empty() {
            Err(Error::invalid_connection_url(format!(
                "missing database path in connection URL; url={url_str}"
            )))
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn quarry_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }

    fn max_connections(&self) -> Option<usize> {
        // Every connection to `:memory:` is a distinct database
        matches!(self, Self::InMemory).then_some(1)
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::storage)?;
        Self::init(connection)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::storage)?;
        Self::init(connection)
    }

    fn init(connection: RusqliteConnection) -> Result<Self> {
        // Enforcement is off by default in SQLite
        connection
            .execute_batch("PRAGMA foreign_keys = ON")
            .map_err(Error::storage)?;
        Ok(Self { connection })
    }

    fn execute_batch(&self, sql: &str) -> Result<()> {
        tracing::debug!(db.statement = sql, "executing");
        self.connection.execute_batch(sql).map_err(translate)
    }
}

#[async_trait]
impl quarry_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let serializer = Serializer::sqlite();

        let stmt = match op {
            Operation::QuerySql(op) => op.stmt,
            Operation::Transaction(op) => {
                self.execute_batch(serializer.serialize_transaction(op))?;
                return Ok(Response::count(0));
            }
            Operation::DeferForeignKeys => {
                self.execute_batch(serializer.defer_foreign_keys())?;
                return Ok(Response::count(0));
            }
        };

        let mut params: Vec<stmt::Value> = Vec::new();
        let sql = serializer.serialize(&stmt, &mut params);
        tracing::debug!(db.statement = %sql, params = params.len(), "executing");

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();
        let mut prepared = self.connection.prepare_cached(&sql).map_err(translate)?;

        if !stmt.returns_rows() {
            let count = prepared
                .execute(rusqlite::params_from_iter(params.iter()))
                .map_err(translate)?;

            let last_insert_id = matches!(stmt, Statement::Insert(_))
                .then(|| self.connection.last_insert_rowid());

            return Ok(Response::count(count as u64).with_last_insert_id(last_insert_id));
        }

        let width = prepared.column_count();
        let mut rows = prepared
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(translate)?;

        let mut ret = vec![];
        while let Some(row) = rows.next().map_err(translate)? {
            let mut values = Vec::with_capacity(width);
            for index in 0..width {
                values.push(Value::from_sql(row, index)?.into_inner());
            }
            ret.push(values);
        }

        Ok(Response::values(ret))
    }

    async fn describe_schema(&mut self) -> Result<Schema> {
        introspect::describe(&self.connection)
    }
}

/// Foreign key violations become referential conflicts carrying the engine
/// message. Everything else is a storage error.
fn translate(err: rusqlite::Error) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            let message = message
                .clone()
                .unwrap_or_else(|| "FOREIGN KEY constraint failed".to_string());
            Error::referential_conflict(message)
        }
        _ => Error::storage(err),
    }
}
