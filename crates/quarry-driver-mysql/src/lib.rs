mod introspect;

mod value;
pub(crate) use value::Value;

use mysql_async::{
    prelude::{Queryable, ToValue},
    Conn, Pool,
};
use quarry_core::{
    async_trait,
    driver::{operation::Transaction, Capability, Driver, Operation, Response},
    schema::Schema,
    stmt::{self, Statement},
    Error, Result,
};
use quarry_sql::Serializer;
use std::borrow::Cow;
use url::Url;

/// MySQL error codes reported for foreign key violations.
const FOREIGN_KEY_ERRORS: [u16; 4] = [
    1216, // ER_NO_REFERENCED_ROW
    1217, // ER_ROW_IS_REFERENCED
    1451, // ER_ROW_IS_REFERENCED_2
    1452, // ER_NO_REFERENCED_ROW_2
];

#[derive(Debug)]
pub struct MySQL {
    url: String,
    pool: Pool,
}

impl MySQL {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(|err| {
            Error::invalid_connection_url(format!("{err}; url={url_str}"))
        })?;

        if url.scheme() != "mysql" {
            return Err(Error::invalid_connection_url(format!(
                "connection url does not have a `mysql` scheme; url={}",
                url
            )));
        }

        url.host_str().ok_or_else(|| {
            Error::invalid_connection_url(format!("missing host in connection URL; url={url}"))
        })?;

        if url.path().is_empty() || url.path() == "/" {
            return Err(Error::invalid_connection_url(format!(
                "no database specified - missing path in connection URL; url={}",
                url
            )));
        }

        let opts = mysql_async::Opts::from_url(url.as_ref())
            .map_err(|err| Error::invalid_connection_url(err.to_string()))?;
        let opts = mysql_async::OptsBuilder::from_opts(opts).client_found_rows(true);

        let pool = Pool::new(opts);
        Ok(Self { url: url_str, pool })
    }
}

#[async_trait]
impl Driver for MySQL {
    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.url)
    }

    fn capability(&self) -> &'static Capability {
        &Capability::MYSQL
    }

    async fn connect(&self) -> Result<Box<dyn quarry_core::driver::Connection>> {
        let conn = self.pool.get_conn().await.map_err(Error::storage)?;
        Ok(Box::new(Connection::new(conn)))
    }
}

#[derive(Debug)]
pub struct Connection {
    conn: Conn,

    /// `foreign_key_checks` was switched off for the current transaction
    foreign_keys_deferred: bool,
}

impl Connection {
    pub fn new(conn: Conn) -> Self {
        Self {
            conn,
            foreign_keys_deferred: false,
        }
    }

    async fn query_drop(&mut self, sql: &str) -> Result<()> {
        tracing::debug!(db.statement = sql, "executing");
        self.conn.query_drop(sql).await.map_err(translate)
    }

    async fn end_transaction(&mut self, op: Transaction) -> Result<()> {
        let res = self
            .query_drop(Serializer::mysql().serialize_transaction(op))
            .await;

        // Checks are a session setting and must be re-enabled whether or not
        // the transaction ended cleanly.
        if std::mem::take(&mut self.foreign_keys_deferred) {
            if let Some(restore) = Serializer::mysql().restore_foreign_keys() {
                self.query_drop(restore).await?;
            }
        }

        res
    }
}

#[async_trait]
impl quarry_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let serializer = Serializer::mysql();

        let stmt = match op {
            Operation::QuerySql(op) => op.stmt,
            Operation::Transaction(Transaction::Start) => {
                self.query_drop(serializer.serialize_transaction(Transaction::Start))
                    .await?;
                return Ok(Response::count(0));
            }
            Operation::Transaction(op) => {
                self.end_transaction(op).await?;
                return Ok(Response::count(0));
            }
            Operation::DeferForeignKeys => {
                self.query_drop(serializer.defer_foreign_keys()).await?;
                self.foreign_keys_deferred = true;
                return Ok(Response::count(0));
            }
        };

        let mut params: Vec<stmt::Value> = Vec::new();
        let sql = serializer.serialize(&stmt, &mut params);
        tracing::debug!(db.statement = %sql, params = params.len(), "executing");

        let args = params
            .into_iter()
            .map(|param| Value::from(param).to_value())
            .collect::<Vec<_>>();

        if !stmt.returns_rows() {
            let result = self
                .conn
                .exec_iter(sql.as_str(), mysql_async::Params::Positional(args))
                .await
                .map_err(translate)?;

            let count = result.affected_rows();
            let last_insert_id = result.last_insert_id();
            result.drop_result().await.map_err(translate)?;

            let last_insert_id = match stmt {
                Statement::Insert(_) => last_insert_id.map(|id| id as i64),
                _ => None,
            };

            return Ok(Response::count(count).with_last_insert_id(last_insert_id));
        }

        let rows: Vec<mysql_async::Row> = self
            .conn
            .exec(sql.as_str(), mysql_async::Params::Positional(args))
            .await
            .map_err(translate)?;

        let values = rows
            .into_iter()
            .map(|mut row| {
                (0..row.len())
                    .map(|i| Value::from_sql(i, &mut row).into_inner())
                    .collect()
            })
            .collect();

        Ok(Response::values(values))
    }

    async fn describe_schema(&mut self) -> Result<Schema> {
        introspect::describe(&mut self.conn).await
    }
}

/// Foreign key violations become referential conflicts carrying the server
/// message. Everything else is a storage error.
fn translate(err: mysql_async::Error) -> Error {
    match &err {
        mysql_async::Error::Server(server) if FOREIGN_KEY_ERRORS.contains(&server.code) => {
            Error::referential_conflict(server.message.clone())
        }
        _ => Error::storage(err),
    }
}
