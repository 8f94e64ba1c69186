mod capability;
pub use capability::Capability;

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, schema::Schema, Result};

use std::{borrow::Cow, fmt::Debug};

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// The connection URL this driver was created from.
    fn url(&self) -> Cow<'_, str>;

    /// Describes the driver's capability, which informs the query compiler.
    fn capability(&self) -> &'static Capability;

    /// Opens a new connection to the database.
    async fn connect(&self) -> Result<Box<dyn Connection>>;

    /// Upper bound on concurrent connections, when the backend imposes one.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation
    async fn exec(&mut self, op: Operation) -> Result<Response>;

    /// Reads the catalog and describes every base table.
    async fn describe_schema(&mut self) -> Result<Schema>;
}
