pub mod access;
pub use access::{Authorize, Permission};

pub mod db;
pub use db::Db;

mod engine;
pub use engine::{compile, ExecutionPlan};

pub mod result;
pub use result::{CascadeResult, CountResult, ErrorResponse, QueryResult};

pub mod snapshot;
pub use snapshot::{Snapshot, TableSnapshot};

mod transaction;

pub use quarry_core::{
    async_trait, bail, driver, err,
    request::{self, ConditionSpec, JoinSpec, PrimaryKeyChange},
    schema::{self, ReferenceImpact, TableSchema},
    stmt::{self, Row, Value},
    Error, ErrorCategory, QueryRequest, Result, Schema,
};
