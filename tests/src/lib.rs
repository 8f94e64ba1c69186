#[macro_use]
mod macros;

pub mod company;
pub use company::Company;

pub mod failing_driver;
pub use failing_driver::FailingCountDriver;

pub use quarry::{
    ConditionSpec, Db, Error, ErrorResponse, JoinSpec, Permission, PrimaryKeyChange,
    QueryRequest, QueryResult, ReferenceImpact, Row, Value,
};
