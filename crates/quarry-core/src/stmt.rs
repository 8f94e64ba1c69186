//! Typed statement tree.
//!
//! Every statement the engine issues is built from these types and rendered
//! to SQL by a dialect serializer. User-supplied values only ever appear as
//! [`Value`] leaves, which serialize to bound parameters.

mod delete;
pub use delete::Delete;

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_column;
pub use expr_column::ExprColumn;

mod expr_in_subquery;
pub use expr_in_subquery::ExprInSubquery;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod expr_like;
pub use expr_like::ExprLike;

mod expr_record;
pub use expr_record::ExprRecord;

mod insert;
pub use insert::Insert;

mod join;
pub use join::{Join, JoinOp};

mod op_binary;
pub use op_binary::BinaryOp;

mod returning;
pub use returning::Returning;

mod select;
pub use select::Select;

mod source;
pub use source::Source;

mod statement;
pub use statement::Statement;

mod update;
pub use update::{Assignment, Update};

mod value;
pub use value::{Row, Value};
