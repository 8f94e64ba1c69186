use super::{
    ExprAnd, ExprBinaryOp, ExprColumn, ExprInSubquery, ExprIsNull, ExprLike, ExprRecord, Value,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of expressions
    And(ExprAnd),

    /// Binary comparison
    BinaryOp(ExprBinaryOp),

    /// A column of a table in the statement's source
    Column(ExprColumn),

    /// `expr IN (SELECT ...)`
    InSubquery(ExprInSubquery),

    /// `expr IS [NOT] NULL`
    IsNull(ExprIsNull),

    /// `expr LIKE pattern`
    Like(ExprLike),

    /// `(a, b, ...)`
    Record(ExprRecord),

    /// A bound value
    Value(Value),
}

impl Expr {
    pub fn null() -> Expr {
        Expr::Value(Value::Null)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Expr::Value(_))
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Value(value)
    }
}
