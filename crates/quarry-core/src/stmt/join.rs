use super::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// The joined table
    pub table: String,

    pub op: JoinOp,

    pub on: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOp {
    Inner,
    Left,
    Right,
    Full,
}
