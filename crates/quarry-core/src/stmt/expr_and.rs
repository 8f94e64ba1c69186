use super::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprAnd {
    pub operands: Vec<Expr>,
}

impl Expr {
    /// Combines expressions with AND. Returns `None` for an empty set and the
    /// sole operand when there is one.
    pub fn and_from_vec(mut operands: Vec<Expr>) -> Option<Expr> {
        match operands.len() {
            0 => None,
            1 => operands.pop(),
            _ => Some(ExprAnd { operands }.into()),
        }
    }
}

impl From<ExprAnd> for Expr {
    fn from(value: ExprAnd) -> Self {
        Expr::And(value)
    }
}
