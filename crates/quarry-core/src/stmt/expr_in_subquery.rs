use super::{Expr, Select};

/// `expr IN (SELECT ...)`. The subquery returns a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprInSubquery {
    pub expr: Box<Expr>,
    pub query: Box<Select>,
}

impl Expr {
    pub fn in_subquery(lhs: impl Into<Expr>, query: Select) -> Expr {
        ExprInSubquery {
            expr: Box::new(lhs.into()),
            query: Box::new(query),
        }
        .into()
    }
}

impl From<ExprInSubquery> for Expr {
    fn from(value: ExprInSubquery) -> Self {
        Expr::InSubquery(value)
    }
}
