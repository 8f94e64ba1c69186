use super::Expr;

/// A row value, `(a, b, ...)`. Compares against multi-column subqueries.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprRecord {
    pub fields: Vec<Expr>,
}

impl Expr {
    /// A record of `fields`, or the sole field itself when there is only one.
    pub fn record_from_vec(mut fields: Vec<Expr>) -> Expr {
        if fields.len() == 1 {
            fields.remove(0)
        } else {
            ExprRecord { fields }.into()
        }
    }
}

impl From<ExprRecord> for Expr {
    fn from(value: ExprRecord) -> Self {
        Expr::Record(value)
    }
}
