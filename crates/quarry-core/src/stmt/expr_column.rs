use super::Expr;

/// A qualified column reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprColumn {
    pub table: String,
    pub column: String,
}

impl ExprColumn {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> ExprColumn {
        ExprColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl Expr {
    pub fn column(table: impl Into<String>, column: impl Into<String>) -> Expr {
        ExprColumn::new(table, column).into()
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Expr::Column(value)
    }
}
