use super::{Expr, Value};

/// `expr LIKE pattern ESCAPE '\'`.
///
/// The pattern is always a bound value.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprLike {
    pub expr: Box<Expr>,
    pub pattern: Box<Expr>,
}

impl Expr {
    /// Matches rows where `expr` contains `needle` as a substring. Wildcard
    /// and escape characters in `needle` match literally.
    pub fn contains(expr: impl Into<Expr>, needle: &str) -> Expr {
        let mut pattern = String::with_capacity(needle.len() + 2);
        pattern.push('%');
        for c in needle.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');

        ExprLike {
            expr: Box::new(expr.into()),
            pattern: Box::new(Expr::Value(Value::String(pattern))),
        }
        .into()
    }
}

impl From<ExprLike> for Expr {
    fn from(value: ExprLike) -> Self {
        Expr::Like(value)
    }
}
