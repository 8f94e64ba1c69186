use super::{Delimited, Flavor, Ident, Params, ToSql};

use quarry_core::stmt;

impl ToSql for &stmt::Expr {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        use stmt::Expr::*;

        match self {
            And(expr) => {
                fmt!(f, Delimited(&expr.operands, " AND "));
            }
            BinaryOp(expr) => {
                let (lhs, rhs): (&stmt::Expr, &stmt::Expr) = (&expr.lhs, &expr.rhs);
                let op = expr.op.to_string();
                fmt!(f, lhs " " op.as_str() " " rhs);
            }
            Column(expr) => {
                fmt!(f, expr);
            }
            InSubquery(expr) => {
                let (lhs, query): (&stmt::Expr, &stmt::Select) = (&expr.expr, &expr.query);
                fmt!(f, lhs " IN (" query ")");
            }
            IsNull(expr) => {
                let op = if expr.negate {
                    " IS NOT NULL"
                } else {
                    " IS NULL"
                };
                let lhs: &stmt::Expr = &expr.expr;
                fmt!(f, lhs op);
            }
            Like(expr) => {
                let escape = match f.serializer.flavor {
                    // Backslash is itself an escape character in MySQL string
                    // literals.
                    Flavor::Mysql => r" ESCAPE '\\'",
                    Flavor::Sqlite => r" ESCAPE '\'",
                };
                let (lhs, pattern): (&stmt::Expr, &stmt::Expr) = (&expr.expr, &expr.pattern);
                fmt!(f, lhs " LIKE " pattern escape);
            }
            Record(expr) => {
                fmt!(f, "(" Delimited(&expr.fields, ", ") ")");
            }
            Value(value) => {
                fmt!(f, value);
            }
        }
    }
}

impl ToSql for &stmt::ExprColumn {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, Ident(&self.table) "." Ident(&self.column));
    }
}
