use super::{Comma, Ident, Params, ToSql};

use quarry_core::stmt;

impl ToSql for &stmt::Statement {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            stmt::Statement::Query(stmt) => stmt.to_sql(f),
            stmt::Statement::Insert(stmt) => stmt.to_sql(f),
            stmt::Statement::Update(stmt) => stmt.to_sql(f),
            stmt::Statement::Delete(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let returning = &self.returning;
        let source = &self.source;

        fmt!(f, "SELECT " returning " FROM " source);

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY " Comma(&self.order_by));
        }
    }
}

impl ToSql for &stmt::Returning {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            stmt::Returning::Columns(columns) => fmt!(f, Comma(columns)),
            stmt::Returning::Count => fmt!(f, "COUNT(*)"),
        }
    }
}

impl ToSql for &stmt::Source {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, Ident(&self.table));

        for join in &self.joins {
            let op = match join.op {
                stmt::JoinOp::Inner => " INNER JOIN ",
                stmt::JoinOp::Left => " LEFT JOIN ",
                stmt::JoinOp::Right => " RIGHT JOIN ",
                stmt::JoinOp::Full => " FULL OUTER JOIN ",
            };

            let on = &join.on;
            fmt!(f, op Ident(&join.table) " ON " on);
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let columns = Comma(self.columns.iter().map(Ident));
        let values = Comma(&self.values);

        fmt!(
            f, "INSERT INTO " Ident(&self.table) " (" columns ") VALUES (" values ")"
        );
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "UPDATE " Ident(&self.table) " SET " Comma(&self.assignments));

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }
    }
}

impl ToSql for &stmt::Assignment {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let value = &self.value;
        fmt!(f, Ident(&self.column) " = " value);
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "DELETE FROM " Ident(&self.table));

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }
    }
}
