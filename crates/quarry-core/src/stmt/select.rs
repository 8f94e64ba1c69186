use super::{Expr, ExprColumn, Returning, Source};

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub source: Source,
    pub returning: Returning,
    pub filter: Option<Expr>,
    pub order_by: Vec<ExprColumn>,
}

impl Select {
    pub fn new(source: Source, returning: Returning) -> Select {
        Select {
            source,
            returning,
            filter: None,
            order_by: vec![],
        }
    }

    /// `SELECT COUNT(*) FROM table WHERE filter`
    pub fn count(table: impl Into<String>, filter: Option<Expr>) -> Select {
        Select {
            filter,
            ..Select::new(Source::table(table), Returning::Count)
        }
    }

    pub fn filter(mut self, filter: Option<Expr>) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order_by: Vec<ExprColumn>) -> Self {
        self.order_by = order_by;
        self
    }
}
