use crate::stmt::Value;

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,

    /// Key assigned by the engine to the last inserted row
    pub last_insert_id: Option<i64>,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Operation result, one value per returned column
    Values(Vec<Vec<Value>>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
            last_insert_id: None,
        }
    }

    pub fn values(values: Vec<Vec<Value>>) -> Self {
        Self {
            rows: Rows::Values(values),
            last_insert_id: None,
        }
    }

    pub fn with_last_insert_id(mut self, id: Option<i64>) -> Self {
        self.last_insert_id = id;
        self
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    #[track_caller]
    pub fn into_count(self) -> u64 {
        match self {
            Rows::Count(count) => count,
            _ => todo!("rows={self:#?}"),
        }
    }

    #[track_caller]
    pub fn into_values(self) -> Vec<Vec<Value>> {
        match self {
            Self::Values(values) => values,
            _ => todo!("rows={self:#?}"),
        }
    }
}
