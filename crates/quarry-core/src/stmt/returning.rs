use super::ExprColumn;

#[derive(Debug, Clone, PartialEq)]
pub enum Returning {
    /// Return the listed columns, in order
    Columns(Vec<ExprColumn>),

    /// Return `COUNT(*)`
    Count,
}
