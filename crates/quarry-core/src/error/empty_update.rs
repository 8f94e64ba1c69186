use super::Error;

#[derive(Debug)]
pub(super) struct EmptyUpdateError {
    table: Box<str>,
}

impl std::error::Error for EmptyUpdateError {}

impl core::fmt::Display for EmptyUpdateError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "update of `{}` has no columns to set", self.table)
    }
}

impl Error {
    /// Creates an error for an UPDATE without any column to assign.
    pub fn empty_update(table: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::EmptyUpdate(EmptyUpdateError {
            table: table.into().into(),
        }))
    }

    pub fn is_empty_update(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::EmptyUpdate(_))
    }
}
