use super::Error;

#[derive(Debug)]
pub(super) struct NoFieldsSelectedError {
    table: Box<str>,
}

impl std::error::Error for NoFieldsSelectedError {}

impl core::fmt::Display for NoFieldsSelectedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "no fields selected for query on `{}`", self.table)
    }
}

impl Error {
    /// Creates an error for a SELECT whose field list was explicitly emptied.
    pub fn no_fields_selected(table: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NoFieldsSelected(NoFieldsSelectedError {
            table: table.into().into(),
        }))
    }

    pub fn is_no_fields_selected(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NoFieldsSelected(_))
    }
}
