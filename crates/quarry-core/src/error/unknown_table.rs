use super::Error;

/// Error when a request names a table that does not exist in the live schema.
#[derive(Debug)]
pub(super) struct UnknownTableError {
    table: Box<str>,
}

impl std::error::Error for UnknownTableError {}

impl core::fmt::Display for UnknownTableError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown table `{}`", self.table)
    }
}

impl Error {
    /// Creates an unknown table error.
    pub fn unknown_table(table: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownTable(UnknownTableError {
            table: table.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown table error.
    pub fn is_unknown_table(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownTable(_))
    }
}
