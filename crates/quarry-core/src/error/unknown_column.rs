use super::Error;

/// Error when an INSERT payload or UPDATE set names a column the target table
/// does not have.
#[derive(Debug)]
pub(super) struct UnknownColumnError {
    table: Box<str>,
    column: Box<str>,
}

impl std::error::Error for UnknownColumnError {}

impl core::fmt::Display for UnknownColumnError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unknown column `{}` on table `{}`",
            self.column, self.table
        )
    }
}

impl Error {
    /// Creates an unknown column error.
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownColumn(UnknownColumnError {
            table: table.into().into(),
            column: column.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown column error.
    pub fn is_unknown_column(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownColumn(_))
    }
}
