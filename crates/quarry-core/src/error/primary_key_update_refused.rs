use super::Error;

/// Error when a caller attempts to change primary-key columns through a path
/// that does not rewrite the referencing rows.
#[derive(Debug)]
pub(super) struct PrimaryKeyUpdateRefused {
    table: Box<str>,
    columns: Vec<String>,
}

impl std::error::Error for PrimaryKeyUpdateRefused {}

impl core::fmt::Display for PrimaryKeyUpdateRefused {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "refusing to update primary key column(s) {} of `{}`",
            self.columns.join(", "),
            self.table
        )
    }
}

impl Error {
    /// Creates a primary key update refused error.
    pub fn primary_key_update_refused<I>(table: impl Into<String>, columns: I) -> Error
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Error::from(super::ErrorKind::PrimaryKeyUpdateRefused(
            PrimaryKeyUpdateRefused {
                table: table.into().into(),
                columns: columns.into_iter().map(Into::into).collect(),
            },
        ))
    }

    /// Returns `true` if this error is a primary key update refusal.
    pub fn is_primary_key_update_refused(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::PrimaryKeyUpdateRefused(_))
    }
}
