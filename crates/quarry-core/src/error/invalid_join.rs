use super::Error;

/// Error when a join does not correspond to a declared relationship.
///
/// This occurs when:
/// - The column pair does not match any foreign key between the two tables
/// - The join starts from a table that is not part of the query yet
/// - The joined table is already part of the query
/// - The join kind is not supported by the storage engine
#[derive(Debug)]
pub(super) struct InvalidJoinError {
    message: Box<str>,
}

impl std::error::Error for InvalidJoinError {}

impl core::fmt::Display for InvalidJoinError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid join: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid join error.
    pub fn invalid_join(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidJoin(InvalidJoinError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid join error.
    pub fn is_invalid_join(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidJoin(_))
    }
}
