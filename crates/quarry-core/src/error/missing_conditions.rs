use super::Error;

/// Error when an UPDATE, DELETE or count request carries no condition.
#[derive(Debug)]
pub(super) struct MissingConditionsError {
    operation: Box<str>,
}

impl std::error::Error for MissingConditionsError {}

impl core::fmt::Display for MissingConditionsError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} requires at least one condition", self.operation)
    }
}

impl Error {
    /// Creates a missing conditions error for the named operation.
    pub fn missing_conditions(operation: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingConditions(MissingConditionsError {
            operation: operation.into().into(),
        }))
    }

    /// Returns `true` if this error is a missing conditions error.
    pub fn is_missing_conditions(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MissingConditions(_))
    }
}
