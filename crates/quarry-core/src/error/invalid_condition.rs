use super::Error;

/// Error when a condition or selected field cannot be resolved against the
/// tables of the query, or when its value cannot be used with its operator.
#[derive(Debug)]
pub(super) struct InvalidConditionError {
    message: Box<str>,
}

impl std::error::Error for InvalidConditionError {}

impl core::fmt::Display for InvalidConditionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid condition: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid condition error.
    pub fn invalid_condition(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidCondition(InvalidConditionError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid condition error.
    pub fn is_invalid_condition(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidCondition(_))
    }
}
