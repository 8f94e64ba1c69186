use super::Error;

/// Error when the reference-integrity guard cannot count the rows that
/// reference a key. The operation that needed the count is abandoned without
/// side effects.
#[derive(Debug)]
pub(super) struct CascadeComputationError {
    target: Box<str>,
}

impl std::error::Error for CascadeComputationError {}

impl core::fmt::Display for CascadeComputationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "could not compute reference impact for {}", self.target)
    }
}

impl Error {
    /// Creates a cascade computation error. `target` names the referencing
    /// `table.column` whose count failed.
    pub fn cascade_computation(target: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::CascadeComputation(
            CascadeComputationError {
                target: target.into().into(),
            },
        ))
    }

    pub fn is_cascade_computation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::CascadeComputation(_))
    }
}
