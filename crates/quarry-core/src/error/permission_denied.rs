use super::Error;

#[derive(Debug)]
pub(super) struct PermissionDeniedError {
    required: Box<str>,
}

impl std::error::Error for PermissionDeniedError {}

impl core::fmt::Display for PermissionDeniedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "permission denied: `{}` access required", self.required)
    }
}

impl Error {
    /// Creates an error for a caller lacking the required access tier.
    pub fn permission_denied(required: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::PermissionDenied(PermissionDeniedError {
            required: required.into().into(),
        }))
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::PermissionDenied(_))
    }
}
