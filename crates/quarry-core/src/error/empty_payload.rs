use super::Error;

#[derive(Debug)]
pub(super) struct EmptyPayloadError {
    table: Box<str>,
}

impl std::error::Error for EmptyPayloadError {}

impl core::fmt::Display for EmptyPayloadError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "insert into `{}` has no settable fields", self.table)
    }
}

impl Error {
    /// Creates an error for an INSERT left without fields once auto-generated
    /// columns were stripped.
    pub fn empty_payload(table: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::EmptyPayload(EmptyPayloadError {
            table: table.into().into(),
        }))
    }

    pub fn is_empty_payload(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::EmptyPayload(_))
    }
}
