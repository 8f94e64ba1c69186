use super::Error;

/// Error when catalog metadata cannot be read, or describes a table that
/// violates the schema invariants (no primary key, dangling foreign key
/// column).
///
/// This signals a storage-layer problem, not a client error.
#[derive(Debug)]
pub(super) struct SchemaIntrospectionError {
    message: Box<str>,
}

impl std::error::Error for SchemaIntrospectionError {}

impl core::fmt::Display for SchemaIntrospectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "schema introspection failed: {}", self.message)
    }
}

impl Error {
    /// Creates a schema introspection error.
    pub fn schema_introspection(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::SchemaIntrospection(
            SchemaIntrospectionError {
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a schema introspection error.
    pub fn is_schema_introspection(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::SchemaIntrospection(_))
    }
}
