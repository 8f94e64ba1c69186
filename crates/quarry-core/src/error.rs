mod adhoc;
mod cascade_computation;
mod connection_pool;
mod empty_payload;
mod empty_update;
mod invalid_condition;
mod invalid_connection_url;
mod invalid_join;
mod missing_conditions;
mod no_fields_selected;
mod permission_denied;
mod primary_key_update_refused;
mod record_not_found;
mod referential_conflict;
mod schema_introspection;
mod storage;
mod unknown_column;
mod unknown_table;
mod unsupported_feature;

use adhoc::AdhocError;
use cascade_computation::CascadeComputationError;
use connection_pool::ConnectionPoolError;
use empty_payload::EmptyPayloadError;
use empty_update::EmptyUpdateError;
use invalid_condition::InvalidConditionError;
use invalid_connection_url::InvalidConnectionUrl;
use invalid_join::InvalidJoinError;
use missing_conditions::MissingConditionsError;
use no_fields_selected::NoFieldsSelectedError;
use permission_denied::PermissionDeniedError;
use primary_key_update_refused::PrimaryKeyUpdateRefused;
use record_not_found::RecordNotFoundError;
use referential_conflict::ReferentialConflictError;
use schema_introspection::SchemaIntrospectionError;
use std::sync::Arc;
use storage::StorageError;
use unknown_column::UnknownColumnError;
use unknown_table::UnknownTableError;
use unsupported_feature::UnsupportedFeature;

/// Return early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Build an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in Quarry.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

/// Coarse classification of an error, used by transports to pick a response
/// status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request was malformed or unsafe and was rejected before any
    /// storage mutation.
    ClientInput,

    /// The caller is not authorized for the requested operation.
    Forbidden,

    /// The targeted row does not exist.
    NotFound,

    /// The storage engine (or the guard) refused the change because dependent
    /// rows exist.
    Conflict,

    /// Storage or infrastructure failure.
    Internal,
}

impl ErrorCategory {
    /// The HTTP status code conventionally associated with this category.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorCategory::ClientInput => 400,
            ErrorCategory::Forbidden => 403,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Conflict => 409,
            ErrorCategory::Internal => 500,
        }
    }
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }
        let inner = err.inner.as_mut().unwrap();
        assert!(
            inner.cause.is_none(),
            "consequent error must not already have a cause"
        );
        Arc::get_mut(inner).unwrap().cause = Some(self);
        err
    }

    /// The innermost error of the context chain.
    pub fn root(&self) -> &Error {
        self.chain().last().unwrap()
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    /// The outermost error in the chain that is not ad-hoc context. Context
    /// added with `err!` never changes how an error is classified.
    fn classified(&self) -> &ErrorKind {
        self.chain()
            .map(Error::kind)
            .find(|kind| !matches!(kind, ErrorKind::Adhoc(_) | ErrorKind::Unknown))
            .unwrap_or_else(|| self.root().kind())
    }

    /// Classifies this error.
    pub fn category(&self) -> ErrorCategory {
        use self::ErrorKind::*;

        match self.classified() {
            UnknownTable(_) | UnknownColumn(_) | InvalidJoin(_) | InvalidCondition(_)
            | NoFieldsSelected(_) | EmptyPayload(_) | EmptyUpdate(_) | MissingConditions(_)
            | PrimaryKeyUpdateRefused(_) => ErrorCategory::ClientInput,
            PermissionDenied(_) => ErrorCategory::Forbidden,
            RecordNotFound(_) => ErrorCategory::NotFound,
            ReferentialConflict(_) => ErrorCategory::Conflict,
            _ => ErrorCategory::Internal,
        }
    }

    /// A stable, machine readable name for this error.
    pub fn kind_name(&self) -> &'static str {
        use self::ErrorKind::*;

        match self.classified() {
            Adhoc(_) => "Adhoc",
            CascadeComputation(_) => "CascadeComputationError",
            ConnectionPool(_) => "ConnectionPoolError",
            EmptyPayload(_) => "EmptyPayloadError",
            EmptyUpdate(_) => "EmptyUpdateError",
            InvalidCondition(_) => "InvalidConditionError",
            InvalidConnectionUrl(_) => "InvalidConnectionUrl",
            InvalidJoin(_) => "InvalidJoinError",
            MissingConditions(_) => "MissingConditionsError",
            NoFieldsSelected(_) => "NoFieldsSelectedError",
            PermissionDenied(_) => "PermissionDenied",
            PrimaryKeyUpdateRefused(_) => "PrimaryKeyUpdateRefused",
            RecordNotFound(_) => "RecordNotFound",
            ReferentialConflict(_) => "ReferentialConflictError",
            SchemaIntrospection(_) => "SchemaIntrospectionError",
            Storage(_) => "StorageError",
            UnknownColumn(_) => "UnknownColumnError",
            UnknownTable(_) => "UnknownTableError",
            UnsupportedFeature(_) => "UnsupportedFeature",
            Unknown => "Unknown",
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Storage(err) => Some(err),
            ErrorKind::ConnectionPool(err) => Some(err),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Adhoc(AdhocError),
    CascadeComputation(CascadeComputationError),
    ConnectionPool(ConnectionPoolError),
    EmptyPayload(EmptyPayloadError),
    EmptyUpdate(EmptyUpdateError),
    InvalidCondition(InvalidConditionError),
    InvalidConnectionUrl(InvalidConnectionUrl),
    InvalidJoin(InvalidJoinError),
    MissingConditions(MissingConditionsError),
    NoFieldsSelected(NoFieldsSelectedError),
    PermissionDenied(PermissionDeniedError),
    PrimaryKeyUpdateRefused(PrimaryKeyUpdateRefused),
    RecordNotFound(RecordNotFoundError),
    ReferentialConflict(ReferentialConflictError),
    SchemaIntrospection(SchemaIntrospectionError),
    Storage(StorageError),
    UnknownColumn(UnknownColumnError),
    UnknownTable(UnknownTableError),
    UnsupportedFeature(UnsupportedFeature),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            CascadeComputation(err) => core::fmt::Display::fmt(err, f),
            ConnectionPool(err) => core::fmt::Display::fmt(err, f),
            EmptyPayload(err) => core::fmt::Display::fmt(err, f),
            EmptyUpdate(err) => core::fmt::Display::fmt(err, f),
            InvalidCondition(err) => core::fmt::Display::fmt(err, f),
            InvalidConnectionUrl(err) => core::fmt::Display::fmt(err, f),
            InvalidJoin(err) => core::fmt::Display::fmt(err, f),
            MissingConditions(err) => core::fmt::Display::fmt(err, f),
            NoFieldsSelected(err) => core::fmt::Display::fmt(err, f),
            PermissionDenied(err) => core::fmt::Display::fmt(err, f),
            PrimaryKeyUpdateRefused(err) => core::fmt::Display::fmt(err, f),
            RecordNotFound(err) => core::fmt::Display::fmt(err, f),
            ReferentialConflict(err) => core::fmt::Display::fmt(err, f),
            SchemaIntrospection(err) => core::fmt::Display::fmt(err, f),
            Storage(err) => core::fmt::Display::fmt(err, f),
            UnknownColumn(err) => core::fmt::Display::fmt(err, f),
            UnknownTable(err) => core::fmt::Display::fmt(err, f),
            UnsupportedFeature(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown quarry error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}
