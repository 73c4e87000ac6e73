mod adhoc;
mod configuration;
mod connection_pool;
mod execution;
mod invalid_result;
mod invalid_state;
mod missing_property;
mod record_not_found;
mod type_conversion;
mod validation;

use adhoc::AdhocError;
use configuration::ConfigurationError;
use connection_pool::ConnectionPoolError;
use execution::ExecutionError;
pub use execution::Stage;
use invalid_result::InvalidResultError;
use invalid_state::InvalidStateError;
use missing_property::MissingPropertyError;
use record_not_found::RecordNotFoundError;
use std::sync::Arc;
use type_conversion::TypeConversionError;
use validation::ValidationError;

/// Returns early with an ad-hoc error built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc error from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur while building, compiling, or executing a query.
///
/// `Error` is a single pointer wide and cheap to clone. The kind of error is
/// private; use the `is_*` predicates to branch on it.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, followed by earlier context, ending with the root cause.
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

        if let Some(inner) = err.inner.as_mut().and_then(Arc::get_mut) {
            if inner.cause.is_none() {
                inner.cause = Some(self);
                return err;
            }
        }

        // The consequent is shared or already chained; detach it as text.
        let detached = Error::from(ErrorKind::Adhoc(AdhocError::new(err.to_string())));
        self.context_impl(detached)
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

    /// Returns `true` if any error in the chain satisfies `f`.
    fn any_in_chain(&self, f: impl Fn(&ErrorKind) -> bool) -> bool {
        self.chain().any(|err| f(err.kind()))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::ConnectionPool(err) => Some(err),
            ErrorKind::Execution(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
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
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Configuration(ConfigurationError),
    ConnectionPool(ConnectionPoolError),
    Execution(ExecutionError),
    InvalidResult(InvalidResultError),
    InvalidState(InvalidStateError),
    MissingProperty(MissingPropertyError),
    RecordNotFound(RecordNotFoundError),
    TypeConversion(TypeConversionError),
    Validation(ValidationError),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Configuration(err) => core::fmt::Display::fmt(err, f),
            ConnectionPool(err) => core::fmt::Display::fmt(err, f),
            Execution(err) => core::fmt::Display::fmt(err, f),
            InvalidResult(err) => core::fmt::Display::fmt(err, f),
            InvalidState(err) => core::fmt::Display::fmt(err, f),
            MissingProperty(err) => core::fmt::Display::fmt(err, f),
            RecordNotFound(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            Validation(err) => core::fmt::Display::fmt(err, f),
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

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<core::fmt::Error> for Error {
    fn from(err: core::fmt::Error) -> Error {
        Error::from(anyhow::Error::from(err))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("bad thing: {}", 7));
        assert_eq!(err.to_string(), "bad thing: 7");
    }

    #[test]
    fn error_chain_display() {
        let root = err!("connection reset");
        let chained = root
            .context(err!("fetching users"))
            .context(err!("User::all()"));

        assert_eq!(
            chained.to_string(),
            "User::all(): fetching users: connection reset"
        );
    }

    #[test]
    fn context_on_shared_consequent() {
        let shared = err!("outer");
        let _keep = shared.clone();
        let chained = err!("inner").context(shared);
        assert_eq!(chained.to_string(), "outer: inner");
    }

    #[test]
    fn predicates_see_through_context() {
        let err = Error::empty_in_list("status").context(err!("compiling select"));
        assert!(err.is_validation());
        assert!(!err.is_configuration());
    }

    #[test]
    fn anyhow_bridge() {
        let our_err: Error = anyhow::anyhow!("something failed").into();
        assert_eq!(our_err.to_string(), "something failed");
    }

    #[test]
    fn type_conversion_error() {
        let err = Error::type_conversion(crate::stmt::Value::I64(42), "String");
        assert_eq!(err.to_string(), "cannot convert I64 to String");
        assert!(err.is_invalid_result());
    }

    #[test]
    fn record_not_found_with_context() {
        let err = Error::record_not_found("table=users id=123");
        assert_eq!(err.to_string(), "record not found: table=users id=123");
        assert!(err.is_record_not_found());
    }

    #[test]
    fn invalid_result_error() {
        let err = Error::invalid_result("column `uid` is not part of the result set");
        assert_eq!(
            err.to_string(),
            "invalid result: column `uid` is not part of the result set"
        );
    }

    #[test]
    fn validation_length_too_short() {
        let err = Error::validation_length(3, Some(5), Some(10));
        assert_eq!(err.to_string(), "value length 3 is too short (minimum: 5)");
    }

    #[test]
    fn validation_length_too_long() {
        let err = Error::validation_length(15, Some(5), Some(10));
        assert_eq!(err.to_string(), "value length 15 is too long (maximum: 10)");
    }

    #[test]
    fn validation_length_exact_mismatch() {
        let err = Error::validation_length(3, Some(5), Some(5));
        assert_eq!(
            err.to_string(),
            "value length 3 does not match required length 5"
        );
    }

    #[test]
    fn validation_range() {
        let err = Error::validation_range("18", Some("21".into()), None);
        assert_eq!(err.to_string(), "value 18 is below the minimum 21");
    }

    #[test]
    fn configuration_names_schema_and_host() {
        let err = Error::configuration("main", "db.internal", "connection refused");
        assert_eq!(
            err.to_string(),
            "configuration error for schema `main` (host: db.internal): connection refused"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn prepare_and_execute_are_distinct() {
        let prepare = Error::prepare(
            "SELECT * FROM",
            "main",
            "localhost",
            std::io::Error::other("syntax error"),
        );
        let execute = Error::execute(
            "INSERT INTO `users` (`id`) VALUES (:p1)",
            "main",
            "localhost",
            std::io::Error::other("UNIQUE constraint failed"),
        );

        assert!(prepare.is_prepare());
        assert!(!prepare.is_execute());
        assert!(execute.is_execute());
        assert!(!execute.is_prepare());
        assert_eq!(
            prepare.to_string(),
            "failed to prepare statement on schema `main` (host: localhost): syntax error [sql: SELECT * FROM]"
        );
    }

    #[test]
    fn invalid_state_error() {
        let err = Error::invalid_state("cannot modify a deleted record");
        assert_eq!(
            err.to_string(),
            "invalid state: cannot modify a deleted record"
        );
        assert!(err.is_invalid_state());
    }

    #[test]
    fn missing_property_names_entity() {
        let err = Error::missing_property("User", "nickname");
        assert_eq!(err.to_string(), "`User` has no property `nickname`");
        assert!(err.is_missing_property());
    }
}
