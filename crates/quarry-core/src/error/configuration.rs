use super::Error;

/// Error raised while resolving or opening a schema connection.
///
/// Configuration errors are fatal: they are raised at connection acquisition
/// time and are never retried.
#[derive(Debug)]
pub(super) struct ConfigurationError {
    schema: Box<str>,
    host: Option<Box<str>>,
    message: Box<str>,
}

impl std::error::Error for ConfigurationError {}

impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "configuration error for schema `{}`", self.schema)?;
        if let Some(host) = &self.host {
            write!(f, " (host: {host})")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl Error {
    /// Creates a configuration error for `schema` on `host`.
    pub fn configuration(
        schema: impl Into<String>,
        host: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::Configuration(ConfigurationError {
            schema: schema.into().into(),
            host: Some(host.into().into()),
            message: message.into().into(),
        }))
    }

    /// Creates a configuration error for a schema with no known host, such as
    /// a schema name missing from the configuration.
    pub fn unknown_schema(schema: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Configuration(ConfigurationError {
            schema: schema.into().into(),
            host: None,
            message: "schema is not configured".into(),
        }))
    }

    /// Creates a configuration error that is not tied to a host.
    pub fn invalid_configuration(schema: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Configuration(ConfigurationError {
            schema: schema.into().into(),
            host: None,
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a
    /// configuration error.
    pub fn is_configuration(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::Configuration(_)))
    }
}
