use super::Error;

/// Error when a result set does not have the shape an operation expects.
///
/// Raised when an index column is absent from the result set, when a row is
/// missing the column a collection is keyed by, or when a row has fewer
/// columns than a typed mapping reads.
#[derive(Debug)]
pub(super) struct InvalidResultError {
    message: Box<str>,
}

impl std::error::Error for InvalidResultError {}

impl core::fmt::Display for InvalidResultError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid result: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid result error.
    pub fn invalid_result(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidResult(InvalidResultError {
            message: message.into().into(),
        }))
    }

    /// Creates the error for an index column absent from a result set.
    pub fn missing_index_column(column: &str) -> Error {
        Error::invalid_result(format!(
            "index column `{column}` is not part of the result set"
        ))
    }

    /// Returns `true` if this error is an invalid result error. Type
    /// conversion failures count as invalid results.
    pub fn is_invalid_result(&self) -> bool {
        self.any_in_chain(|kind| {
            matches!(
                kind,
                super::ErrorKind::InvalidResult(_) | super::ErrorKind::TypeConversion(_)
            )
        })
    }
}
