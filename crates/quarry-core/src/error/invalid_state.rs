use super::Error;

/// Error when an operation is not allowed in the current lifecycle state,
/// such as mutating a deleted record.
#[derive(Debug)]
pub(super) struct InvalidStateError {
    message: Box<str>,
}

impl std::error::Error for InvalidStateError {}

impl core::fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid state: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid state error.
    pub fn invalid_state(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidState(InvalidStateError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid state error.
    pub fn is_invalid_state(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::InvalidState(_)))
    }
}
