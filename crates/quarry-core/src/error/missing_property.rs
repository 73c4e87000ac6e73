use super::Error;

#[derive(Debug)]
pub(super) struct MissingPropertyError {
    entity: Box<str>,
    property: Box<str>,
}

impl std::error::Error for MissingPropertyError {}

impl core::fmt::Display for MissingPropertyError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "`{}` has no property `{}`", self.entity, self.property)
    }
}

impl Error {
    /// Creates an error for reading a name that is neither a column nor a
    /// declared relation of `entity`.
    pub fn missing_property(entity: impl Into<String>, property: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingProperty(MissingPropertyError {
            entity: entity.into().into(),
            property: property.into().into(),
        }))
    }

    /// Returns `true` if this error is a missing property error.
    pub fn is_missing_property(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::MissingProperty(_)))
    }
}
