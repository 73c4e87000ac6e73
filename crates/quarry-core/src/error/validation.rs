use super::Error;

/// Error when a value or statement fails validation before any SQL is sent.
#[derive(Debug)]
pub(super) struct ValidationError {
    pub(super) kind: ValidationErrorKind,
}

#[derive(Debug)]
pub(super) enum ValidationErrorKind {
    /// String length constraint violation
    Length {
        value_len: usize,
        min: Option<usize>,
        max: Option<usize>,
    },

    /// Numeric range constraint violation
    Range {
        value: String,
        min: Option<String>,
        max: Option<String>,
    },

    /// A required column was set to null
    Required { column: String },

    /// Value is not one of the allowed options
    Options { value: String, allowed: String },

    /// Value does not have the column's declared type
    Type {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    UnknownColumn { entity: String, column: String },

    /// `IN ()` / `NOT IN ()`
    EmptyInList { column: String },

    BetweenArity { column: String, found: usize },

    /// List value where a single scalar is expected
    NonScalar { column: String },

    /// UPDATE or DELETE with no condition and no opt-in
    Unconditional { action: &'static str, table: String },

    InvalidIdentifier { ident: String },

    /// `:name` token in raw SQL with no supplied value
    UnboundParam { name: String },

    /// Supplied raw SQL value that no token references
    UnusedParam { name: String },

    Message(Box<str>),
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use ValidationErrorKind::*;

        match &self.kind {
            Length {
                value_len,
                min,
                max,
            } => {
                if let (Some(min), Some(max)) = (min, max) {
                    if min == max {
                        return write!(
                            f,
                            "value length {} does not match required length {}",
                            value_len, min
                        );
                    }
                }

                match (min, max) {
                    (Some(min), _) if value_len < min => {
                        write!(f, "value length {value_len} is too short (minimum: {min})")
                    }
                    (_, Some(max)) if value_len > max => {
                        write!(f, "value length {value_len} is too long (maximum: {max})")
                    }
                    _ => f.write_str("length constraint violation"),
                }
            }
            Range { value, min, max } => match (min, max) {
                (Some(min), _) => write!(f, "value {value} is below the minimum {min}"),
                (None, Some(max)) => write!(f, "value {value} is above the maximum {max}"),
                (None, None) => f.write_str("range constraint violation"),
            },
            Required { column } => write!(f, "column `{column}` is required"),
            Options { value, allowed } => write!(f, "value {value} is not one of {allowed}"),
            Type {
                column,
                expected,
                found,
            } => write!(f, "column `{column}` expects {expected}, got {found}"),
            UnknownColumn { entity, column } => {
                write!(f, "unknown column `{column}` for entity `{entity}`")
            }
            EmptyInList { column } => {
                write!(f, "IN list for `{column}` must not be empty")
            }
            BetweenArity { column, found } => write!(
                f,
                "BETWEEN on `{column}` requires exactly 2 values, got {found}"
            ),
            NonScalar { column } => {
                write!(f, "value for `{column}` must be a scalar or null")
            }
            Unconditional { action, table } => write!(
                f,
                "{action} on `{table}` has no condition; call `allow_unconditional()` to affect every row"
            ),
            InvalidIdentifier { ident } => write!(f, "invalid identifier `{ident}`"),
            UnboundParam { name } => write!(f, "no value supplied for placeholder `:{name}`"),
            UnusedParam { name } => {
                write!(f, "parameter `{name}` is not referenced by the SQL text")
            }
            Message(message) => f.write_str(message),
        }
    }
}

impl Error {
    fn validation_kind(kind: ValidationErrorKind) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError { kind }))
    }

    /// Creates a validation error with a free-form message.
    pub fn validation(message: impl Into<String>) -> Error {
        Error::validation_kind(ValidationErrorKind::Message(message.into().into()))
    }

    /// Creates a validation error for a string length constraint violation.
    ///
    /// When `min` equals `max` the message names the exact required length.
    pub fn validation_length(value_len: usize, min: Option<usize>, max: Option<usize>) -> Error {
        Error::validation_kind(ValidationErrorKind::Length {
            value_len,
            min,
            max,
        })
    }

    /// Creates a validation error for a numeric range violation. Pass the
    /// violated bound only.
    pub fn validation_range(
        value: impl Into<String>,
        min: Option<String>,
        max: Option<String>,
    ) -> Error {
        Error::validation_kind(ValidationErrorKind::Range {
            value: value.into(),
            min,
            max,
        })
    }

    pub fn validation_required(column: impl Into<String>) -> Error {
        Error::validation_kind(ValidationErrorKind::Required {
            column: column.into(),
        })
    }

    /// `allowed` lists the permitted values, comma-separated.
    pub fn validation_option(value: impl Into<String>, allowed: impl Into<String>) -> Error {
        Error::validation_kind(ValidationErrorKind::Options {
            value: value.into(),
            allowed: allowed.into(),
        })
    }

    pub fn validation_type(
        column: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Error {
        Error::validation_kind(ValidationErrorKind::Type {
            column: column.into(),
            expected,
            found,
        })
    }

    /// Creates a validation error for a column the entity does not declare.
    pub fn unknown_column(entity: impl Into<String>, column: impl Into<String>) -> Error {
        Error::validation_kind(ValidationErrorKind::UnknownColumn {
            entity: entity.into(),
            column: column.into(),
        })
    }

    /// Creates a validation error for an `IN` / `NOT IN` with no values.
    pub fn empty_in_list(column: impl Into<String>) -> Error {
        Error::validation_kind(ValidationErrorKind::EmptyInList {
            column: column.into(),
        })
    }

    pub fn between_arity(column: impl Into<String>, found: usize) -> Error {
        Error::validation_kind(ValidationErrorKind::BetweenArity {
            column: column.into(),
            found,
        })
    }

    pub fn non_scalar_value(column: impl Into<String>) -> Error {
        Error::validation_kind(ValidationErrorKind::NonScalar {
            column: column.into(),
        })
    }

    /// Creates the error raised when an UPDATE or DELETE has no condition and
    /// the caller did not opt in to a table-wide mutation.
    pub fn unconditional_mutation(action: &'static str, table: impl Into<String>) -> Error {
        Error::validation_kind(ValidationErrorKind::Unconditional {
            action,
            table: table.into(),
        })
    }

    pub fn invalid_identifier(ident: impl Into<String>) -> Error {
        Error::validation_kind(ValidationErrorKind::InvalidIdentifier {
            ident: ident.into(),
        })
    }

    pub fn unbound_param(name: impl Into<String>) -> Error {
        Error::validation_kind(ValidationErrorKind::UnboundParam { name: name.into() })
    }

    pub fn unused_param(name: impl Into<String>) -> Error {
        Error::validation_kind(ValidationErrorKind::UnusedParam { name: name.into() })
    }

    /// Returns `true` if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::Validation(_)))
    }
}
