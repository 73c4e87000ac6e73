use super::Constraint;

use crate::{stmt, Result};

/// Length bounds on a string or binary value, in characters or bytes.
#[derive(Debug, Clone)]
pub struct ConstraintLength {
    /// The minimum length of the field.
    pub min: Option<u64>,

    /// The maximum length of the field.
    pub max: Option<u64>,
}

impl ConstraintLength {
    pub(crate) fn check(&self, value: &stmt::Value) -> Result<()> {
        let value_len = match value {
            stmt::Value::String(_) | stmt::Value::Bytes(_) => value.len().unwrap_or_default(),
            _ => return Ok(()),
        };

        let min = self.min.map(|m| m as usize);
        let max = self.max.map(|m| m as usize);

        let too_short = min.is_some_and(|min| value_len < min);
        let too_long = max.is_some_and(|max| value_len > max);

        if too_short || too_long {
            return Err(crate::Error::validation_length(value_len, min, max));
        }

        Ok(())
    }
}

impl From<ConstraintLength> for Constraint {
    fn from(length: ConstraintLength) -> Self {
        Constraint::Length(length)
    }
}
