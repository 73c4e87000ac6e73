use super::Constraint;

use crate::{stmt, Error, Result};

/// Inclusive numeric bounds.
#[derive(Debug, Clone)]
pub struct ConstraintRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ConstraintRange {
    pub(crate) fn check(&self, value: &stmt::Value) -> Result<()> {
        let Some(number) = value.as_f64() else {
            return Ok(());
        };

        if let Some(min) = self.min {
            if number < min {
                return Err(Error::validation_range(
                    value.to_string(),
                    Some(min.to_string()),
                    None,
                ));
            }
        }

        if let Some(max) = self.max {
            if number > max {
                return Err(Error::validation_range(
                    value.to_string(),
                    None,
                    Some(max.to_string()),
                ));
            }
        }

        Ok(())
    }
}

impl From<ConstraintRange> for Constraint {
    fn from(range: ConstraintRange) -> Self {
        Constraint::Range(range)
    }
}
