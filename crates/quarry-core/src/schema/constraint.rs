mod length;
pub use length::ConstraintLength;

mod options;
pub use options::ConstraintOptions;

mod range;
pub use range::ConstraintRange;

use crate::{stmt, Result};

#[derive(Debug, Clone)]
pub enum Constraint {
    Length(ConstraintLength),
    Range(ConstraintRange),
    Options(ConstraintOptions),
}

impl Constraint {
    pub fn length_less_than(max: u64) -> Self {
        ConstraintLength {
            min: None,
            max: Some(max),
        }
        .into()
    }

    /// Checks a non-null value.
    pub fn check(&self, value: &stmt::Value) -> Result<()> {
        match self {
            Constraint::Length(length) => length.check(value),
            Constraint::Range(range) => range.check(value),
            Constraint::Options(options) => options.check(value),
        }
    }
}
