use super::Constraint;

use crate::{stmt, Error, Result};

/// The value must be one of a fixed set.
#[derive(Debug, Clone)]
pub struct ConstraintOptions {
    pub values: Vec<stmt::Value>,
}

impl ConstraintOptions {
    pub(crate) fn check(&self, value: &stmt::Value) -> Result<()> {
        if self.values.contains(value) {
            Ok(())
        } else {
            let allowed = self
                .values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            Err(Error::validation_option(value.to_string(), format!("[{allowed}]")))
        }
    }
}

impl From<ConstraintOptions> for Constraint {
    fn from(options: ConstraintOptions) -> Self {
        Constraint::Options(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_option() {
        let options = ConstraintOptions {
            values: vec!["draft".into(), "published".into()],
        };
        assert!(options.check(&stmt::Value::from("draft")).is_ok());

        let err = options.check(&stmt::Value::from("archived")).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"value "archived" is not one of ["draft", "published"]"#
        );
    }
}
