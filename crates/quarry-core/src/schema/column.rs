use super::{Constraint, ConstraintLength, ConstraintOptions, ConstraintRange};
use crate::{stmt, Error, Result};

/// Descriptor of one entity column.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub ty: stmt::Type,

    /// Null is rejected on `set`.
    pub required: bool,

    /// Excluded from the default projection.
    pub hidden: bool,

    /// Assigned by the backend on insert (auto increment).
    pub auto: bool,

    pub constraints: Vec<Constraint>,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: stmt::Type) -> Column {
        Column {
            name: name.into(),
            ty,
            required: false,
            hidden: false,
            auto: false,
            constraints: vec![],
        }
    }

    pub fn required(mut self) -> Column {
        self.required = true;
        self
    }

    pub fn hidden(mut self) -> Column {
        self.hidden = true;
        self
    }

    pub fn auto(mut self) -> Column {
        self.auto = true;
        self
    }

    pub fn constraint(mut self, constraint: impl Into<Constraint>) -> Column {
        self.constraints.push(constraint.into());
        self
    }

    pub fn length(self, min: Option<u64>, max: Option<u64>) -> Column {
        self.constraint(ConstraintLength { min, max })
    }

    pub fn range(self, min: Option<f64>, max: Option<f64>) -> Column {
        self.constraint(ConstraintRange { min, max })
    }

    pub fn options<V: Into<stmt::Value>>(self, values: impl IntoIterator<Item = V>) -> Column {
        self.constraint(ConstraintOptions {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Validates `value` against the declared type, requiredness and
    /// constraints.
    pub fn check(&self, value: &stmt::Value) -> Result<()> {
        if value.is_null() {
            if self.required {
                return Err(Error::validation_required(&self.name));
            }
            return Ok(());
        }

        if !self.ty.check(value) {
            return Err(Error::validation_type(
                &self.name,
                self.ty.name(),
                value_type_name(value),
            ));
        }

        for constraint in &self.constraints {
            constraint
                .check(value)
                .map_err(|err| err.context(err!("column `{}`", self.name)))?;
        }

        Ok(())
    }
}

fn value_type_name(value: &stmt::Value) -> &'static str {
    use stmt::Value::*;

    match value {
        Bool(_) => "bool",
        I64(_) => "i64",
        F64(_) => "f64",
        String(_) => "string",
        Bytes(_) => "bytes",
        List(_) => "list",
        Null => "null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stmt::{Type, Value};

    #[test]
    fn required_rejects_null() {
        let column = Column::new("email", Type::String).required();
        let err = column.check(&Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "column `email` is required");
    }

    #[test]
    fn optional_accepts_null() {
        let column = Column::new("bio", Type::String).length(Some(10), None);
        assert!(column.check(&Value::Null).is_ok());
    }

    #[test]
    fn type_mismatch() {
        let column = Column::new("age", Type::I64);
        let err = column.check(&Value::from("ten")).unwrap_err();
        assert_eq!(err.to_string(), "column `age` expects i64, got string");
    }

    #[test]
    fn constraint_error_names_column() {
        let column = Column::new("name", Type::String).length(Some(2), Some(4));
        let err = column.check(&Value::from("abcdef")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "column `name`: value length 6 is too long (maximum: 4)"
        );
        assert!(err.is_validation());
    }
}
