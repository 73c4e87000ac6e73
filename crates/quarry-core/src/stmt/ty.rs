use super::Value;

/// The declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 64-bit integer
    I64,

    /// 64-bit float
    F64,

    /// String type
    String,

    /// Binary data
    Bytes,
}

impl Type {
    pub fn name(&self) -> &'static str {
        match self {
            Type::Bool => "bool",
            Type::I64 => "i64",
            Type::F64 => "f64",
            Type::String => "string",
            Type::Bytes => "bytes",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::I64 | Type::F64)
    }

    /// Returns `true` if `value` may be stored in a column of this type.
    /// Null is accepted by every type; requiredness is checked separately.
    pub fn check(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Type::Bool, Value::Bool(_)) => true,
            (Type::I64, Value::I64(_)) => true,
            (Type::F64, Value::F64(_) | Value::I64(_)) => true,
            (Type::String, Value::String(_)) => true,
            (Type::Bytes, Value::Bytes(_)) => true,
            _ => false,
        }
    }

    /// Converts a value read from the backend into this type where the
    /// backend's storage class differs. SQLite stores booleans as integers
    /// and may return integral floats as integers.
    pub fn coerce(&self, value: Value) -> Value {
        match (self, value) {
            (Type::Bool, Value::I64(v)) => Value::Bool(v != 0),
            (Type::F64, Value::I64(v)) => Value::F64(v as f64),
            (Type::I64, Value::Bool(v)) => Value::I64(v.into()),
            (_, value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_integers_to_bool() {
        assert_eq!(Type::Bool.coerce(Value::I64(0)), Value::Bool(false));
        assert_eq!(Type::Bool.coerce(Value::I64(3)), Value::Bool(true));
        assert_eq!(Type::String.coerce(Value::I64(3)), Value::I64(3));
    }

    #[test]
    fn check_accepts_null() {
        assert!(Type::I64.check(&Value::Null));
        assert!(Type::F64.check(&Value::I64(1)));
        assert!(!Type::I64.check(&Value::from("1")));
    }
}
