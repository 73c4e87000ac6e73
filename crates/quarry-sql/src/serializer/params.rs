use super::{Formatter, ToSql};

use indexmap::IndexMap;
use quarry_core::stmt::Value;

/// Generates placeholder names and accumulates the values bound to them.
///
/// Names come from a counter, never from column names, so binding the same
/// column twice (as `BETWEEN` does) cannot collide.
#[derive(Debug, Default, Clone)]
pub struct ParamBinder {
    next: usize,
    values: IndexMap<String, Value>,
}

/// A generated placeholder, rendered as `:p<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placeholder(pub usize);

impl ParamBinder {
    pub fn new() -> ParamBinder {
        ParamBinder::default()
    }

    /// Reserves a fresh placeholder without binding a value.
    pub fn make_param(&mut self) -> Placeholder {
        self.next += 1;
        Placeholder(self.next)
    }

    /// Binds `value` to a fresh placeholder.
    pub fn bind(&mut self, value: Value) -> Placeholder {
        let placeholder = self.make_param();
        self.values.insert(placeholder.name(), value);
        placeholder
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name.trim_start_matches(':'))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_params(self) -> IndexMap<String, Value> {
        self.values
    }
}

impl Placeholder {
    /// The name without the leading `:`.
    pub fn name(&self) -> String {
        format!("p{}", self.0)
    }
}

impl core::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, ":p{}", self.0)
    }
}

impl ToSql for Placeholder {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push_str(&self.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_distinct() {
        let mut binder = ParamBinder::new();
        let a = binder.bind(Value::I64(1));
        let reserved = binder.make_param();
        let b = binder.bind(Value::I64(1));

        assert_eq!(a.to_string(), ":p1");
        assert_eq!(reserved.to_string(), ":p2");
        assert_eq!(b.to_string(), ":p3");
        assert_eq!(binder.len(), 2);
        assert_eq!(binder.get(":p3"), Some(&Value::I64(1)));
    }
}
