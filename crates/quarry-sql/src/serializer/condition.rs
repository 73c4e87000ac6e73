use super::{inline, Comma, Formatter, Qualified, ToSql};

use quarry_core::{
    stmt::{Comparison, Condition, Filter, Op, RawCondition, Value},
    Error,
};

/// Renders a filter as OR-joined, parenthesized AND groups.
pub(super) struct Conditions<'a>(pub(super) &'a Filter);

impl ToSql for Conditions<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let mut or = "";

        for group in self.0.groups() {
            fmt!(f, or, "(");

            let mut and = "";
            for condition in group {
                fmt!(f, and, condition);
                and = " AND ";
            }

            f.dst.push(')');
            or = " OR ";
        }
    }
}

impl ToSql for &Condition {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Condition::Compare(cmp) => cmp.to_sql(f),
            Condition::Raw(raw) => raw.to_sql(f),
            Condition::Or => {}
        }
    }
}

impl ToSql for &Comparison {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if self.negate {
            f.dst.push_str("NOT (");
        }

        fmt!(f, Qualified(&self.column), " ", self.op.as_sql());

        let column = self.column.to_string();
        let is_unsafe = self.is_unsafe;

        match self.op {
            Op::IsNull | Op::IsNotNull => {}
            Op::In | Op::NotIn => {
                let items = items(&self.value);
                if items.is_empty() {
                    f.fail(Error::empty_in_list(&column));
                }
                check_scalars(&column, items, f);
                fmt!(f, " (", Comma(items.iter().map(|value| Bound { value, is_unsafe })), ")");
            }
            Op::Between | Op::NotBetween => {
                let items = items(&self.value);
                match items {
                    [low, high] => {
                        check_scalars(&column, items, f);
                        fmt!(
                            f,
                            " ",
                            Bound { value: low, is_unsafe },
                            " AND ",
                            Bound { value: high, is_unsafe },
                        );
                    }
                    _ => f.fail(Error::between_arity(&column, items.len())),
                }
            }
            _ => {
                if !self.value.is_scalar() {
                    f.fail(Error::non_scalar_value(&column));
                }
                fmt!(f, " ", Bound { value: &self.value, is_unsafe });
            }
        }

        if self.negate {
            f.dst.push(')');
        }
    }
}

fn items(value: &Value) -> &[Value] {
    match value {
        Value::List(items) => items,
        value => core::slice::from_ref(value),
    }
}

fn check_scalars(column: &str, items: &[Value], f: &mut Formatter<'_>) {
    if items.iter().any(Value::is_list) {
        f.fail(Error::non_scalar_value(column));
    }
}

/// A value either bound to a fresh placeholder or, when unsafe, spliced
/// verbatim.
pub(super) struct Bound<'a> {
    pub(super) value: &'a Value,
    pub(super) is_unsafe: bool,
}

impl ToSql for Bound<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if self.is_unsafe {
            match self.value {
                Value::String(text) => f.dst.push_str(text),
                value => f.dst.push_str(&inline::literal(value)),
            }
        } else {
            let placeholder = f.params.bind(self.value.clone());
            placeholder.to_sql(f);
        }
    }
}

/// Raw text with each `:name` token rebound through the statement's binder.
/// A list value expands to a comma-separated placeholder list. Every token
/// needs a value and every value needs a token.
impl ToSql for &RawCondition {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push('(');

        let mut used = vec![false; self.params.len()];

        for token in inline::tokenize(&self.sql) {
            match token {
                inline::Token::Text(text) => f.dst.push_str(text),
                inline::Token::Param(name) => match self.params.get_full(name) {
                    Some((index, _, value)) => {
                        used[index] = true;
                        bind_raw(name, value, f);
                    }
                    None => {
                        f.fail(Error::unbound_param(name));
                        f.dst.push(':');
                        f.dst.push_str(name);
                    }
                },
            }
        }

        if let Some((name, _)) = self
            .params
            .keys()
            .zip(&used)
            .find(|(_, used)| !**used)
        {
            f.fail(Error::unused_param(name));
        }

        f.dst.push(')');
    }
}

fn bind_raw(name: &str, value: &Value, f: &mut Formatter<'_>) {
    match value {
        Value::List(items) => {
            if items.is_empty() {
                f.fail(Error::empty_in_list(name));
            }
            check_scalars(name, items, f);
            fmt!(f, Comma(items.iter().map(|value| Bound { value, is_unsafe: false })));
        }
        value => fmt!(f, Bound { value, is_unsafe: false }),
    }
}
