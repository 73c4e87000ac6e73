use super::{ColumnRef, Op, Value};

use indexmap::IndexMap;

/// One entry of a condition list.
///
/// Consecutive comparisons are conjoined. An [`Condition::Or`] marker closes
/// the current group and starts a new one; groups are OR-joined.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare(Comparison),
    Raw(RawCondition),
    Or,
}

/// `column <op> value`, optionally negated.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub column: ColumnRef,
    pub op: Op,

    /// Two items for `BETWEEN`, any number for `IN`, ignored for `IS NULL`.
    pub value: Value,

    /// Splice the value as literal SQL text instead of binding it. The caller
    /// guarantees the text is safe.
    pub is_unsafe: bool,

    /// Wrap the compiled clause in `NOT (...)`.
    pub negate: bool,
}

/// Free-form SQL text with `:name` placeholder tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCondition {
    pub sql: String,
    pub params: IndexMap<String, Value>,
}

impl Condition {
    pub fn compare(column: impl Into<ColumnRef>, op: Op, value: impl Into<Value>) -> Condition {
        Condition::Compare(Comparison {
            column: column.into(),
            op,
            value: value.into(),
            is_unsafe: false,
            negate: false,
        })
    }

    pub fn eq(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Condition {
        Condition::compare(column, Op::Eq, value)
    }

    pub fn ne(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Condition {
        Condition::compare(column, Op::Ne, value)
    }

    pub fn lt(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Condition {
        Condition::compare(column, Op::Lt, value)
    }

    pub fn le(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Condition {
        Condition::compare(column, Op::Le, value)
    }

    pub fn gt(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Condition {
        Condition::compare(column, Op::Gt, value)
    }

    pub fn ge(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Condition {
        Condition::compare(column, Op::Ge, value)
    }

    pub fn like(column: impl Into<ColumnRef>, pattern: impl Into<Value>) -> Condition {
        Condition::compare(column, Op::Like, pattern)
    }

    pub fn not_like(column: impl Into<ColumnRef>, pattern: impl Into<Value>) -> Condition {
        Condition::compare(column, Op::NotLike, pattern)
    }

    pub fn in_list<V: Into<Value>>(
        column: impl Into<ColumnRef>,
        values: impl IntoIterator<Item = V>,
    ) -> Condition {
        let items = values.into_iter().map(Into::into).collect::<Vec<_>>();
        Condition::compare(column, Op::In, Value::List(items))
    }

    pub fn not_in<V: Into<Value>>(
        column: impl Into<ColumnRef>,
        values: impl IntoIterator<Item = V>,
    ) -> Condition {
        let items = values.into_iter().map(Into::into).collect::<Vec<_>>();
        Condition::compare(column, Op::NotIn, Value::List(items))
    }

    pub fn between(
        column: impl Into<ColumnRef>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Condition {
        Condition::compare(
            column,
            Op::Between,
            Value::List(vec![low.into(), high.into()]),
        )
    }

    pub fn not_between(
        column: impl Into<ColumnRef>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Condition {
        Condition::compare(
            column,
            Op::NotBetween,
            Value::List(vec![low.into(), high.into()]),
        )
    }

    pub fn is_null(column: impl Into<ColumnRef>) -> Condition {
        Condition::compare(column, Op::IsNull, Value::Null)
    }

    pub fn is_not_null(column: impl Into<ColumnRef>) -> Condition {
        Condition::compare(column, Op::IsNotNull, Value::Null)
    }

    /// A comparison whose right-hand side is spliced into the SQL verbatim.
    ///
    /// The text is never escaped. Only pass values produced by trusted code,
    /// such as a column reference (`users.id`) or a constant expression.
    pub fn unsafe_literal(
        column: impl Into<ColumnRef>,
        op: Op,
        literal: impl Into<String>,
    ) -> Condition {
        Condition::Compare(Comparison {
            column: column.into(),
            op,
            value: Value::String(literal.into()),
            is_unsafe: true,
            negate: false,
        })
    }

    /// A free-form condition. Each `:name` token in `sql` is rebound to a
    /// fresh placeholder at compile time. A token without an entry in
    /// `params`, or an entry without a token, fails compilation.
    pub fn raw<K, V>(sql: impl Into<String>, params: impl IntoIterator<Item = (K, V)>) -> Condition
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Condition::Raw(RawCondition {
            sql: sql.into(),
            params: params
                .into_iter()
                .map(|(k, v)| {
                    let key: String = k.into();
                    (key.trim_start_matches(':').to_string(), v.into())
                })
                .collect(),
        })
    }

    /// Negates a comparison. Raw conditions and `Or` markers are unchanged;
    /// write the negation into raw SQL directly.
    pub fn not(self) -> Condition {
        match self {
            Condition::Compare(mut cmp) => {
                cmp.negate = !cmp.negate;
                Condition::Compare(cmp)
            }
            other => other,
        }
    }

    pub fn is_or(&self) -> bool {
        matches!(self, Condition::Or)
    }

    pub fn as_comparison(&self) -> Option<&Comparison> {
        match self {
            Condition::Compare(cmp) => Some(cmp),
            _ => None,
        }
    }
}
