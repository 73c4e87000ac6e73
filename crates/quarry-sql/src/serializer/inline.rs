use quarry_core::{driver::QuerySql, stmt::Value};

/// A fragment of SQL text: literal text or a `:name` placeholder token.
#[derive(Debug, PartialEq)]
pub(super) enum Token<'a> {
    Text(&'a str),
    Param(&'a str),
}

/// Splits SQL text into text and `:name` tokens. Quoted strings and quoted
/// identifiers are skipped, as are `::` casts.
pub(super) fn tokenize(sql: &str) -> Vec<Token<'_>> {
    let bytes = sql.as_bytes();
    let mut tokens = vec![];
    let mut quote = None;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match b {
            b'\'' | b'"' | b'`' => {
                quote = Some(b);
                i += 1;
            }
            b':' if is_param_start(bytes, i) => {
                let mut end = i + 1;
                while end < bytes.len() && is_ident_char(bytes[end]) {
                    end += 1;
                }

                if start < i {
                    tokens.push(Token::Text(&sql[start..i]));
                }
                tokens.push(Token::Param(&sql[i + 1..end]));
                start = end;
                i = end;
            }
            _ => i += 1,
        }
    }

    if start < sql.len() {
        tokens.push(Token::Text(&sql[start..]));
    }

    tokens
}

fn is_param_start(bytes: &[u8], i: usize) -> bool {
    let next = bytes.get(i + 1).copied();
    let prev = i.checked_sub(1).map(|i| bytes[i]);
    prev != Some(b':') && matches!(next, Some(c) if c.is_ascii_alphabetic() || c == b'_')
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Renders a value as a SQL literal.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::I64(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
        Value::String(v) => format!("'{}'", v.replace('\'', "''")),
        Value::Bytes(v) => {
            let hex = v.iter().map(|b| format!("{b:02X}")).collect::<String>();
            format!("X'{hex}'")
        }
        Value::List(items) => items.iter().map(literal).collect::<Vec<_>>().join(", "),
        Value::Null => "NULL".to_string(),
    }
}

/// Replaces every bound placeholder in `query` with its literal value.
///
/// Used when the backend should receive a self-contained statement and for
/// debug output. Tokens with no bound value are kept.
pub fn inline_params(query: &QuerySql) -> String {
    let mut sql = String::with_capacity(query.sql.len());

    for token in tokenize(&query.sql) {
        match token {
            Token::Text(text) => sql.push_str(text),
            Token::Param(name) => match query.params.get(name) {
                Some(value) => sql.push_str(&literal(value)),
                None => {
                    sql.push(':');
                    sql.push_str(name);
                }
            },
        }
    }

    sql
}
