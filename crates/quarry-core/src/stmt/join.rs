/// A joined table.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub alias: Option<String>,

    /// The `ON` expression, as trusted SQL text. Empty for cross joins.
    pub on: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinKind {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }

    /// Parses a join qualifier such as `"LEFT"` or `"left outer"`.
    pub fn parse(src: &str) -> Option<JoinKind> {
        let src = src.trim().to_ascii_uppercase();
        let src = src.strip_suffix(" OUTER").unwrap_or(&src);
        match src {
            "" | "INNER" => Some(JoinKind::Inner),
            "LEFT" => Some(JoinKind::Left),
            "RIGHT" => Some(JoinKind::Right),
            "CROSS" => Some(JoinKind::Cross),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_qualifiers() {
        assert_eq!(JoinKind::parse("left"), Some(JoinKind::Left));
        assert_eq!(JoinKind::parse("LEFT OUTER"), Some(JoinKind::Left));
        assert_eq!(JoinKind::parse(""), Some(JoinKind::Inner));
        assert_eq!(JoinKind::parse("sideways"), None);
    }
}
