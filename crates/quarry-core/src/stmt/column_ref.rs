/// A column reference, optionally qualified by a table name or alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub qualifier: Option<String>,
    pub name: String,
}

impl ColumnRef {
    pub fn new(name: impl Into<String>) -> ColumnRef {
        ColumnRef {
            qualifier: None,
            name: name.into(),
        }
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> ColumnRef {
        ColumnRef {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }

    /// Parses `name` or `qualifier.name`.
    pub fn parse(src: &str) -> ColumnRef {
        match src.rsplit_once('.') {
            Some((qualifier, name)) => ColumnRef::qualified(qualifier, name),
            None => ColumnRef::new(src),
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.qualifier.is_some()
    }

    /// Qualifies the column with `qualifier` unless it already names one.
    pub fn or_qualify(mut self, qualifier: &str) -> ColumnRef {
        if self.qualifier.is_none() {
            self.qualifier = Some(qualifier.to_string());
        }
        self
    }
}

impl From<&str> for ColumnRef {
    fn from(src: &str) -> Self {
        ColumnRef::parse(src)
    }
}

impl From<String> for ColumnRef {
    fn from(src: String) -> Self {
        ColumnRef::parse(&src)
    }
}

impl From<&String> for ColumnRef {
    fn from(src: &String) -> Self {
        ColumnRef::parse(src)
    }
}

impl core::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{qualifier}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}
