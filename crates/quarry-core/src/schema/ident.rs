use crate::{Error, Result};

/// Checks that `ident` is a plain SQL identifier: `[A-Za-z_][A-Za-z0-9_]*`,
/// optionally dot-separated.
pub fn check_ident(ident: &str) -> Result<()> {
    let valid = !ident.is_empty()
        && ident.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        });

    if valid {
        Ok(())
    } else {
        Err(Error::invalid_identifier(ident))
    }
}
