//! Identifier handling for tenant schemas and column names.
//!
//! Postgres does not allow binding identifiers, so anything that lands in the
//! statement as a name goes through one of these types:
//!
//! - [`Ident`] is a bare column or table name matching `[A-Za-z_][A-Za-z0-9_$]*`.
//! - [`TenantSchema`] is always rendered quoted (`"Pool-Main"`), with `"` escaped as `""`.
//!
//! # Example
//! ```ignore
//! use poolsql::{Ident, TenantSchema};
//!
//! let schema = TenantSchema::new("Pool-Main")?;
//! let column = Ident::parse("timestamp")?;
//! assert_eq!(schema.to_sql(), r#""Pool-Main""#);
//! # Ok::<(), poolsql::QueryError>(())
//! ```

use crate::error::{QueryError, QueryResult};
use std::fmt;

/// A validated, unquoted SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    /// Validate `s` as an unquoted identifier.
    pub fn parse(s: &str) -> QueryResult<Self> {
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return Err(QueryError::validation("Identifier cannot be empty"));
        };
        if !(first == '_' || first.is_ascii_alphabetic()) {
            return Err(QueryError::validation(format!(
                "Invalid identifier start character in '{s}': '{first}'"
            )));
        }
        if let Some(c) = chars.find(|&c| !(c == '_' || c == '$' || c.is_ascii_alphanumeric())) {
            return Err(QueryError::validation(format!(
                "Invalid character in identifier '{s}': '{c}'"
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Built-in names that are known to be valid.
    pub(crate) fn from_static(s: &'static str) -> Self {
        debug_assert!(Self::parse(s).is_ok(), "invalid static identifier: {s}");
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The Postgres schema that isolates one pool's tables.
///
/// The name is not checked against an allow-list; it only has to be non-empty
/// and free of NUL characters. Quoting makes any other character safe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantSchema(String);

impl TenantSchema {
    pub fn new(name: impl Into<String>) -> QueryResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(QueryError::validation("Tenant schema cannot be empty"));
        }
        if name.contains('\0') {
            return Err(QueryError::validation(
                "Tenant schema cannot contain NUL character",
            ));
        }
        Ok(Self(name))
    }

    /// The unquoted schema name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Render the schema as a quoted identifier.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 2);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push('"');
        for ch in self.0.chars() {
            if ch == '"' {
                out.push_str("\"\"");
            } else {
                out.push(ch);
            }
        }
        out.push('"');
    }
}

impl TryFrom<&str> for TenantSchema {
    type Error = QueryError;

    fn try_from(name: &str) -> QueryResult<Self> {
        Self::new(name)
    }
}

impl TryFrom<String> for TenantSchema {
    type Error = QueryError;

    fn try_from(name: String) -> QueryResult<Self> {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        assert_eq!(Ident::parse("timestamp").unwrap().as_str(), "timestamp");
    }

    #[test]
    fn ident_with_dollar_and_digits() {
        assert_eq!(Ident::parse("_col$1").unwrap().to_string(), "_col$1");
    }

    #[test]
    fn ident_rejects_empty() {
        assert!(Ident::parse("").is_err());
    }

    #[test]
    fn ident_rejects_start_digit() {
        assert!(Ident::parse("1round").is_err());
    }

    #[test]
    fn ident_rejects_injection() {
        assert!(Ident::parse("id; DROP TABLE users").is_err());
        assert!(Ident::parse("id DESC").is_err());
        assert!(Ident::parse("public.users").is_err());
        assert!(Ident::parse(r#""quoted""#).is_err());
    }

    #[test]
    fn schema_is_quoted() {
        let schema = TenantSchema::new("Pool-Main").unwrap();
        assert_eq!(schema.to_sql(), r#""Pool-Main""#);
        assert_eq!(schema.name(), "Pool-Main");
    }

    #[test]
    fn schema_escapes_quotes() {
        let schema = TenantSchema::new(r#"a"b"#).unwrap();
        assert_eq!(schema.to_sql(), r#""a""b""#);
    }

    #[test]
    fn schema_rejects_empty_and_nul() {
        assert!(TenantSchema::new("").is_err());
        assert!(TenantSchema::new("pool\0").is_err());
    }

    #[test]
    fn schema_try_from() {
        let schema: TenantSchema = "Pool-Main".try_into().unwrap();
        assert_eq!(schema.name(), "Pool-Main");
    }
}
