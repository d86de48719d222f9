//! The built statement.
//!
//! A [`Statement`] stores raw SQL pieces and bound values separately. It has
//! two renderings:
//!
//! - [`Statement::to_sql`] emits `$1, $2, ...` placeholders; this is what gets
//!   executed, together with [`Statement::params`].
//! - [`Statement::to_literal_sql`] inlines every value at its placeholder
//!   position. It exists for snapshot comparisons against the legacy literal
//!   output and is never sent to the database by this crate.
//!
//! # Example
//!
//! ```ignore
//! use poolsql::{QueryParams, TableProfile, TenantSchema};
//!
//! let schema = TenantSchema::new("Pool-Main")?;
//! let params = QueryParams::parse("timestamp=ge1&type=primary");
//! let stmt = TableProfile::current_network().select(&schema, &params)?;
//!
//! assert_eq!(
//!     stmt.to_sql(),
//!     r#"SELECT * FROM "Pool-Main".current_network WHERE timestamp >= $1 AND type = $2;"#
//! );
//! let rows = stmt.fetch_all(&client).await?;
//! ```

use crate::client::GenericClient;
use crate::error::QueryResult;
use crate::ident::{Ident, TenantSchema};
use crate::value::Value;
use std::fmt::Write;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

#[derive(Debug, Clone, PartialEq)]
enum SqlPart {
    Raw(String),
    Param,
}

/// A bound value plus the text it renders as in the literal form.
#[derive(Debug, Clone, PartialEq)]
struct Bound {
    value: Value,
    literal: String,
    /// Placeholder cast (`$1::numeric`); the literal form omits it.
    cast: Option<&'static str>,
}

/// A finished SQL statement with its bound parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    parts: Vec<SqlPart>,
    params: Vec<Bound>,
}

impl Statement {
    /// Create a new statement with an initial SQL fragment.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        Self {
            parts: vec![SqlPart::Raw(initial_sql.into())],
            params: Vec::new(),
        }
    }

    /// Create an empty statement.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append a validated identifier.
    pub fn push_ident(&mut self, ident: &Ident) -> &mut Self {
        self.push(ident.as_str())
    }

    /// Append `"<schema>".<table>`.
    pub fn push_table(&mut self, schema: &TenantSchema, table: &Ident) -> &mut Self {
        let mut name = String::with_capacity(schema.name().len() + table.as_str().len() + 3);
        schema.write_sql(&mut name);
        name.push('.');
        name.push_str(table.as_str());
        self.push(&name)
    }

    /// Append a placeholder and bind `value`; the literal form renders the
    /// value's own literal.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        let literal = value.to_literal();
        self.push_bound(value, literal)
    }

    /// Append a placeholder and bind `value`; the literal form renders `raw`
    /// exactly as given.
    pub fn push_bind_verbatim(&mut self, value: impl Into<Value>, raw: &str) -> &mut Self {
        self.push_bound(value.into(), raw.to_string())
    }

    /// Like [`push_bind_verbatim`](Self::push_bind_verbatim), but the
    /// placeholder is rendered as `$n::<cast>`.
    pub fn push_bind_cast(
        &mut self,
        value: impl Into<Value>,
        raw: &str,
        cast: &'static str,
    ) -> &mut Self {
        self.push_bound(value.into(), raw.to_string());
        if let Some(last) = self.params.last_mut() {
            last.cast = Some(cast);
        }
        self
    }

    fn push_bound(&mut self, value: Value, literal: String) -> &mut Self {
        self.parts.push(SqlPart::Param);
        self.params.push(Bound {
            value,
            literal,
            cast: None,
        });
        self
    }

    /// Append a comma-separated list of placeholders and bind all values.
    ///
    /// If `values` is empty, this appends `NULL` (so `IN (NULL)` is valid SQL).
    pub fn push_bind_list<T>(&mut self, values: impl IntoIterator<Item = T>) -> &mut Self
    where
        T: Into<Value>,
    {
        let mut iter = values.into_iter();
        let Some(first) = iter.next() else {
            return self.push("NULL");
        };

        self.push_bind(first);
        for v in iter {
            self.push(", ");
            self.push_bind(v);
        }
        self
    }

    /// Render SQL with `$1, $2, ...` placeholders.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        let mut bound = self.params.iter().enumerate();

        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Param => {
                    if let Some((i, b)) = bound.next() {
                        let _ = write!(&mut out, "${}", i + 1);
                        if let Some(cast) = b.cast {
                            let _ = write!(&mut out, "::{cast}");
                        }
                    }
                }
            }
        }
        out
    }

    /// Render SQL with every bound value inlined.
    pub fn to_literal_sql(&self) -> String {
        let mut out = String::new();
        let mut bound = self.params.iter();

        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Param => {
                    if let Some(b) = bound.next() {
                        out.push_str(&b.literal);
                    }
                }
            }
        }
        out
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.params.iter().map(|b| &b.value)
    }

    /// Number of bound values.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|b| &b.value as &(dyn ToSql + Sync))
            .collect()
    }

    /// Execute the statement and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> QueryResult<Vec<Row>> {
        let sql = self.to_sql();
        let params = self.params_ref();
        conn.query(&sql, &params).await
    }

    /// Execute the statement and return the affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> QueryResult<u64> {
        let sql = self.to_sql();
        let params = self.params_ref();
        conn.execute(&sql, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_placeholders_in_order() {
        let mut q = Statement::new("SELECT * FROM t WHERE a = ");
        q.push_bind(1).push(" AND b = ").push_bind("x");

        assert_eq!(q.to_sql(), "SELECT * FROM t WHERE a = $1 AND b = $2");
        assert_eq!(q.to_literal_sql(), "SELECT * FROM t WHERE a = 1 AND b = 'x'");
        assert_eq!(q.params_ref().len(), 2);
    }

    #[test]
    fn verbatim_literal_is_kept_as_given() {
        let mut q = Statement::new("SELECT 1 WHERE a = ");
        q.push_bind_verbatim(Value::parse_numeric("007"), "007");

        assert_eq!(q.to_sql(), "SELECT 1 WHERE a = $1");
        assert_eq!(q.to_literal_sql(), "SELECT 1 WHERE a = 007");
        assert_eq!(q.params().next(), Some(&Value::Int(7)));
    }

    #[test]
    fn cast_only_shows_in_placeholder_form() {
        let mut q = Statement::new("SELECT 1 WHERE a > ");
        q.push_bind_cast(Value::Float(1.5), "1.5", "numeric")
            .push(" AND b = ")
            .push_bind(2);

        assert_eq!(q.to_sql(), "SELECT 1 WHERE a > $1::numeric AND b = $2");
        assert_eq!(q.to_literal_sql(), "SELECT 1 WHERE a > 1.5 AND b = 2");
        assert_eq!(q.param_count(), 2);
    }

    #[test]
    fn bind_list_renders_commas() {
        let mut q = Statement::new("DELETE FROM t WHERE id IN (");
        q.push_bind_list(vec![1, 2, 3]).push(")");
        assert_eq!(q.to_sql(), "DELETE FROM t WHERE id IN ($1, $2, $3)");
        assert_eq!(q.to_literal_sql(), "DELETE FROM t WHERE id IN (1, 2, 3)");
        assert_eq!(q.param_count(), 3);
    }

    #[test]
    fn bind_list_empty_is_valid_sql() {
        let mut q = Statement::new("DELETE FROM t WHERE id IN (");
        q.push_bind_list(Vec::<i64>::new()).push(")");
        assert_eq!(q.to_sql(), "DELETE FROM t WHERE id IN (NULL)");
        assert_eq!(q.param_count(), 0);
    }

    #[test]
    fn push_table_quotes_schema() {
        let schema = TenantSchema::new("Pool-Main").unwrap();
        let table = Ident::parse("current_network").unwrap();
        let mut q = Statement::new("SELECT * FROM ");
        q.push_table(&schema, &table);
        assert_eq!(q.to_sql(), r#"SELECT * FROM "Pool-Main".current_network"#);
    }

    #[test]
    fn empty_push_is_noop() {
        let mut q = Statement::empty();
        q.push("");
        assert_eq!(q.to_sql(), "");
        assert_eq!(q, Statement::empty());
    }
}
