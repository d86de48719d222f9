//! Bound scalar values.
//!
//! Filter values arrive as strings, rows arrive as JSON-ish scalars. Both end
//! up as a [`Value`], which binds to the Postgres column type it meets at
//! execution time. A value that cannot be bound (text against a `bigint`
//! column, an integer that overflows `int4`) fails there, not while building.

use crate::error::{QueryError, QueryResult};
use bytes::BytesMut;
use rust_decimal::Decimal;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// A scalar statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Interpret a raw filter comparand.
    ///
    /// Integers win over floats; anything that is neither a finite number nor
    /// an integer stays text and is left for the database to reject.
    pub fn parse_numeric(raw: &str) -> Self {
        if let Ok(v) = raw.parse::<i64>() {
            return Value::Int(v);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Value::Float(v),
            _ => Value::Text(raw.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this is a number with a fractional part, which an integer
    /// column cannot take without a cast.
    pub fn is_fractional(&self) -> bool {
        matches!(self, Value::Float(v) if v.fract() != 0.0)
    }

    /// Render as an inline SQL literal. Text is single-quoted with `'` doubled.
    pub fn to_literal(&self) -> String {
        let mut out = String::new();
        self.write_literal(&mut out);
        out
    }

    pub(crate) fn write_literal(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("NULL"),
            Value::Int(v) => out.push_str(&v.to_string()),
            Value::Float(v) => out.push_str(&v.to_string()),
            Value::Text(s) => write_quoted(s, out),
        }
    }
}

pub(crate) fn write_quoted(s: &str, out: &mut String) {
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push_str("''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
}

fn mismatch(what: String, ty: &Type) -> Box<dyn Error + Sync + Send> {
    format!("cannot bind {what} to column of type {ty}").into()
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql(ty, out),
                Type::INT8 => v.to_sql(ty, out),
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                Type::FLOAT8 => (*v as f64).to_sql(ty, out),
                Type::NUMERIC => Decimal::from(*v).to_sql(ty, out),
                _ => Err(mismatch(format!("integer {v}"), ty)),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                Type::FLOAT8 => v.to_sql(ty, out),
                // Shortest round-trip text, so 0.1 binds as 0.1 and not its binary expansion.
                Type::NUMERIC => v.to_string().parse::<Decimal>()?.to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8
                    if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v <= i64::MAX as f64 =>
                {
                    Value::Int(*v as i64).to_sql(ty, out)
                }
                _ => Err(mismatch(format!("number {v}"), ty)),
            },
            Value::Text(s) => {
                if <String as ToSql>::accepts(ty) {
                    s.to_sql(ty, out)
                } else {
                    Err(mismatch(format!("text {s:?}"), ty))
                }
            }
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2 | Type::INT4 | Type::INT8 | Type::FLOAT4 | Type::FLOAT8 | Type::NUMERIC
        ) || <String as ToSql>::accepts(ty)
    }

    tokio_postgres::types::to_sql_checked!();
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = QueryError;

    fn try_from(v: &serde_json::Value) -> QueryResult<Self> {
        match v {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(Value::Int(i)),
                (None, Some(f)) => Ok(Value::Float(f)),
                (None, None) => Err(QueryError::validation(format!(
                    "number {n} is not representable"
                ))),
            },
            other => Err(QueryError::validation(format!(
                "expected a scalar value, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_numeric_prefers_integers() {
        assert_eq!(Value::parse_numeric("100"), Value::Int(100));
        assert_eq!(Value::parse_numeric("-7"), Value::Int(-7));
        assert_eq!(Value::parse_numeric("1.5"), Value::Float(1.5));
    }

    #[test]
    fn parse_numeric_keeps_garbage_as_text() {
        assert_eq!(Value::parse_numeric("abc"), Value::Text("abc".into()));
        assert_eq!(Value::parse_numeric(""), Value::Text(String::new()));
        assert_eq!(Value::parse_numeric("inf"), Value::Text("inf".into()));
    }

    #[test]
    fn literals() {
        assert_eq!(Value::Null.to_literal(), "NULL");
        assert_eq!(Value::Int(1).to_literal(), "1");
        assert_eq!(Value::Float(0.25).to_literal(), "0.25");
        assert_eq!(Value::from("primary").to_literal(), "'primary'");
        assert_eq!(Value::from("it's").to_literal(), "'it''s'");
    }

    #[test]
    fn binds_integers_to_numeric_columns() {
        let mut buf = BytesMut::new();
        assert!(Value::Int(5).to_sql(&Type::INT8, &mut buf).is_ok());
        assert_eq!(buf.len(), 8);

        let mut buf = BytesMut::new();
        assert!(Value::Int(5).to_sql(&Type::INT4, &mut buf).is_ok());
        assert_eq!(buf.len(), 4);

        let mut buf = BytesMut::new();
        assert!(Value::Int(5).to_sql(&Type::FLOAT8, &mut buf).is_ok());
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn rejects_overflow_and_mismatch() {
        let mut buf = BytesMut::new();
        assert!(Value::Int(i64::MAX).to_sql(&Type::INT4, &mut buf).is_err());
        assert!(Value::from("abc").to_sql(&Type::INT8, &mut buf).is_err());
        assert!(Value::Float(1.5).to_sql(&Type::INT8, &mut buf).is_err());
        assert!(Value::Int(1).to_sql(&Type::TEXT, &mut buf).is_err());
    }

    #[test]
    fn numbers_bind_to_numeric_columns() {
        let mut buf = BytesMut::new();
        assert!(Value::Int(1).to_sql(&Type::NUMERIC, &mut buf).is_ok());
        assert!(!buf.is_empty());

        let mut buf = BytesMut::new();
        assert!(Value::Float(1.5).to_sql(&Type::NUMERIC, &mut buf).is_ok());

        let mut buf = BytesMut::new();
        assert!(Value::Float(0.1).to_sql(&Type::NUMERIC, &mut buf).is_ok());
        assert!(<Value as ToSql>::accepts(&Type::NUMERIC));
    }

    #[test]
    fn fractional_values() {
        assert!(Value::Float(1.5).is_fractional());
        assert!(!Value::Float(2.0).is_fractional());
        assert!(!Value::Int(2).is_fractional());
        assert!(!Value::from("1.5").is_fractional());
    }

    #[test]
    fn integral_float_binds_to_bigint() {
        let mut buf = BytesMut::new();
        assert!(Value::Float(3.0).to_sql(&Type::INT8, &mut buf).is_ok());
    }

    #[test]
    fn text_binds_to_varchar() {
        let mut buf = BytesMut::new();
        assert!(Value::from("primary").to_sql(&Type::VARCHAR, &mut buf).is_ok());
        assert_eq!(&buf[..], b"primary");
    }

    #[test]
    fn null_binds_anywhere_accepted() {
        let mut buf = BytesMut::new();
        assert!(matches!(
            Value::Null.to_sql(&Type::INT8, &mut buf),
            Ok(IsNull::Yes)
        ));
        assert!(<Value as ToSql>::accepts(&Type::TEXT));
        assert!(!<Value as ToSql>::accepts(&Type::BOOL));
    }

    #[test]
    fn from_json_scalars() {
        let v = serde_json::json!(1);
        assert_eq!(Value::try_from(&v).unwrap(), Value::Int(1));
        let v = serde_json::json!(1.5);
        assert_eq!(Value::try_from(&v).unwrap(), Value::Float(1.5));
        let v = serde_json::json!("x");
        assert_eq!(Value::try_from(&v).unwrap(), Value::from("x"));
        let v = serde_json::json!(null);
        assert_eq!(Value::try_from(&v).unwrap(), Value::Null);
        let v = serde_json::json!([1]);
        assert!(Value::try_from(&v).is_err());
        let v = serde_json::json!(true);
        assert!(Value::try_from(&v).is_err());
    }
}
