//! Filter predicates parsed from raw parameter values.
//!
//! Numeric columns accept a two-letter relational prefix:
//!
//! | prefix | operator |
//! |--------|----------|
//! | `lt`   | `<`      |
//! | `le`   | `<=`     |
//! | `gt`   | `>`      |
//! | `ge`   | `>=`     |
//! | `ne`   | `!=`     |
//! | none   | `=`      |
//!
//! String and generic columns always compare with `=`.

use crate::registry::ColumnKind;
use crate::sql::Statement;
use crate::value::{Value, write_quoted};

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        }
    }

    /// Split a numeric filter value into its operator and comparand.
    ///
    /// Only the first two bytes are inspected, case-sensitively. Without a
    /// known prefix the whole value is the comparand.
    pub fn parse_prefixed(raw: &str) -> (CompareOp, &str) {
        let op = match raw.get(..2) {
            Some("lt") => CompareOp::Lt,
            Some("le") => CompareOp::Lte,
            Some("gt") => CompareOp::Gt,
            Some("ge") => CompareOp::Gte,
            Some("ne") => CompareOp::Ne,
            _ => return (CompareOp::Eq, raw),
        };
        (op, &raw[2..])
    }
}

/// One `column <op> value` predicate of a WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter<'a> {
    column: &'a str,
    kind: ColumnKind,
    op: CompareOp,
    comparand: &'a str,
}

impl<'a> Filter<'a> {
    /// Interpret `raw` according to the column's kind.
    pub fn parse(column: &'a str, kind: ColumnKind, raw: &'a str) -> Self {
        let (op, comparand) = match kind {
            ColumnKind::Numeric => CompareOp::parse_prefixed(raw),
            ColumnKind::String | ColumnKind::Generic => (CompareOp::Eq, raw),
        };
        Self {
            column,
            kind,
            op,
            comparand,
        }
    }

    pub fn column(&self) -> &str {
        self.column
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    pub fn comparand(&self) -> &str {
        self.comparand
    }

    /// The value bound for this predicate.
    pub fn value(&self) -> Value {
        match self.kind {
            ColumnKind::String => Value::Text(self.comparand.to_string()),
            ColumnKind::Numeric | ColumnKind::Generic => Value::parse_numeric(self.comparand),
        }
    }

    /// Literal clause fragment, e.g. `" >= 1"` or `" = 'primary'"`.
    pub fn fragment(&self) -> String {
        let mut out = String::with_capacity(self.comparand.len() + 6);
        out.push(' ');
        out.push_str(self.op.as_sql());
        out.push(' ');
        self.write_literal(&mut out);
        out
    }

    fn write_literal(&self, out: &mut String) {
        match self.kind {
            ColumnKind::String => write_quoted(self.comparand, out),
            ColumnKind::Numeric | ColumnKind::Generic => out.push_str(self.comparand),
        }
    }

    /// Append `column <op> $n`. Fractional numbers are cast to `numeric`, so
    /// `timestamp > 1.5` also works against an integer column.
    pub(crate) fn append_to(&self, stmt: &mut Statement) {
        let mut literal = String::with_capacity(self.comparand.len() + 2);
        self.write_literal(&mut literal);

        stmt.push(self.column)
            .push(" ")
            .push(self.op.as_sql())
            .push(" ");
        let value = self.value();
        if value.is_fractional() {
            stmt.push_bind_cast(value, &literal, "numeric");
        } else {
            stmt.push_bind_verbatim(value, &literal);
        }
    }
}
