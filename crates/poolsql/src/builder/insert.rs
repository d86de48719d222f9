//! Batch INSERT with the table's conflict resolution.

use crate::error::{QueryError, QueryResult};
use crate::ident::TenantSchema;
use crate::registry::{ConflictAction, TableProfile};
use crate::row::RowUpdate;
use crate::sql::Statement;
use crate::value::Value;

/// Statement lines start here.
pub(crate) const LINE: &str = "\n      ";
/// Column lists, tuple values and update assignments sit one level deeper.
pub(crate) const NESTED: &str = "\n        ";

/// Batch `INSERT ... ON CONFLICT ON CONSTRAINT <name> DO ...;`, laid out as
///
/// ```text
///
///       INSERT INTO "<schema>".<table> (
///         <col>, <col>)
///       VALUES (
///         <v>,
///         <v>), (
///         ...)
///       ON CONFLICT ON CONSTRAINT <name>
///       DO NOTHING RETURNING <col>;
/// ```
///
/// Every row contributes one tuple, in the table's declared column order. A
/// column missing from a row binds `NULL`.
pub fn insert(
    profile: &TableProfile,
    schema: &TenantSchema,
    rows: &[RowUpdate],
) -> QueryResult<Statement> {
    if rows.is_empty() {
        return Err(QueryError::validation(format!(
            "insert into {} requires at least one row",
            profile.table()
        )));
    }

    let mut stmt = Statement::new(LINE);
    stmt.push("INSERT INTO ")
        .push_table(schema, profile.table())
        .push(" (")
        .push(NESTED);
    for (i, column) in profile.columns().iter().enumerate() {
        if i > 0 {
            if profile.column_breaks().contains(&i) {
                stmt.push(",").push(NESTED);
            } else {
                stmt.push(", ");
            }
        }
        stmt.push_ident(&column.name);
    }
    stmt.push(")").push(LINE).push("VALUES ");

    for (r, row) in rows.iter().enumerate() {
        if r > 0 {
            stmt.push(", ");
        }
        stmt.push("(");
        for (i, column) in profile.columns().iter().enumerate() {
            if i > 0 {
                stmt.push(",");
            }
            stmt.push(NESTED)
                .push_bind(row.get(column.name.as_str()).cloned().unwrap_or(Value::Null));
        }
        stmt.push(")");
    }

    stmt.push(LINE)
        .push("ON CONFLICT ON CONSTRAINT ")
        .push_ident(profile.unique_constraint())
        .push(LINE);
    match profile.conflict() {
        ConflictAction::DoNothing { returning } => {
            stmt.push("DO NOTHING RETURNING ").push_ident(returning);
        }
        ConflictAction::DoUpdate { columns } => {
            stmt.push("DO UPDATE SET");
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    stmt.push(",");
                }
                stmt.push(NESTED)
                    .push_ident(column)
                    .push(" = EXCLUDED.")
                    .push_ident(column);
            }
        }
    }
    stmt.push(";");

    tracing::trace!(
        target: "poolsql.build",
        table = %profile.table(),
        rows = rows.len(),
        "built insert"
    );
    Ok(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> TenantSchema {
        TenantSchema::new("Pool-Main").unwrap()
    }

    fn transaction(round: &str) -> RowUpdate {
        RowUpdate::new()
            .set("timestamp", 1)
            .set("round", round)
            .set("type", "primary")
    }

    #[test]
    fn do_nothing_returns_key() {
        let profile = TableProfile::current_transactions();
        let stmt = insert(&profile, &schema(), &[transaction("r1")]).unwrap();
        assert_eq!(
            stmt.to_sql(),
            r#"
      INSERT INTO "Pool-Main".current_transactions (
        timestamp, round, type)
      VALUES (
        $1,
        $2,
        $3)
      ON CONFLICT ON CONSTRAINT current_transactions_unique
      DO NOTHING RETURNING round;"#
        );
        assert_eq!(
            stmt.to_literal_sql(),
            r#"
      INSERT INTO "Pool-Main".current_transactions (
        timestamp, round, type)
      VALUES (
        1,
        'r1',
        'primary')
      ON CONFLICT ON CONSTRAINT current_transactions_unique
      DO NOTHING RETURNING round;"#
        );
    }

    #[test]
    fn tuples_follow_declared_order() {
        let profile = TableProfile::current_transactions();
        let row = RowUpdate::new()
            .set("type", "primary")
            .set("round", "r1")
            .set("timestamp", 1)
            .set("extra", "ignored");
        let stmt = insert(&profile, &schema(), &[row]).unwrap();
        assert_eq!(
            stmt.params().cloned().collect::<Vec<_>>(),
            [Value::Int(1), Value::from("r1"), Value::from("primary")]
        );
    }

    #[test]
    fn missing_columns_bind_null() {
        let profile = TableProfile::current_transactions();
        let row = RowUpdate::new().set("round", "r1");
        let stmt = insert(&profile, &schema(), &[row]).unwrap();
        assert_eq!(
            stmt.params().cloned().collect::<Vec<_>>(),
            [Value::Null, Value::from("r1"), Value::Null]
        );
        assert!(stmt.to_literal_sql().contains("(\n        NULL,\n        'r1',\n        NULL)"));
    }

    #[test]
    fn placeholders_continue_across_rows() {
        let profile = TableProfile::current_transactions();
        let stmt = insert(&profile, &schema(), &[transaction("r1"), transaction("r2")]).unwrap();
        assert!(stmt.to_sql().contains("$3), (\n        $4,"));
        assert!(stmt.to_sql().contains("$6)\n      ON CONFLICT"));
        assert_eq!(stmt.param_count(), 6);
    }

    #[test]
    fn rejects_empty_batch() {
        let profile = TableProfile::current_network();
        let err = insert(&profile, &schema(), &[]).unwrap_err();
        assert!(err.is_validation());
    }
}
