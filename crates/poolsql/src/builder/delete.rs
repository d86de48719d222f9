//! DELETE by key list and by time threshold.

use super::insert::LINE;
use crate::error::{QueryError, QueryResult};
use crate::ident::TenantSchema;
use crate::registry::TableProfile;
use crate::sql::Statement;
use crate::value::Value;

/// `DELETE FROM "<schema>".<table>` / `WHERE <key> IN (...);` on two lines.
///
/// Pass the raw keys (`"r1"`), not pre-quoted SQL strings (`"'r1'"`): every
/// key is bound, and the literal form quotes text keys itself. An empty key
/// list renders `IN (NULL)`, which matches nothing.
pub fn delete_by_keys<T: Into<Value>>(
    profile: &TableProfile,
    schema: &TenantSchema,
    keys: impl IntoIterator<Item = T>,
) -> QueryResult<Statement> {
    let key = profile.key_column().ok_or_else(|| {
        QueryError::validation(format!("table {} has no key column", profile.table()))
    })?;

    let mut stmt = Statement::new(LINE);
    stmt.push("DELETE FROM ")
        .push_table(schema, profile.table())
        .push(LINE)
        .push("WHERE ")
        .push_ident(key)
        .push(" IN (")
        .push_bind_list(keys)
        .push(");");

    tracing::trace!(
        target: "poolsql.build",
        table = %profile.table(),
        keys = stmt.param_count(),
        "built delete by keys"
    );
    Ok(stmt)
}

/// `DELETE FROM "<schema>".<table>` / `WHERE <time> < <threshold>;` on two lines.
pub fn delete_before(
    profile: &TableProfile,
    schema: &TenantSchema,
    threshold: impl Into<Value>,
) -> QueryResult<Statement> {
    let time = profile.time_column().ok_or_else(|| {
        QueryError::validation(format!("table {} has no time column", profile.table()))
    })?;

    let mut stmt = Statement::new(LINE);
    stmt.push("DELETE FROM ")
        .push_table(schema, profile.table())
        .push(LINE)
        .push("WHERE ")
        .push_ident(time)
        .push(" < ")
        .push_bind(threshold)
        .push(";");

    tracing::trace!(
        target: "poolsql.build",
        table = %profile.table(),
        "built delete before threshold"
    );
    Ok(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> TenantSchema {
        TenantSchema::new("Pool-Main").unwrap()
    }

    #[test]
    fn deletes_rounds() {
        let profile = TableProfile::current_transactions();
        let stmt = delete_by_keys(&profile, &schema(), ["r1", "r2"]).unwrap();
        assert_eq!(
            stmt.to_sql(),
            r#"
      DELETE FROM "Pool-Main".current_transactions
      WHERE round IN ($1, $2);"#
        );
        assert_eq!(
            stmt.to_literal_sql(),
            r#"
      DELETE FROM "Pool-Main".current_transactions
      WHERE round IN ('r1', 'r2');"#
        );
    }

    #[test]
    fn empty_key_list_matches_nothing() {
        let profile = TableProfile::current_transactions();
        let stmt = delete_by_keys(&profile, &schema(), Vec::<String>::new()).unwrap();
        assert_eq!(
            stmt.to_sql(),
            r#"
      DELETE FROM "Pool-Main".current_transactions
      WHERE round IN (NULL);"#
        );
    }

    #[test]
    fn table_without_key_column_is_rejected() {
        let profile = TableProfile::current_network();
        assert!(delete_by_keys(&profile, &schema(), ["x"]).is_err());
    }

    #[test]
    fn deletes_inactive() {
        let profile = TableProfile::current_transactions();
        let stmt = delete_before(&profile, &schema(), 1_700_000_000_000_i64).unwrap();
        assert_eq!(
            stmt.to_sql(),
            r#"
      DELETE FROM "Pool-Main".current_transactions
      WHERE timestamp < $1;"#
        );
        assert_eq!(
            stmt.to_literal_sql(),
            r#"
      DELETE FROM "Pool-Main".current_transactions
      WHERE timestamp < 1700000000000;"#
        );
    }

    #[test]
    fn table_without_time_column_is_rejected() {
        let profile = TableProfile::builder("t")
            .numeric("a")
            .unique_constraint("t_unique")
            .on_conflict_update(&["a"])
            .build()
            .unwrap();
        assert!(delete_before(&profile, &schema(), 1).is_err());
    }
}
