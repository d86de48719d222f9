//! SELECT with filters, ordering and pagination.

use crate::condition::Filter;
use crate::error::QueryResult;
use crate::ident::{Ident, TenantSchema};
use crate::params::{QueryParams, SpecialParams};
use crate::registry::TableProfile;
use crate::sql::Statement;
use crate::value::Value;

/// `SELECT * FROM "<schema>".<table> [WHERE ...] [ORDER BY ...] [LIMIT ...] [OFFSET ...];`
///
/// Fails only when `order` is not a plain identifier.
pub fn select(
    profile: &TableProfile,
    schema: &TenantSchema,
    params: &QueryParams,
) -> QueryResult<Statement> {
    let mut stmt = Statement::new("SELECT * FROM ");
    stmt.push_table(schema, profile.table());
    push_filters(&mut stmt, profile, params);
    push_special(&mut stmt, &params.special())?;
    stmt.push(";");

    tracing::trace!(
        target: "poolsql.build",
        table = %profile.table(),
        param_count = stmt.param_count(),
        "built select"
    );
    Ok(stmt)
}

/// Append ` WHERE a <op> $1 AND b <op> $2 ...` for every recognized key, in
/// parameter order. Unrecognized keys are skipped; nothing is appended if no
/// key is recognized.
pub fn push_filters(stmt: &mut Statement, profile: &TableProfile, params: &QueryParams) {
    let recognized = params
        .iter()
        .filter_map(|(key, raw)| profile.column(key).map(|c| (c, raw)));

    for (idx, (column, raw)) in recognized.enumerate() {
        stmt.push(if idx == 0 { " WHERE " } else { " AND " });
        Filter::parse(column.name.as_str(), column.kind, raw).append_to(stmt);
    }
}

/// Append ` ORDER BY <col> ASC|DESC`, ` LIMIT $n` and ` OFFSET $n`, always in
/// that order.
pub fn push_special(stmt: &mut Statement, special: &SpecialParams<'_>) -> QueryResult<()> {
    if special.has_ordering() {
        let column = Ident::parse(special.order_column())?;
        stmt.push(" ORDER BY ")
            .push_ident(&column)
            .push(if special.is_ascending() { " ASC" } else { " DESC" });
    }
    if let Some(limit) = special.limit {
        stmt.push(" LIMIT ")
            .push_bind_verbatim(Value::parse_numeric(limit), limit);
    }
    if let Some(offset) = special.offset {
        stmt.push(" OFFSET ")
            .push_bind_verbatim(Value::parse_numeric(offset), offset);
    }
    Ok(())
}
