//! Statement builders for a table profile in a tenant schema.
//!
//! ```ignore
//! use poolsql::{QueryParams, RowUpdate, TableProfile, TenantSchema};
//!
//! let schema = TenantSchema::new("Pool-Main")?;
//! let transactions = TableProfile::current_transactions();
//!
//! // SELECT
//! let stmt = transactions.select(&schema, &QueryParams::parse("timestamp=gt100&limit=10"))?;
//!
//! // INSERT ... ON CONFLICT
//! let stmt = transactions.insert(&schema, &rows)?;
//!
//! // DELETE
//! let stmt = transactions.delete_by_keys(&schema, ["r1", "r2"])?;
//! let stmt = transactions.delete_before(&schema, cutoff)?;
//! ```

mod delete;
mod insert;
mod select;

pub use delete::{delete_before, delete_by_keys};
pub use insert::insert;
pub use select::{push_filters, push_special, select};

use crate::error::QueryResult;
use crate::ident::TenantSchema;
use crate::params::QueryParams;
use crate::registry::TableProfile;
use crate::row::RowUpdate;
use crate::sql::Statement;
use crate::value::Value;

impl TableProfile {
    /// See [`select`].
    pub fn select(&self, schema: &TenantSchema, params: &QueryParams) -> QueryResult<Statement> {
        select(self, schema, params)
    }

    /// See [`insert`].
    pub fn insert(&self, schema: &TenantSchema, rows: &[RowUpdate]) -> QueryResult<Statement> {
        insert(self, schema, rows)
    }

    /// See [`delete_by_keys`].
    pub fn delete_by_keys<T: Into<Value>>(
        &self,
        schema: &TenantSchema,
        keys: impl IntoIterator<Item = T>,
    ) -> QueryResult<Statement> {
        delete_by_keys(self, schema, keys)
    }

    /// See [`delete_before`].
    pub fn delete_before(
        &self,
        schema: &TenantSchema,
        threshold: impl Into<Value>,
    ) -> QueryResult<Statement> {
        delete_before(self, schema, threshold)
    }
}
