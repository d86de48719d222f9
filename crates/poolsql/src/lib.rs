//! # poolsql
//!
//! Compiles untrusted HTTP-style filter parameters into Postgres statements for
//! a schema-per-pool database.
//!
//! ## Features
//!
//! - **Ordered filters**: predicates follow the order of the incoming parameters
//! - **Typed columns**: every filterable column is `Numeric`, `String` or `Generic`
//! - **Relational prefixes**: `lt`, `le`, `gt`, `ge`, `ne` on numeric columns
//! - **Bound values**: statements carry `$n` placeholders and their values separately
//! - **Batch upserts**: multi-row INSERT with per-table `ON CONFLICT` handling
//! - **Literal rendering**: the legacy inlined form, for snapshot comparisons
//!
//! ## Example
//!
//! ```ignore
//! use poolsql::{QueryParams, TableProfile, TenantSchema};
//!
//! let schema = TenantSchema::new("Pool-Main")?;
//! let network = TableProfile::current_network();
//!
//! let stmt = network.select(&schema, &QueryParams::parse("type=primary"))?;
//! assert_eq!(
//!     stmt.to_literal_sql(),
//!     r#"SELECT * FROM "Pool-Main".current_network WHERE type = 'primary';"#
//! );
//!
//! let rows = stmt.fetch_all(&client).await?;
//! ```

pub mod builder;
pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod ident;
pub mod params;
pub mod registry;
pub mod row;
pub mod sql;
pub mod trace;
pub mod value;

pub use client::{GenericClient, TracedClient};
pub use condition::{CompareOp, Filter};
pub use config::{ClientConfig, Config, Language, LogLevel, LoggerConfig};
pub use error::{QueryError, QueryResult};
pub use ident::{Ident, TenantSchema};
pub use params::{QueryParams, SpecialParams};
pub use registry::{Column, ColumnKind, ConflictAction, TableProfile, TableProfileBuilder};
pub use row::{NetworkRow, RowUpdate, TransactionRow};
pub use sql::Statement;
pub use trace::SqlTracer;
pub use value::Value;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::create_pool;
