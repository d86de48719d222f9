//! Connection pool wiring (feature `pool`).
//!
//! Pooling itself is `deadpool-postgres`; this only turns a [`ClientConfig`]
//! into a pool whose clients implement [`GenericClient`](crate::GenericClient).

use crate::config::ClientConfig;
use crate::error::{QueryError, QueryResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a pool from the `[client]` section of the configuration.
///
/// ```ignore
/// let config = poolsql::Config::load("config.toml")?;
/// let pool = poolsql::create_pool(&config.client, 16)?;
/// let client = pool.get().await?;
/// let rows = stmt.fetch_all(&client).await?;
/// ```
pub fn create_pool(config: &ClientConfig, max_size: usize) -> QueryResult<Pool> {
    if config.tls {
        return Err(QueryError::Connection(
            "TLS connections need a TLS connector; build the pool with deadpool_postgres directly"
                .to_string(),
        ));
    }

    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(config.to_pg_config(), NoTls, manager_config);
    Pool::builder(mgr)
        .max_size(max_size)
        .build()
        .map_err(|e| QueryError::Pool(e.to_string()))
}
