//! Execution seam.
//!
//! Building statements never touches the database. Running them goes through
//! [`GenericClient`], which is implemented for plain `tokio-postgres` clients,
//! transactions, pooled clients (feature `pool`) and [`TracedClient`].

use crate::error::{QueryError, QueryResult};
use crate::trace::SqlTracer;
use std::future::Future;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A trait that unifies database clients and transactions.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = QueryResult<Vec<Row>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = QueryResult<u64>> + Send;
}

impl GenericClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<Vec<Row>> {
        tokio_postgres::Client::query(self, sql, params)
            .await
            .map_err(QueryError::from_db_error)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<u64> {
        tokio_postgres::Client::execute(self, sql, params)
            .await
            .map_err(QueryError::from_db_error)
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<Vec<Row>> {
        tokio_postgres::Transaction::query(self, sql, params)
            .await
            .map_err(QueryError::from_db_error)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<u64> {
        tokio_postgres::Transaction::execute(self, sql, params)
            .await
            .map_err(QueryError::from_db_error)
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<Vec<Row>> {
        // Delegate to the deref target (ClientWrapper / tokio_postgres::Client).
        GenericClient::query(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<u64> {
        GenericClient::execute(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::ClientWrapper {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<Vec<Row>> {
        GenericClient::query(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<u64> {
        GenericClient::execute(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<Vec<Row>> {
        GenericClient::query(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<u64> {
        GenericClient::execute(&**self, sql, params).await
    }
}

/// Wraps a client and logs every statement through a [`SqlTracer`] before
/// running it.
///
/// ```ignore
/// let client = TracedClient::new(client, SqlTracer::from_config(&config.logger));
/// stmt.fetch_all(&client).await?;
/// ```
#[derive(Debug)]
pub struct TracedClient<C> {
    inner: C,
    tracer: SqlTracer,
    tag: Option<String>,
}

impl<C: GenericClient> TracedClient<C> {
    pub fn new(inner: C, tracer: SqlTracer) -> Self {
        Self {
            inner,
            tracer,
            tag: None,
        }
    }

    /// Attach a tag (for example the tenant schema) to every event.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: GenericClient> GenericClient for TracedClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<Vec<Row>> {
        self.tracer.emit(self.tag.as_deref(), sql, params.len());
        self.inner.query(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<u64> {
        self.tracer.emit(self.tag.as_deref(), sql, params.len());
        self.inner.execute(sql, params).await
    }
}
