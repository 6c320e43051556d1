//! PostgreSQL record source
//!
//! Holds one [`PostgreSQLClient`] per logical store and routes each query to
//! the client for `query.store`.

use super::client::PostgreSQLClient;
use super::models::{to_row, to_sql_param, BoxedParam};
use crate::adapters::source::{Query, RecordSource, Row};
use crate::domain::{Result, Store};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// [`RecordSource`] backed by three PostgreSQL pools
pub struct PostgresSource {
    registrar: Arc<PostgreSQLClient>,
    teacher: Arc<PostgreSQLClient>,
    login: Arc<PostgreSQLClient>,
}

impl PostgresSource {
    pub fn new(
        registrar: PostgreSQLClient,
        teacher: PostgreSQLClient,
        login: PostgreSQLClient,
    ) -> Self {
        Self {
            registrar: Arc::new(registrar),
            teacher: Arc::new(teacher),
            login: Arc::new(login),
        }
    }

    /// Client serving `store`
    pub fn client(&self, store: Store) -> &Arc<PostgreSQLClient> {
        match store {
            Store::Registrar => &self.registrar,
            Store::Teacher => &self.teacher,
            Store::Login => &self.login,
        }
    }
}

#[async_trait]
impl RecordSource for PostgresSource {
    async fn fetch(&self, query: &Query) -> Result<Vec<Row>> {
        let boxed: Vec<BoxedParam> = query.params.iter().map(to_sql_param).collect();
        let params: Vec<&(dyn ToSql + Sync)> = boxed
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        let rows = self
            .client(query.store)
            .query(query.sql, &params)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    store = %query.store,
                    query = query.name,
                    error = %e,
                    "Store query failed"
                );
            })?;

        let rows: Vec<Row> = rows.iter().map(to_row).collect();
        crate::log_store_query!(query.store, query.name, rows.len());
        Ok(rows)
    }

    async fn ping(&self, store: Store) -> Result<()> {
        self.client(store).test_connection().await
    }

    fn describe(&self) -> String {
        Store::ALL
            .iter()
            .map(|store| format!("{store}={}", self.client(*store).connection_string_safe()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
