//! PostgreSQL client implementation
//!
//! One [`PostgreSQLClient`] wraps the connection pool for one logical store.

use crate::config::schema::PostgreSQLConfig;
use crate::domain::{ClassrollError, Result, Store};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

/// Pooled, read-only PostgreSQL access for one store
pub struct PostgreSQLClient {
    store: Store,
    pool: Pool,
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new client
    ///
    /// The pool connects lazily; nothing is sent over the network here.
    ///
    /// # Errors
    ///
    /// Returns [`ClassrollError::Configuration`] if the connection string
    /// cannot be parsed, TLS cannot be set up, or the pool cannot be built.
    pub async fn new(store: Store, config: PostgreSQLConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .parse()
            .map_err(|e| {
                ClassrollError::Configuration(format!(
                    "Invalid PostgreSQL connection string for the {store} store: {e}"
                ))
            })?;
        pg_config.ssl_mode(ssl_mode(&config.ssl_mode));
        pg_config.connect_timeout(Duration::from_secs(config.connection_timeout_seconds));

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = if config.uses_tls() {
            let connector = tls_connector(&config.ssl_mode)?;
            Manager::from_config(pg_config, MakeTlsConnector::new(connector), manager_config)
        } else {
            Manager::from_config(pg_config, NoTls, manager_config)
        };

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                ClassrollError::Configuration(format!(
                    "Failed to create connection pool for the {store} store: {e}"
                ))
            })?;

        Ok(Self {
            store,
            pool,
            config,
        })
    }

    pub fn store(&self) -> Store {
        self.store
    }

    /// Run `SELECT 1` on a pooled connection
    ///
    /// # Errors
    ///
    /// Returns [`ClassrollError::SourceUnavailable`] if the store does not answer.
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| self.unavailable(format!("Connection test failed: {e}")))?;

        tracing::info!(store = %self.store, "PostgreSQL connection test successful");
        Ok(())
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns [`ClassrollError::SourceUnavailable`] if no connection can be obtained.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| self.unavailable(format!("Failed to get connection from pool: {e}")))
    }

    /// Execute a query under the configured statement timeout
    ///
    /// # Errors
    ///
    /// Returns [`ClassrollError::SourceUnavailable`] if the query fails.
    pub async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>> {
        let client = self.get_connection().await?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client
            .batch_execute(&timeout_query)
            .await
            .map_err(|e| self.unavailable(format!("Failed to set statement timeout: {e}")))?;

        client
            .query(sql, params)
            .await
            .map_err(|e| self.unavailable(format!("Query failed: {e}")))
    }

    /// Connection string with credentials removed
    pub fn connection_string_safe(&self) -> String {
        self.config.connection_string.expose_secret().redacted()
    }

    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }

    fn unavailable(&self, message: String) -> ClassrollError {
        ClassrollError::source_unavailable(self.store, message)
    }
}

/// Map a libpq ssl mode onto what tokio-postgres supports
fn ssl_mode(mode: &str) -> SslMode {
    match mode {
        "disable" => SslMode::Disable,
        "require" | "verify-ca" | "verify-full" => SslMode::Require,
        _ => SslMode::Prefer,
    }
}

/// Certificate checks follow libpq: only the verify modes validate
fn tls_connector(mode: &str) -> Result<native_tls::TlsConnector> {
    let mut builder = native_tls::TlsConnector::builder();
    match mode {
        "verify-full" => {}
        "verify-ca" => {
            builder.danger_accept_invalid_hostnames(true);
        }
        _ => {
            builder.danger_accept_invalid_certs(true);
        }
    }
    builder
        .build()
        .map_err(|e| ClassrollError::Configuration(format!("Failed to set up TLS: {e}")))
}
