//! Record source factory

use super::traits::RecordSource;
use crate::adapters::postgresql::{PostgreSQLClient, PostgresSource};
use crate::config::StoresConfig;
use crate::domain::{Result, Store};
use std::sync::Arc;

/// Create the production record source from the store configuration
///
/// One pooled client is built per logical store, even when two stores share
/// a server. Pools connect lazily, so this succeeds without network access;
/// use [`RecordSource::ping`] to check reachability.
///
/// # Errors
///
/// Returns an error if a connection string cannot be parsed or a pool
/// cannot be built.
pub async fn create_record_source(
    config: &StoresConfig,
) -> Result<Arc<dyn RecordSource + Send + Sync>> {
    tracing::info!("Creating PostgreSQL record source");

    let registrar = PostgreSQLClient::new(Store::Registrar, config.registrar.clone()).await?;
    let teacher = PostgreSQLClient::new(Store::Teacher, config.teacher.clone()).await?;
    let login = PostgreSQLClient::new(Store::Login, config.login.clone()).await?;

    let source = PostgresSource::new(registrar, teacher, login);
    tracing::info!(source = %source.describe(), "Record source ready");

    Ok(Arc::new(source) as Arc<dyn RecordSource + Send + Sync>)
}
