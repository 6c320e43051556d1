//! PostgreSQL record stores
//!
//! Production implementation of the record source: one connection pool per
//! logical store, read-only queries under a statement timeout.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgresSource;
pub use client::PostgreSQLClient;
