//! Record source abstraction
//!
//! The core talks to the registrar, teacher and login stores only through
//! this trait. Implementations are pure I/O: no filtering, no reordering,
//! no business rules.

use super::row::{Query, Row};
use crate::domain::{Result, Store};
use async_trait::async_trait;

/// Parameterized query execution against the three logical stores
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Run `query` against `query.store` and return its rows
    ///
    /// Rows must come back in the order the store produced them; the join
    /// normalizer relies on first-seen ordering.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ClassrollError::SourceUnavailable`] when the
    /// store cannot be reached or rejects the query.
    async fn fetch(&self, query: &Query) -> Result<Vec<Row>>;

    /// Check that a store answers
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ClassrollError::SourceUnavailable`] on failure.
    async fn ping(&self, store: Store) -> Result<()>;

    /// Human-readable description for logs, with credentials redacted
    fn describe(&self) -> String;
}
