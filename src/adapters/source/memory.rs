//! In-memory record source
//!
//! Serves scripted rows per (store, query name). Used by tests and by the
//! `--fixtures` mode of `classroll export`.

use super::row::{Query, QueryParam, Row};
use super::traits::RecordSource;
use crate::domain::{ClassrollError, Result, Store};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

type Responder = Arc<dyn Fn(&[QueryParam]) -> Vec<Row> + Send + Sync>;

#[derive(Clone)]
enum Response {
    Fixed(Vec<Row>),
    Computed(Responder),
}

/// Scripted [`RecordSource`]
///
/// Queries with no scripted response return no rows.
///
/// ```
/// use classroll::adapters::source::{MemorySource, Query, RecordSource, Row};
/// use classroll::domain::Store;
///
/// # tokio_test_block(async {
/// let source = MemorySource::new()
///     .respond(Store::Login, "teacher_account", vec![Row::new().with("role", "teacher")]);
/// let rows = source
///     .fetch(&Query::new("teacher_account", Store::Login, "SELECT ..."))
///     .await
///     .unwrap();
/// assert_eq!(rows.len(), 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Default)]
pub struct MemorySource {
    responses: HashMap<(Store, String), Response>,
    unavailable: HashSet<Store>,
    calls: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `name` on `store` with `rows`
    pub fn respond(mut self, store: Store, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.responses
            .insert((store, name.into()), Response::Fixed(rows));
        self
    }

    /// Answer `name` on `store` by calling `f` with the bound parameters
    pub fn respond_with<F>(mut self, store: Store, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[QueryParam]) -> Vec<Row> + Send + Sync + 'static,
    {
        self.responses
            .insert((store, name.into()), Response::Computed(Arc::new(f)));
        self
    }

    /// Load fixed responses from a JSON fixture
    ///
    /// The fixture is an object keyed by `"<store>/<query name>"`, each value
    /// an array of row objects:
    ///
    /// ```json
    /// { "registrar/students_by_ids": [ { "student_id": "S1", "first_name": "Ana" } ] }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ClassrollError::Configuration`] for an unknown store, a key
    /// without `/`, or a value that is not an array of objects.
    pub fn from_fixture(fixture: &serde_json::Value) -> Result<Self> {
        let entries = fixture.as_object().ok_or_else(|| {
            ClassrollError::Configuration("Fixture must be a JSON object".to_string())
        })?;

        let mut source = MemorySource::new();
        for (key, value) in entries {
            let (store_name, query_name) = key.split_once('/').ok_or_else(|| {
                ClassrollError::Configuration(format!(
                    "Fixture key '{key}' must look like '<store>/<query>'"
                ))
            })?;
            let store = Store::ALL
                .into_iter()
                .find(|s| s.as_str() == store_name)
                .ok_or_else(|| {
                    ClassrollError::Configuration(format!("Unknown store '{store_name}' in fixture"))
                })?;
            let rows = value
                .as_array()
                .ok_or_else(|| {
                    ClassrollError::Configuration(format!("Fixture '{key}' must be an array"))
                })?
                .iter()
                .map(|v| {
                    Row::from_json(v).ok_or_else(|| {
                        ClassrollError::Configuration(format!(
                            "Fixture '{key}' contains a non-object row"
                        ))
                    })
                })
                .collect::<Result<Vec<Row>>>()?;
            source = source.respond(store, query_name, rows);
        }
        Ok(source)
    }

    /// Make every query against `store` fail
    pub fn fail_store(mut self, store: Store) -> Self {
        self.unavailable.insert(store);
        self
    }

    /// `store:name(params)` for every query served so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, query: &Query) {
        let params: Vec<String> = query.params.iter().map(QueryParam::display).collect();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{}:{}({})", query.store, query.name, params.join(", ")));
        }
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn fetch(&self, query: &Query) -> Result<Vec<Row>> {
        self.record(query);

        if self.unavailable.contains(&query.store) {
            return Err(ClassrollError::source_unavailable(
                query.store,
                format!("query '{}' failed: connection refused", query.name),
            ));
        }

        let rows = match self.responses.get(&(query.store, query.name.to_string())) {
            Some(Response::Fixed(rows)) => rows.clone(),
            Some(Response::Computed(f)) => f(&query.params),
            None => Vec::new(),
        };

        crate::log_store_query!(query.store, query.name, rows.len());
        Ok(rows)
    }

    async fn ping(&self, store: Store) -> Result<()> {
        if self.unavailable.contains(&store) {
            Err(ClassrollError::source_unavailable(store, "connection refused"))
        } else {
            Ok(())
        }
    }

    fn describe(&self) -> String {
        format!("in-memory ({} scripted queries)", self.responses.len())
    }
}
