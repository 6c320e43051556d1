//! External system integrations for classroll.
//!
//! - [`source`] - the record source contract and an in-memory implementation
//! - [`postgresql`] - the PostgreSQL record source, one pool per logical store
//! - [`document`] - the document-rendering collaborator and a PDF renderer
//!
//! Adapters isolate I/O from the core. The core only sees the
//! [`source::RecordSource`] and [`document::DocumentRenderer`] traits, so
//! tests swap in scripted sources and failing renderers.

pub mod document;
pub mod postgresql;
pub mod source;
