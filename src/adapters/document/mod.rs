//! Document-rendering collaborator
//!
//! The exporter hands a [`Document`] description to a [`DocumentRenderer`]
//! and falls back to delimited text if rendering fails. [`PdfRenderer`] is
//! the built-in implementation.

pub mod pdf;
pub mod traits;

pub use pdf::PdfRenderer;
pub use traits::{Document, DocumentRenderer};
