//! Document-rendering collaborator contract

use crate::domain::RenderFailure;
use serde::Serialize;

/// Structured description of a paginated report document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    /// Period, scope and summary lines printed under the title
    pub metadata: Vec<String>,
    /// Column labels of the detail table
    pub columns: Vec<String>,
    /// Detail table, one entry per row, already formatted as text
    pub rows: Vec<Vec<String>>,
    /// Text printed on every page next to the page number
    pub footer: Option<String>,
}

/// Turns a [`Document`] into bytes
///
/// Any failure is reported as a [`RenderFailure`]; callers are expected to
/// recover from it rather than propagate it.
pub trait DocumentRenderer: Send + Sync {
    /// Render the document
    ///
    /// # Errors
    ///
    /// Returns a [`RenderFailure`] if the document cannot be produced.
    fn render(&self, document: &Document) -> Result<Vec<u8>, RenderFailure>;

    /// Short renderer name for logs
    fn name(&self) -> &'static str;
}
