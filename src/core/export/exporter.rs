//! Report Exporter
//!
//! Per request: `Requested → FormatSelected → Rendered | Fallback → Delivered`.
//! Rendering is a two-step pipeline: [`Exporter::try_render`] returns the
//! requested encoding or a [`RenderFailure`], and [`Exporter::on_failure`]
//! turns a failure into delimited text. An empty dataset never reaches a
//! renderer.

use super::checksum::sha256_hex;
use super::filename::export_filename;
use super::format::ReportFormat;
use super::{delimited, document};
use crate::adapters::document::{DocumentRenderer, PdfRenderer};
use crate::config::ExportConfig;
use crate::core::report::{ReportDataset, ReportOutcome, NO_DATA_MESSAGE};
use crate::domain::RenderFailure;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// Exporter state, logged on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Requested,
    FormatSelected,
    Rendered,
    Fallback,
    Delivered,
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportState::Requested => "requested",
            ExportState::FormatSelected => "format_selected",
            ExportState::Rendered => "rendered",
            ExportState::Fallback => "fallback",
            ExportState::Delivered => "delivered",
        };
        f.write_str(name)
    }
}

/// A downloadable export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
    pub requested: ReportFormat,
    pub delivered: ReportFormat,
    pub fell_back: bool,
    /// Hex SHA-256 of `bytes`
    pub sha256: String,
}

/// What the caller gets back from an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    File(ExportedFile),
    /// Nothing matched the filters; no renderer was run
    NoData { message: String },
}

impl ExportOutcome {
    fn no_data() -> Self {
        ExportOutcome::NoData {
            message: NO_DATA_MESSAGE.to_string(),
        }
    }
}

/// Exporter settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Prefix delimited text with a UTF-8 byte-order mark
    pub delimited_bom: bool,
    pub school_name: String,
    /// Format used when the request names none
    pub default_format: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimited_bom: true,
            school_name: "Teacher Portal".to_string(),
            default_format: "delimited".to_string(),
        }
    }
}

impl From<&ExportConfig> for ExportOptions {
    fn from(config: &ExportConfig) -> Self {
        Self {
            delimited_bom: config.delimited_bom,
            school_name: config.school_name.clone(),
            default_format: config.default_format.clone(),
        }
    }
}

/// Serializes report datasets into downloadable files
#[derive(Clone)]
pub struct Exporter {
    renderer: Arc<dyn DocumentRenderer>,
    options: ExportOptions,
}

impl Exporter {
    pub fn new(renderer: Arc<dyn DocumentRenderer>, options: ExportOptions) -> Self {
        Self { renderer, options }
    }

    /// Exporter with the built-in PDF renderer
    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(
            Arc::new(PdfRenderer::new(config.document_rows_per_page)),
            ExportOptions::from(config),
        )
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export a built report; a `NoData` report passes straight through
    pub fn export_outcome(&self, outcome: &ReportOutcome, format_token: &str) -> ExportOutcome {
        match outcome {
            ReportOutcome::Ready(dataset) => self.export(dataset, format_token),
            ReportOutcome::NoData { message } => ExportOutcome::NoData {
                message: message.clone(),
            },
        }
    }

    /// Export `dataset` in the format named by `format_token`
    ///
    /// Never fails: unknown tokens select delimited text, renderer failures
    /// fall back to delimited text, and an empty dataset yields
    /// [`ExportOutcome::NoData`] before any rendering happens.
    pub fn export(&self, dataset: &ReportDataset, format_token: &str) -> ExportOutcome {
        let started = Instant::now();
        tracing::debug!(
            state = %ExportState::Requested,
            report = %dataset.kind,
            token = format_token,
            rows = dataset.rows.len(),
            "Export requested"
        );

        if dataset.is_empty() {
            tracing::info!(report = %dataset.kind, "Nothing to export for the selected criteria");
            return ExportOutcome::no_data();
        }

        let token = if format_token.trim().is_empty() {
            self.options.default_format.as_str()
        } else {
            format_token
        };
        let (requested, recognised) = ReportFormat::select(token);
        if !recognised {
            tracing::debug!(token, "Unrecognised export format, using delimited text");
        }
        tracing::debug!(
            state = %ExportState::FormatSelected,
            format = %requested,
            "Format selected"
        );

        let (bytes, delivered) = match self.try_render(requested, dataset) {
            Ok(bytes) => {
                tracing::debug!(
                    state = %ExportState::Rendered,
                    format = %requested,
                    bytes = bytes.len(),
                    "Rendered"
                );
                (bytes, requested)
            }
            Err(failure) => (self.on_failure(failure, dataset), ReportFormat::Delimited),
        };

        let file = ExportedFile {
            sha256: sha256_hex(&bytes),
            filename: export_filename(dataset, delivered),
            content_type: delivered.content_type(),
            fell_back: delivered != requested,
            requested,
            delivered,
            bytes,
        };

        tracing::debug!(
            state = %ExportState::Delivered,
            format = %delivered,
            sha256 = %file.sha256,
            "Delivered"
        );
        crate::log_export_delivered!(
            file.filename,
            file.bytes.len(),
            file.fell_back,
            started.elapsed()
        );
        ExportOutcome::File(file)
    }

    /// Render `dataset` in exactly `format`
    ///
    /// # Errors
    ///
    /// Only the document renderer can fail; an empty or panicking render is
    /// reported as a [`RenderFailure`] as well.
    pub fn try_render(
        &self,
        format: ReportFormat,
        dataset: &ReportDataset,
    ) -> Result<Vec<u8>, RenderFailure> {
        match format {
            ReportFormat::Delimited => Ok(self.render_delimited(dataset)),
            ReportFormat::Spreadsheet => Ok(delimited::render(dataset, '\t', true)),
            ReportFormat::Document => {
                let description = document::describe(dataset, &self.options.school_name);
                let renderer = self.renderer.as_ref();
                let bytes = catch_unwind(AssertUnwindSafe(|| renderer.render(&description)))
                    .map_err(|_| {
                        RenderFailure::Unavailable(format!(
                            "{} renderer panicked",
                            renderer.name()
                        ))
                    })??;
                if bytes.is_empty() {
                    return Err(RenderFailure::Empty);
                }
                Ok(bytes)
            }
        }
    }

    /// Recover from a render failure with delimited text
    pub fn on_failure(&self, failure: RenderFailure, dataset: &ReportDataset) -> Vec<u8> {
        tracing::warn!(
            state = %ExportState::Fallback,
            report = %dataset.kind,
            renderer = self.renderer.name(),
            error = %failure,
            "Document rendering failed, falling back to delimited text"
        );
        self.render_delimited(dataset)
    }

    fn render_delimited(&self, dataset: &ReportDataset) -> Vec<u8> {
        delimited::render(dataset, ',', self.options.delimited_bom)
    }
}
