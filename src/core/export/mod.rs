//! Report Exporter
//!
//! This module turns a [`ReportDataset`](crate::core::report::ReportDataset)
//! into a downloadable file:
//! - Format selection from a request token, defaulting to delimited text
//! - Delimited, spreadsheet and document rendering
//! - Deterministic fallback to delimited text when the document renderer fails
//! - A no-data outcome for empty datasets, decided before any rendering
//! - Filenames derived from the report kind, filters and generation date

pub mod checksum;
pub mod delimited;
pub mod document;
pub mod exporter;
pub mod filename;
pub mod format;

pub use exporter::{ExportOptions, ExportOutcome, ExportState, ExportedFile, Exporter};
pub use filename::export_filename;
pub use format::ReportFormat;
