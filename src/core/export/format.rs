//! Export formats and format-token selection

use serde::Serialize;
use std::fmt;

/// Output encodings the exporter can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Comma-separated text
    Delimited,
    /// Tab-separated text with a spreadsheet content type
    Spreadsheet,
    /// Paginated PDF document
    Document,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [
        ReportFormat::Delimited,
        ReportFormat::Spreadsheet,
        ReportFormat::Document,
    ];

    /// Map a request token to a format
    ///
    /// Unknown or empty tokens select [`ReportFormat::Delimited`]; the second
    /// value tells whether the token was recognised.
    ///
    /// ```
    /// use classroll::core::export::ReportFormat;
    ///
    /// assert_eq!(ReportFormat::select("PDF"), (ReportFormat::Document, true));
    /// assert_eq!(ReportFormat::select("excel"), (ReportFormat::Spreadsheet, true));
    /// assert_eq!(ReportFormat::select("docx"), (ReportFormat::Delimited, false));
    /// ```
    pub fn select(token: &str) -> (ReportFormat, bool) {
        match token.trim().to_ascii_lowercase().as_str() {
            "delimited" | "csv" => (ReportFormat::Delimited, true),
            "spreadsheet" | "excel" | "xls" => (ReportFormat::Spreadsheet, true),
            "document" | "pdf" => (ReportFormat::Document, true),
            _ => (ReportFormat::Delimited, false),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Delimited => "delimited",
            ReportFormat::Spreadsheet => "spreadsheet",
            ReportFormat::Document => "document",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Delimited => "text/csv; charset=utf-8",
            ReportFormat::Spreadsheet => "application/vnd.ms-excel; charset=utf-8",
            ReportFormat::Document => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Delimited => "csv",
            ReportFormat::Spreadsheet => "xls",
            ReportFormat::Document => "pdf",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
