//! Download filenames
//!
//! `{kind}_{class|all}_{start}_to_{end}_{generated}.{ext}`, reduced to
//! characters that are safe in every file system and in a quoted
//! `Content-Disposition` header.

use super::format::ReportFormat;
use crate::core::report::ReportDataset;

const MAX_STEM_LEN: usize = 120;

/// Keep ASCII letters, digits and `-`; collapse everything else into `_`
pub fn sanitize(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut last_was_underscore = false;

    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            result.push(c.to_ascii_lowercase());
            last_was_underscore = false;
        } else if !last_was_underscore && !result.is_empty() {
            result.push('_');
            last_was_underscore = true;
        }
    }

    result.trim_matches('_').to_string()
}

/// Deterministic filename for `dataset` delivered as `format`
///
/// ```
/// # use classroll::core::export::filename::sanitize;
/// assert_eq!(sanitize("Math 7/A \"honors\""), "math_7_a_honors");
/// ```
pub fn export_filename(dataset: &ReportDataset, format: ReportFormat) -> String {
    let filters = &dataset.filters;
    let parts = [
        dataset.kind.as_str().to_string(),
        filters.class_scope().to_string(),
        filters.start_date.format("%Y-%m-%d").to_string(),
        "to".to_string(),
        filters.end_date.format("%Y-%m-%d").to_string(),
        dataset.generated_at.format("%Y%m%d").to_string(),
    ];

    let mut stem = parts
        .iter()
        .map(|p| sanitize(p))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if stem.len() > MAX_STEM_LEN {
        stem.truncate(MAX_STEM_LEN);
        stem = stem.trim_end_matches('_').to_string();
    }
    if stem.is_empty() {
        stem = "report".to_string();
    }

    format!("{stem}.{}", format.extension())
}
