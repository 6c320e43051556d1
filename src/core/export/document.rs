//! Report dataset → document description

use crate::adapters::document::Document;
use crate::core::report::ReportDataset;

/// Describe `dataset` as a paginated document
///
/// Metadata lists the period, class scope, generation time and the summary
/// lines; the footer names the school.
pub fn describe(dataset: &ReportDataset, school_name: &str) -> Document {
    let mut metadata = vec![
        format!("Period: {}", dataset.filters.period()),
        format!("Class: {}", dataset.filters.class_scope()),
        format!(
            "Generated: {}",
            dataset.generated_at.format("%Y-%m-%d %H:%M")
        ),
    ];
    metadata.extend(dataset.summary.lines());

    Document {
        title: dataset.kind.title().to_string(),
        metadata,
        columns: dataset.labels().into_iter().map(str::to_string).collect(),
        rows: dataset.text_rows(),
        footer: Some(school_name.trim().to_string()).filter(|s| !s.is_empty()),
    }
}
