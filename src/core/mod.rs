//! Core business logic for classroll.
//!
//! # Modules
//!
//! - [`normalize`] - Cross-store left join and the Join Normalizer
//! - [`aggregate`] - Counts, rates, trends and distribution bands
//! - [`report`] - Report datasets and the attendance dashboard
//! - [`export`] - Report Exporter with format fallback
//!
//! # Report Workflow
//!
//! 1. **Query**: fetch rows from the registrar, teacher and login stores
//! 2. **Join**: attach registrar identity to teacher-store rows
//! 3. **Normalize**: fold join rows into one view per student
//! 4. **Aggregate**: tally marks, grades and submissions
//! 5. **Export**: render the dataset, falling back to delimited text
//!
//! # Example
//!
//! ```rust,no_run
//! use classroll::config::load_config;
//! use classroll::adapters::source::create_record_source;
//! use classroll::core::export::{ExportOutcome, Exporter};
//! use classroll::core::report::{ReportBuilder, ReportFilters, ReportKind, ReportSettings};
//! use classroll::domain::TeacherId;
//! use chrono::NaiveDate;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("classroll.toml")?;
//! let source = create_record_source(&config.stores).await?;
//! let builder = ReportBuilder::new(source, ReportSettings::from(&config.reports));
//! let exporter = Exporter::from_config(&config.export);
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
//! let filters = ReportFilters::new(TeacherId::new("T1")?, None, start, end)?;
//! let outcome = builder
//!     .report(ReportKind::Attendance, filters, end.and_hms_opt(16, 0, 0).unwrap())
//!     .await?;
//!
//! match exporter.export_outcome(&outcome, "pdf") {
//!     ExportOutcome::File(file) => println!("{} ({} bytes)", file.filename, file.bytes.len()),
//!     ExportOutcome::NoData { message } => println!("{message}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod export;
pub mod normalize;
pub mod report;
