//! Report datasets and the attendance dashboard
//!
//! Queries the three stores, joins and normalizes the rows, and aggregates
//! them into request-scoped [`ReportDataset`]s and [`Dashboard`]s.
//!
//! # Example
//!
//! ```rust,no_run
//! use classroll::adapters::source::MemorySource;
//! use classroll::core::report::{ReportBuilder, ReportFilters, ReportKind, ReportSettings};
//! use classroll::domain::TeacherId;
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! # async fn example() -> classroll::domain::Result<()> {
//! let builder = ReportBuilder::new(Arc::new(MemorySource::new()), ReportSettings::default());
//! let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
//! let filters = ReportFilters::new(TeacherId::new("T1").unwrap(), None, start, end)?;
//! let outcome = builder
//!     .report(ReportKind::Attendance, filters, end.and_hms_opt(9, 0, 0).unwrap())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod builder;
pub mod dashboard;
pub mod dataset;
pub mod queries;
pub mod records;

pub use access::verify_teacher;
pub use builder::{ReportBuilder, ReportSettings, StudentViews};
pub use dashboard::Dashboard;
pub use dataset::{
    cell_text, AssignmentSummary, AttendanceLogSummary, AttendanceSummary, ClassAverage, Column,
    PerformanceSummary, ReportDataset, ReportFilters, ReportKind, ReportOutcome, ReportSummary,
    NO_DATA_MESSAGE,
};
