//! Domain models and types for classroll.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed business keys** ([`StudentId`], [`ClassId`], [`TeacherId`])
//!   compared by normalized string value
//! - **Durable records** ([`StudentRecord`], [`ClassRecord`], [`AttendanceMark`],
//!   [`GradeEntry`], [`SubmissionRecord`])
//! - **Status values** ([`AttendanceStatus`], [`SubmissionStatus`])
//! - **Error types** ([`ClassrollError`], [`RenderFailure`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! ```rust
//! use classroll::domain::{ClassrollError, Result, Store};
//!
//! fn fetch() -> Result<()> {
//!     Err(ClassrollError::source_unavailable(Store::Registrar, "timeout"))
//! }
//! assert!(fetch().is_err());
//! ```

pub mod errors;
pub mod ids;
pub mod records;
pub mod result;
pub mod status;

// Re-export commonly used types for convenience
pub use errors::{ClassrollError, RenderFailure, Store};
pub use ids::{normalize_key, ClassId, StudentId, TeacherId};
pub use records::{
    format_class_label, format_display_name, AttendanceMark, ClassRecord, EnrollmentEdge,
    GradeEntry, StudentRecord, SubmissionRecord,
};
pub use result::Result;
pub use status::{AttendanceStatus, SubmissionStatus};
