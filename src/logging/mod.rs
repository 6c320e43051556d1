//! Logging and observability
//!
//! Structured logging through `tracing`, with a console layer and an
//! optional rolling JSON file. The macros below give report and export
//! events a consistent field layout.
//!
//! # Example
//!
//! ```no_run
//! use classroll::logging::init_logging;
//! use classroll::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Portal started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a report build
///
/// # Example
///
/// ```no_run
/// use classroll::log_report_start;
///
/// log_report_start!("attendance", "class=C1 2025-01-06..2025-01-10");
/// ```
#[macro_export]
macro_rules! log_report_start {
    ($kind:expr, $filters:expr) => {
        tracing::info!(
            report = %$kind,
            filters = %$filters,
            "Building report"
        );
    };
}

/// Log a delivered export
///
/// # Example
///
/// ```no_run
/// use classroll::log_export_delivered;
/// use std::time::Duration;
///
/// log_export_delivered!("attendance_2025-01-01.csv", 2048, false, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_export_delivered {
    ($filename:expr, $bytes:expr, $fell_back:expr, $duration:expr) => {
        tracing::info!(
            filename = %$filename,
            bytes = $bytes,
            fell_back = $fell_back,
            duration_ms = $duration.as_millis() as u64,
            "Export delivered"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use classroll::log_error_with_context;
/// use classroll::domain::ClassrollError;
///
/// let error = ClassrollError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log one store query and how many rows it returned
#[macro_export]
macro_rules! log_store_query {
    ($store:expr, $name:expr, $rows:expr) => {
        tracing::debug!(
            store = %$store,
            query = $name,
            rows = $rows,
            "Store query completed"
        );
    };
}
