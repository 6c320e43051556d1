//! Configuration management for classroll.
//!
//! Configuration lives in a TOML file with `${VAR_NAME}` substitution,
//! serde defaults for optional settings, `CLASSROLL_*` environment overrides
//! and validation on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use classroll::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("classroll.toml")?;
//! println!("Trend length: {} days", config.reports.trend_days);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`ServerConfig`] - HTTP bind address, port and request timeout
//! - [`StoresConfig`] - one [`PostgreSQLConfig`] per logical store
//! - [`ReportsConfig`] - trend length and day-count scope
//! - [`ExportConfig`] - default format, BOM and document layout
//! - [`LoggingConfig`] - optional rolling JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [server]
//! bind_address = "0.0.0.0"
//! port = 8080
//!
//! [stores.registrar]
//! connection_string = "${CLASSROLL_REGISTRAR_DSN}"
//! ssl_mode = "require"
//!
//! [stores.teacher]
//! connection_string = "${CLASSROLL_TEACHER_DSN}"
//! ssl_mode = "require"
//!
//! [stores.login]
//! connection_string = "${CLASSROLL_LOGIN_DSN}"
//! ssl_mode = "require"
//!
//! [reports]
//! trend_days = 7
//! daily_counts = "today_only"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_str};
pub use schema::{
    ApplicationConfig, ClassrollConfig, Environment, ExportConfig, LoggingConfig,
    PostgreSQLConfig, ReportsConfig, ServerConfig, StoresConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
