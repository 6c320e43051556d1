//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold `ENV_MUTEX` so they do
//! not interfere with each other.

use classroll::config::{load_config, Environment};
use classroll::core::aggregate::DailyCountScope;
use classroll::core::report::ReportSettings;
use classroll::domain::{ClassrollError, Store};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const OVERRIDES: [&str; 6] = [
    "CLASSROLL_APPLICATION_LOG_LEVEL",
    "CLASSROLL_SERVER_PORT",
    "CLASSROLL_REPORTS_DAILY_COUNTS",
    "CLASSROLL_STORES_LOGIN_CONNECTION_STRING",
    "CLASSROLL_EXPORT_DEFAULT_FORMAT",
    "TEST_CLASSROLL_LOGIN_PASSWORD",
];

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for name in OVERRIDES {
        std::env::remove_var(name);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

const STORES: &str = r#"
[stores.registrar]
connection_string = "postgresql://portal:pw@db/registrar"

[stores.teacher]
connection_string = "postgresql://portal:pw@db/teacher"

[stores.login]
connection_string = "postgresql://portal:pw@db/login"
"#;

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
environment = "staging"

[application]
log_level = "debug"

[server]
bind_address = "0.0.0.0"
port = 9090
request_timeout_secs = 45

[stores.registrar]
connection_string = "postgresql://portal:pw@db/registrar"
max_connections = 4
ssl_mode = "require"

[stores.teacher]
connection_string = "postgresql://portal:pw@db/teacher"
statement_timeout_seconds = 15

[stores.login]
connection_string = "postgres://portal:pw@db/login"
ssl_mode = "disable"

[reports]
trend_days = 14
daily_counts = "any_date"
parallel_trend_queries = false

[export]
default_format = "pdf"
delimited_bom = false
school_name = "Rizal High School"
document_rows_per_page = 40

[logging]
local_enabled = true
local_path = "/var/log/classroll"
local_rotation = "hourly"
"#;

    let temp_file = write_config(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.environment, Environment::Staging);
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.server.socket_address(), "0.0.0.0:9090");
    assert_eq!(config.server.request_timeout_secs, 45);

    let registrar = config.stores.get(Store::Registrar);
    assert_eq!(registrar.max_connections, 4);
    assert!(registrar.uses_tls());
    assert_eq!(config.stores.get(Store::Teacher).statement_timeout_seconds, 15);
    assert!(!config.stores.get(Store::Login).uses_tls());

    let settings = ReportSettings::from(&config.reports);
    assert_eq!(settings.trend_days, 14);
    assert_eq!(settings.daily_counts, DailyCountScope::AnyDate);
    assert!(!settings.parallel_trend_queries);

    assert_eq!(config.export.default_format, "pdf");
    assert!(!config.export.delimited_bom);
    assert_eq!(config.export.school_name, "Rizal High School");
    assert_eq!(config.export.document_rows_per_page, 40);

    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(STORES);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.server.socket_address(), "127.0.0.1:8080");
    assert_eq!(config.server.request_timeout_secs, 30);
    for store in Store::ALL {
        let pg = config.stores.get(store);
        assert_eq!(pg.max_connections, 10);
        assert_eq!(pg.ssl_mode, "prefer");
    }
    assert_eq!(config.reports.trend_days, 7);
    assert_eq!(config.reports.daily_counts, "today_only");
    assert!(config.reports.parallel_trend_queries);
    assert_eq!(config.export.default_format, "delimited");
    assert!(config.export.delimited_bom);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_CLASSROLL_LOGIN_PASSWORD", "s3cret");

    let toml_content = STORES.replace(
        "postgresql://portal:pw@db/login",
        "postgresql://portal:${TEST_CLASSROLL_LOGIN_PASSWORD}@db/login",
    );
    let temp_file = write_config(&toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(
        config.stores.get(Store::Login).connection_string.expose_secret(),
        "postgresql://portal:s3cret@db/login"
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_named() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = STORES.replace(
        "postgresql://portal:pw@db/login",
        "${TEST_CLASSROLL_LOGIN_PASSWORD}",
    );
    let temp_file = write_config(&toml_content);
    let err = load_config(temp_file.path()).unwrap_err();

    assert!(matches!(err, ClassrollError::Configuration(_)));
    assert!(err.to_string().contains("TEST_CLASSROLL_LOGIN_PASSWORD"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("CLASSROLL_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("CLASSROLL_SERVER_PORT", "9443");
    std::env::set_var("CLASSROLL_REPORTS_DAILY_COUNTS", "any_date");
    std::env::set_var(
        "CLASSROLL_STORES_LOGIN_CONNECTION_STRING",
        "postgresql://other:pw@replica/login",
    );

    let temp_file = write_config(STORES);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.server.port, 9443);
    assert_eq!(config.reports.daily_counts, "any_date");
    assert_eq!(
        config.stores.get(Store::Login).connection_string.expose_secret(),
        "postgresql://other:pw@replica/login"
    );

    cleanup_env_vars();
}

#[test]
fn test_invalid_override_fails_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("CLASSROLL_EXPORT_DEFAULT_FORMAT", "docx");

    let temp_file = write_config(STORES);
    let result = load_config(temp_file.path());

    cleanup_env_vars();
    let err = result.unwrap_err();
    assert!(err.to_string().contains("export.default_format"));
}

#[test]
fn test_validation_errors() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        (
            STORES.replace("postgresql://portal:pw@db/teacher", "mysql://db/teacher"),
            "teacher.connection_string",
        ),
        (
            format!("{STORES}\n[reports]\ntrend_days = 0\n"),
            "reports.trend_days",
        ),
        (
            format!("{STORES}\n[reports]\ndaily_counts = \"weekly\"\n"),
            "reports.daily_counts",
        ),
        (
            format!("{STORES}\n[export]\ndocument_rows_per_page = 80\n"),
            "document_rows_per_page",
        ),
        (
            format!("{STORES}\n[logging]\nlocal_rotation = \"size\"\n"),
            "logging.local_rotation",
        ),
    ];

    for (toml_content, needle) in &cases {
        let temp_file = write_config(toml_content);
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(
            err.to_string().contains(needle),
            "expected '{needle}' in '{err}'"
        );
    }
}

#[test]
fn test_production_requires_tls() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = format!("environment = \"production\"\n{STORES}").replace(
        "connection_string = \"postgresql://portal:pw@db/login\"",
        "connection_string = \"postgresql://portal:pw@db/login\"\nssl_mode = \"disable\"",
    );
    let temp_file = write_config(&toml_content);
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("production"));
}

#[test]
fn test_missing_file() {
    let err = load_config("/nonexistent/classroll.toml").unwrap_err();
    assert!(matches!(err, ClassrollError::Configuration(msg) if msg.contains("not found")));
}
