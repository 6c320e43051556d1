//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ClassrollConfig;
use super::secret::secret_string;
use crate::domain::errors::ClassrollError;
use crate::domain::result::Result;
use crate::domain::Store;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Substitutes `${VAR}` placeholders outside comment lines
/// 3. Parses the TOML into [`ClassrollConfig`]
/// 4. Applies `CLASSROLL_*` environment overrides
/// 5. Validates the result
///
/// # Errors
///
/// Returns [`ClassrollError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, the TOML is malformed, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use classroll::config::loader::load_config;
///
/// let config = load_config("classroll.toml").expect("Failed to load config");
/// println!("listening on {}", config.server.socket_address());
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ClassrollConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ClassrollError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ClassrollError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Loads configuration from TOML text already in memory
///
/// # Errors
///
/// Same as [`load_config`], minus the file errors.
pub fn load_config_str(contents: &str) -> Result<ClassrollConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ClassrollConfig = toml::from_str(&contents)
        .map_err(|e| ClassrollError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ClassrollError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ClassrollError::Configuration(format!("Invalid placeholder pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let substituted = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&substituted);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ClassrollError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `CLASSROLL_*` prefix
///
/// Variables follow `CLASSROLL_<SECTION>_<KEY>`, for example
/// `CLASSROLL_SERVER_PORT` or `CLASSROLL_STORES_LOGIN_CONNECTION_STRING`.
/// Values that fail to parse are ignored and the file value stands.
fn apply_env_overrides(config: &mut ClassrollConfig) {
    fn var(name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
        var(name).and_then(|v| v.parse().ok())
    }

    if let Some(val) = var("CLASSROLL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Some(val) = var("CLASSROLL_SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }
    if let Some(port) = parsed("CLASSROLL_SERVER_PORT") {
        config.server.port = port;
    }
    if let Some(secs) = parsed("CLASSROLL_SERVER_REQUEST_TIMEOUT_SECS") {
        config.server.request_timeout_secs = secs;
    }

    for store in Store::ALL {
        let prefix = format!("CLASSROLL_STORES_{}", store.as_str().to_ascii_uppercase());
        let pg = config.stores.get_mut(store);
        if let Some(val) = var(&format!("{prefix}_CONNECTION_STRING")) {
            pg.connection_string = secret_string(val);
        }
        if let Some(max) = parsed(&format!("{prefix}_MAX_CONNECTIONS")) {
            pg.max_connections = max;
        }
        if let Some(val) = var(&format!("{prefix}_SSL_MODE")) {
            pg.ssl_mode = val;
        }
    }

    if let Some(days) = parsed("CLASSROLL_REPORTS_TREND_DAYS") {
        config.reports.trend_days = days;
    }
    if let Some(val) = var("CLASSROLL_REPORTS_DAILY_COUNTS") {
        config.reports.daily_counts = val;
    }
    if let Some(parallel) = parsed("CLASSROLL_REPORTS_PARALLEL_TREND_QUERIES") {
        config.reports.parallel_trend_queries = parallel;
    }

    if let Some(val) = var("CLASSROLL_EXPORT_DEFAULT_FORMAT") {
        config.export.default_format = val;
    }
    if let Some(bom) = parsed("CLASSROLL_EXPORT_DELIMITED_BOM") {
        config.export.delimited_bom = bom;
    }
    if let Some(val) = var("CLASSROLL_EXPORT_SCHOOL_NAME") {
        config.export.school_name = val;
    }

    if let Some(enabled) = parsed("CLASSROLL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = enabled;
    }
    if let Some(val) = var("CLASSROLL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[stores.registrar]
connection_string = "postgresql://portal:pw@localhost/registrar"

[stores.teacher]
connection_string = "postgresql://portal:pw@localhost/teacher"

[stores.login]
connection_string = "postgresql://portal:pw@localhost/login"
"#;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("CLASSROLL_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${CLASSROLL_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("CLASSROLL_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("CLASSROLL_LOADER_MISSING");
        let input = "password = \"${CLASSROLL_LOADER_MISSING}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("CLASSROLL_LOADER_MISSING"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# password = \"${CLASSROLL_LOADER_NEVER_SET}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-classroll.toml");
        assert!(matches!(result, Err(ClassrollError::Configuration(_))));
    }

    #[test]
    fn test_load_config_minimal_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MINIMAL.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.reports.trend_days, 7);
        assert_eq!(config.reports.daily_counts, "today_only");
        assert!(config.export.delimited_bom);
        assert!(config
            .stores
            .login
            .connection_string
            .expose_secret()
            .starts_with("postgresql://"));
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let toml = format!("{MINIMAL}\n[reports]\ntrend_days = 90\n");
        let err = load_config_str(&toml).unwrap_err();
        assert!(err.to_string().contains("trend_days"));
    }

    #[test]
    fn test_load_config_rejects_missing_store() {
        let toml = r#"
[stores.registrar]
connection_string = "postgresql://localhost/registrar"
"#;
        assert!(load_config_str(toml).is_err());
    }
}
