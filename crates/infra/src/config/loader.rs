//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `BUCKY_ENDPOINT` is unset or a value is invalid, falls back to a file
//! 3. Probes the working directory and the executable's directory
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `BUCKY_ENDPOINT`: Collector URL (required)
//! - `BUCKY_FLUSH_INTERVAL_SECS`: Seconds between flushes
//! - `BUCKY_REQUEST_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `BUCKY_USER_AGENT`: User agent sent with each flush
//!
//! ## File Locations
//! In each probed directory: `bucky.toml`, then `bucky.json`.

use std::path::{Path, PathBuf};

use bucky_domain::{BuckyError, ClientConfig, Result};

pub const ENV_ENDPOINT: &str = "BUCKY_ENDPOINT";
pub const ENV_FLUSH_INTERVAL_SECS: &str = "BUCKY_FLUSH_INTERVAL_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "BUCKY_REQUEST_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "BUCKY_USER_AGENT";

const CONFIG_FILE_NAMES: [&str; 2] = ["bucky.toml", "bucky.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `BuckyError::Configuration` if neither the environment nor any
/// probed file yields a valid configuration.
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `BUCKY_ENDPOINT` is required; unset optional variables keep their
/// defaults.
///
/// # Errors
/// Returns `BuckyError::Configuration` if the endpoint is missing, a
/// numeric variable does not parse, or the flush interval exceeds the maximum.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config = ClientConfig::new(env_var(ENV_ENDPOINT)?);

    if let Some(secs) = env_u64(ENV_FLUSH_INTERVAL_SECS)? {
        config.flush_interval_secs = secs;
    }
    if let Some(secs) = env_u64(ENV_REQUEST_TIMEOUT_SECS)? {
        config.request_timeout_secs = secs;
    }
    if let Ok(agent) = std::env::var(ENV_USER_AGENT) {
        config.user_agent = agent;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, uses [`probe_config_paths`]. Format is picked by
/// extension.
///
/// # Errors
/// Returns `BuckyError::Configuration` if the file is missing, unreadable,
/// malformed, or fails validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BuckyError::Configuration(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BuckyError::Configuration("No bucky.toml or bucky.json found".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BuckyError::Configuration(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BuckyError::Configuration(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BuckyError::Configuration(format!("Invalid JSON format: {e}"))),
        _ => Err(BuckyError::Configuration(format!("Unsupported config format: {extension}"))),
    }
}

/// First config file found in the working directory, then next to the
/// executable.
pub fn probe_config_paths() -> Option<PathBuf> {
    if let Some(found) = std::env::current_dir().ok().and_then(|cwd| probe_config_paths_from(&cwd))
    {
        return Some(found);
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(probe_config_paths_from))
}

/// First config file found directly inside `dir`.
pub fn probe_config_paths_from(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)).find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        BuckyError::Configuration(format!("Missing required environment variable: {key}"))
    })
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| BuckyError::Configuration(format!("Invalid {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_env() {
        for key in [ENV_ENDPOINT, ENV_FLUSH_INTERVAL_SECS, ENV_REQUEST_TIMEOUT_SECS, ENV_USER_AGENT] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        clear_env();

        std::env::set_var(ENV_ENDPOINT, "http://localhost:8005/bucky/v1/send");
        std::env::set_var(ENV_FLUSH_INTERVAL_SECS, "120");
        std::env::set_var(ENV_REQUEST_TIMEOUT_SECS, "5");
        std::env::set_var(ENV_USER_AGENT, "svc/2.0");

        let result = load_from_env();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.endpoint, "http://localhost:8005/bucky/v1/send");
        assert_eq!(config.flush_interval_secs, 120);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.user_agent, "svc/2.0");
    }

    #[test]
    fn test_load_from_env_only_endpoint_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        clear_env();
        std::env::set_var(ENV_ENDPOINT, "http://localhost:8005");

        let result = load_from_env();
        clear_env();

        assert_eq!(result.unwrap(), ClientConfig::new("http://localhost:8005"));
    }

    #[test]
    fn test_load_from_env_missing_endpoint() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, BuckyError::Configuration(msg) if msg.contains(ENV_ENDPOINT)));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        clear_env();
        std::env::set_var(ENV_ENDPOINT, "http://localhost:8005");
        std::env::set_var(ENV_FLUSH_INTERVAL_SECS, "soon");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(BuckyError::Configuration(_))));
    }

    #[test]
    fn test_load_from_env_oversized_interval() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        clear_env();
        std::env::set_var(ENV_ENDPOINT, "http://localhost:8005");
        std::env::set_var(ENV_FLUSH_INTERVAL_SECS, u64::MAX.to_string());

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(BuckyError::Configuration(msg)) if msg.contains("flush interval")));
    }

    #[test]
    fn test_parse_config_json_with_defaults() {
        let config =
            parse_config(r#"{ "endpoint": "http://c/send" }"#, Path::new("bucky.json")).unwrap();
        assert_eq!(config, ClientConfig::new("http://c/send"));
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
endpoint = "http://c/send"
flush_interval_secs = 90
"#;
        let config = parse_config(toml_content, Path::new("bucky.toml")).unwrap();
        assert_eq!(config.flush_interval_secs, 90);
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("endpoint: x", Path::new("bucky.yaml"));
        assert!(matches!(result, Err(BuckyError::Configuration(_))));
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/bucky.toml")));
        assert!(matches!(result, Err(BuckyError::Configuration(_))));
    }
}
