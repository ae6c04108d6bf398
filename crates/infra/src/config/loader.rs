//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file from the working directory when one exists
//! 2. Attempts to load from environment variables
//! 3. If `GOOGLE_CLIENT_ID` is missing, falls back to loading from file
//! 4. Probes multiple paths for config files (TOML or JSON)
//! 5. Secrets present in the environment override the file values
//!
//! ## Environment Variables
//! - `GOOGLE_CLIENT_ID`: OAuth client id (required for the env strategy)
//! - `GOOGLE_CLIENT_SECRET`: OAuth client secret
//! - `GOOGLE_REDIRECT_URI`: OAuth callback URL
//! - `GEMINI_API_KEY`: Gemini API key
//! - `INTENTRELAY_MODEL`: Gemini model name
//! - `INTENTRELAY_BIND_ADDRESS`: HTTP listen address
//! - `INTENTRELAY_REQUEST_TIMEOUT_SECS`: Upper bound for one routed command
//! - `INTENTRELAY_DB_PATH`: Credential database file path
//! - `INTENTRELAY_DB_POOL_SIZE`: Connection pool size
//! - `INTENTRELAY_TIMEZONE`: IANA zone for relative dates
//! - `INTENTRELAY_SERIALIZE_REFRESHES`: One refresh per user at a time (true/false)
//! - `INTENTRELAY_LOG_LEVEL`: Default log filter when `RUST_LOG` is unset
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./intentrelay.toml`, `./config.toml`, `./config.json` (current working directory)
//! 2. The same names in the parent directory
//! 3. Relative to executable location

use std::path::{Path, PathBuf};

use intentrelay_domain::{
    Config, DatabaseConfig, GoogleConfig, IntentRelayError, ModelConfig, Result, RoutingConfig,
    ServerConfig,
};

const CONFIG_FILE_NAMES: [&str; 3] = ["intentrelay.toml", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `IntentRelayError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value has the wrong type
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None).map(apply_secret_overrides)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `GOOGLE_CLIENT_ID` is required; every other value falls back to its
/// default.
///
/// # Errors
/// Returns `IntentRelayError::Config` if `GOOGLE_CLIENT_ID` is missing or a
/// numeric value cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    let client_id = env_var("GOOGLE_CLIENT_ID")?;

    let mut google = GoogleConfig::new(client_id, env_opt("GOOGLE_CLIENT_SECRET"));
    if let Some(redirect_uri) = env_opt("GOOGLE_REDIRECT_URI") {
        google.redirect_uri = redirect_uri;
    }

    let mut server = ServerConfig::default();
    if let Some(bind_address) = env_opt("INTENTRELAY_BIND_ADDRESS") {
        server.bind_address = bind_address;
    }
    if let Some(raw) = env_opt("INTENTRELAY_REQUEST_TIMEOUT_SECS") {
        server.request_timeout_secs = raw.parse::<u64>().map_err(|e| {
            IntentRelayError::Config(format!("Invalid request timeout: {}", e))
        })?;
    }

    let mut model = ModelConfig { api_key: env_opt("GEMINI_API_KEY"), ..ModelConfig::default() };
    if let Some(name) = env_opt("INTENTRELAY_MODEL") {
        model.model = name;
    }

    let mut database = DatabaseConfig::default();
    if let Some(path) = env_opt("INTENTRELAY_DB_PATH") {
        database.path = path;
    }
    if let Some(raw) = env_opt("INTENTRELAY_DB_POOL_SIZE") {
        database.pool_size = raw
            .parse::<u32>()
            .map_err(|e| IntentRelayError::Config(format!("Invalid pool size: {}", e)))?;
    }

    let mut routing = RoutingConfig::default();
    if let Some(timezone) = env_opt("INTENTRELAY_TIMEZONE") {
        routing.timezone = timezone;
    }
    routing.serialize_refreshes =
        env_bool("INTENTRELAY_SERIALIZE_REFRESHES", routing.serialize_refreshes);

    let log_level = env_opt("INTENTRELAY_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

    Ok(Config { server, google, model, database, routing, log_level })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `IntentRelayError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(IntentRelayError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            IntentRelayError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| IntentRelayError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| IntentRelayError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| IntentRelayError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(IntentRelayError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Secrets are usually kept out of config files
fn apply_secret_overrides(mut config: Config) -> Config {
    if let Some(secret) = env_opt("GOOGLE_CLIENT_SECRET") {
        config.google.client_secret = Some(secret);
    }
    if let Some(api_key) = env_opt("GEMINI_API_KEY") {
        config.model.api_key = Some(api_key);
    }
    config
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `IntentRelayError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        IntentRelayError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
