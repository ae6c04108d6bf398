//! Application configuration structures
//!
//! Every section except `google` has working defaults so a minimal file or
//! environment only needs the OAuth client registration.

use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::{IntentRelayError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub google: GoogleConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Upper bound for one routed command, including every action in a batch
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0:5000".to_string(), request_timeout_secs: 60 }
    }
}

/// Google OAuth client registration and API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    #[serde(default, skip_serializing)]
    pub client_secret: Option<String>,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default = "default_authorization_endpoint")]
    pub authorization_endpoint: String,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    #[serde(default = "default_calendar_base_url")]
    pub calendar_base_url: String,
    #[serde(default = "default_tasks_base_url")]
    pub tasks_base_url: String,
    #[serde(default = "default_gmail_base_url")]
    pub gmail_base_url: String,
}

impl GoogleConfig {
    /// Registration with default Google endpoints
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: Option<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            redirect_uri: default_redirect_uri(),
            authorization_endpoint: default_authorization_endpoint(),
            token_endpoint: default_token_endpoint(),
            calendar_base_url: default_calendar_base_url(),
            tasks_base_url: default_tasks_base_url(),
            gmail_base_url: default_gmail_base_url(),
        }
    }

    /// Reject missing or placeholder client credentials
    ///
    /// # Errors
    /// Returns `IntentRelayError::Config` naming the missing value.
    pub fn ensure_client_credentials(&self) -> Result<()> {
        if is_placeholder(&self.client_id) {
            return Err(IntentRelayError::Config("GOOGLE_CLIENT_ID is not configured".to_string()));
        }
        if self.client_secret.as_deref().map_or(true, is_placeholder) {
            return Err(IntentRelayError::Config(
                "GOOGLE_CLIENT_SECRET is not configured".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.starts_with("your_")
        || trimmed.starts_with("your-")
        || trimmed.starts_with("dummy-")
}

/// Language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

/// Credential database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "intentrelay.db".to_string(), pool_size: 4 }
    }
}

/// Action routing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// IANA zone for relative dates and event `timeZone`
    pub timezone: String,
    /// Run refreshes for one user one at a time
    pub serialize_refreshes: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self { timezone: "UTC".to_string(), serialize_refreshes: true }
    }
}

impl RoutingConfig {
    /// Parsed time zone
    ///
    /// # Errors
    /// Returns `IntentRelayError::Config` for an unknown zone name.
    pub fn time_zone(&self) -> Result<Tz> {
        Tz::from_str(self.timezone.trim()).map_err(|e| {
            IntentRelayError::Config(format!("Invalid timezone '{}': {e}", self.timezone))
        })
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_redirect_uri() -> String {
    "http://localhost:5000/api/auth/google/callback".to_string()
}

fn default_authorization_endpoint() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_token_endpoint() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_calendar_base_url() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

fn default_tasks_base_url() -> String {
    "https://tasks.googleapis.com/tasks/v1".to_string()
}

fn default_gmail_base_url() -> String {
    "https://gmail.googleapis.com/gmail/v1".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"google": {"client_id": "abc", "client_secret": "def"}}"#)
                .unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0:5000");
        assert_eq!(config.google.token_endpoint, "https://oauth2.googleapis.com/token");
        assert_eq!(config.database.pool_size, 4);
        assert!(config.routing.serialize_refreshes);
        assert_eq!(config.log_level, "info");
        assert!(config.google.ensure_client_credentials().is_ok());
    }

    #[test]
    fn test_placeholder_credentials_rejected() {
        let google = GoogleConfig::new("your_client_id", Some("secret".into()));
        assert!(matches!(google.ensure_client_credentials(), Err(IntentRelayError::Config(_))));

        let google = GoogleConfig::new("real-id", None);
        let err = google.ensure_client_credentials().unwrap_err();
        assert!(err.to_string().contains("GOOGLE_CLIENT_SECRET"));
    }

    #[test]
    fn test_time_zone_parsing() {
        let routing = RoutingConfig { timezone: "Europe/Berlin".into(), serialize_refreshes: true };
        assert_eq!(routing.time_zone().unwrap(), chrono_tz::Europe::Berlin);

        let routing = RoutingConfig { timezone: "Mars/Olympus".into(), serialize_refreshes: true };
        assert!(routing.time_zone().is_err());
    }

    #[test]
    fn test_secrets_not_serialized() {
        let google = GoogleConfig::new("id", Some("top-secret".into()));
        let json = serde_json::to_string(&google).unwrap();
        assert!(!json.contains("top-secret"));
    }
}
