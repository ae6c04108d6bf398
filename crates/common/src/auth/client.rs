//! OAuth 2.0 client implementation
//!
//! Handles the server-side authorization-code flow:
//! - Browser authorization URL building (with optional PKCE)
//! - Authorization code exchange
//! - Refresh-token grant

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use super::pkce::PkceChallenge;
use super::traits::OAuthClientTrait;
use super::types::{OAuthConfig, OAuthError, TokenResponse, TokenSet};

/// Error type for OAuth client operations
#[derive(Debug)]
pub enum OAuthClientError {
    /// HTTP request failed
    RequestFailed(reqwest::Error),

    /// OAuth server returned an RFC 6749 error for a 4xx status
    OAuthError(OAuthError),

    /// Token endpoint failed without an OAuth error body, or answered 5xx/429
    Status { status: u16, body: String },

    /// Failed to parse response
    ParseError(String),

    /// No refresh token available
    NoRefreshToken,

    /// Invalid configuration
    ConfigError(String),
}

impl OAuthClientError {
    /// RFC 6749 error code returned by the provider, if any
    #[must_use]
    pub fn oauth_code(&self) -> Option<&str> {
        match self {
            Self::OAuthError(err) => Some(err.error.as_str()),
            _ => None,
        }
    }
}

impl std::fmt::Display for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "HTTP request failed: {e}"),
            Self::OAuthError(e) => write!(f, "OAuth error: {e}"),
            Self::Status { status, body } => {
                write!(f, "token endpoint returned HTTP {status}: {body}")
            }
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::NoRefreshToken => write!(f, "No refresh token available"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for OAuthClientError {}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

/// OAuth 2.0 client for one provider registration
///
/// Holds only process-wide configuration. Tokens are passed per call, so a
/// single instance is safe to share across concurrent requests for
/// different users.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    client: Client,
}

impl OAuthClient {
    /// Create a new OAuth client with the given configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: OAuthConfig) -> Result<Self, OAuthClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| OAuthClientError::ConfigError(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Build the authorization URL the user opens in a browser
    #[must_use]
    pub fn authorization_url(&self, state: &str, challenge: Option<&PkceChallenge>) -> String {
        let scope_string = self.config.scope_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("response_type", "code"),
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("scope", scope_string.as_str()),
            ("state", state),
        ];

        if let Some(challenge) = challenge {
            params.push(("code_challenge", challenge.code_challenge.as_str()));
            params.push(("code_challenge_method", challenge.challenge_method()));
        }

        for (key, value) in self.config.extra_authorize_params() {
            params.push((key.as_str(), value.as_str()));
        }

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.config.authorization_endpoint, query_string)
    }

    /// Exchange an authorization code for tokens
    ///
    /// # Errors
    /// Returns error if the token request fails, the provider answers with an
    /// OAuth error, or the response cannot be parsed
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenSet, OAuthClientError> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        if let Some(verifier) = code_verifier {
            form.push(("code_verifier", verifier));
        }

        if let Some(secret) = self.config.client_secret() {
            form.push(("client_secret", secret));
        }

        debug!(endpoint = %self.config.token_endpoint, "exchanging authorization code");
        let response = self.client.post(&self.config.token_endpoint).form(&form).send().await?;
        parse_token_response(response).await
    }

    /// Refresh access token using refresh token
    ///
    /// # Errors
    /// Returns error if:
    /// - No refresh token provided
    /// - Refresh fails
    /// - Token is invalid/revoked
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        if refresh_token.is_empty() {
            return Err(OAuthClientError::NoRefreshToken);
        }

        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("client_id", self.config.client_id.as_str()),
            ("refresh_token", refresh_token),
        ];

        if let Some(secret) = self.config.client_secret() {
            form.push(("client_secret", secret));
        }

        debug!(endpoint = %self.config.token_endpoint, "running refresh-token grant");
        let response = self.client.post(&self.config.token_endpoint).form(&form).send().await?;
        parse_token_response(response).await
    }
}

/// Longest error body kept in [`OAuthClientError::Status`]
const MAX_ERROR_BODY_CHARS: usize = 200;

async fn parse_token_response(response: Response) -> Result<TokenSet, OAuthClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        // Only a 4xx answer is the server judging the grant; 429 and 5xx are
        // load or outage, whatever the body says.
        if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
            if let Ok(error) = serde_json::from_str::<OAuthError>(&body) {
                return Err(OAuthClientError::OAuthError(error));
            }
        }
        return Err(OAuthClientError::Status {
            status: status.as_u16(),
            body: body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    let token_response: TokenResponse =
        response.json().await.map_err(|e| OAuthClientError::ParseError(e.to_string()))?;

    if token_response.access_token.is_empty() {
        return Err(OAuthClientError::ParseError("token response has no access_token".into()));
    }

    Ok(TokenSet::from_response(token_response, Utc::now()))
}

#[async_trait]
impl OAuthClientTrait for OAuthClient {
    fn authorization_url(&self, state: &str, challenge: Option<&PkceChallenge>) -> String {
        Self::authorization_url(self, state, challenge)
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenSet, OAuthClientError> {
        Self::exchange_code(self, code, code_verifier).await
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        Self::refresh_access_token(self, refresh_token).await
    }

    fn is_configured(&self) -> bool {
        self.config.has_client_credentials()
    }
}
