//! Google OAuth provider
//!
//! Wraps the shared `intentrelay_common::auth` client for the process-wide
//! Google registration and maps its failures onto `AuthError`.

use std::sync::Arc;

use async_trait::async_trait;
use intentrelay_common::auth::{
    OAuthClient, OAuthClientError, OAuthClientTrait, OAuthConfig, PkceChallenge, TokenSet,
};
use intentrelay_core::OAuthProvider;
use intentrelay_domain::constants::GOOGLE_SCOPES;
use intentrelay_domain::{AuthError, GoogleConfig, IntentRelayError, Result};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// `OAuthProvider` for Google accounts
pub struct GoogleOAuthProvider {
    client: Arc<dyn OAuthClientTrait>,
    config: GoogleConfig,
}

impl GoogleOAuthProvider {
    /// Build the OAuth client for `config`
    ///
    /// Requests offline access with a forced consent screen so every
    /// authorization yields a refresh token.
    pub fn from_config(config: GoogleConfig) -> Result<Self> {
        let oauth_config = OAuthConfig::new(
            config.client_id.clone(),
            config.redirect_uri.clone(),
            config.authorization_endpoint.clone(),
            config.token_endpoint.clone(),
            GOOGLE_SCOPES.iter().map(|scope| (*scope).to_string()).collect(),
        )
        .with_client_secret(config.client_secret.clone())
        .with_authorize_param("access_type", "offline")
        .with_authorize_param("prompt", "consent");

        let client = OAuthClient::new(oauth_config).map_err(map_transport_error)?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Use an existing client, for tests and alternative transports
    pub fn with_client(client: Arc<dyn OAuthClientTrait>, config: GoogleConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuthProvider {
    fn authorization_url(&self, challenge: &PkceChallenge) -> Result<String> {
        self.config.ensure_client_credentials()?;
        Ok(self.client.authorization_url(&challenge.state, Some(challenge)))
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<TokenSet> {
        self.config.ensure_client_credentials()?;

        let tokens = self
            .client
            .exchange_code(code, Some(code_verifier))
            .await
            .map_err(|err| self.map_exchange_error(err))?;

        debug!(
            has_refresh_token = tokens.refresh_token.is_some(),
            expires_in = ?tokens.expires_in,
            "authorization code exchanged"
        );
        Ok(tokens)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
        self.config.ensure_client_credentials()?;

        self.client.refresh_access_token(refresh_token).await.map_err(|err| match err {
            OAuthClientError::OAuthError(inner) if inner.rejects_grant() => {
                warn!(error = %inner.error, "refresh grant rejected");
                IntentRelayError::Auth(AuthError::RefreshFailed(inner.to_string()))
            }
            OAuthClientError::NoRefreshToken => IntentRelayError::Auth(AuthError::NotAuthenticated),
            other => {
                warn!(error = %other, "refresh grant could not be completed");
                map_transport_error(other)
            }
        })
    }
}

impl GoogleOAuthProvider {
    fn map_exchange_error(&self, err: OAuthClientError) -> IntentRelayError {
        let message = match err.oauth_code() {
            Some("invalid_grant") => {
                "Authorization code expired or already used. Please connect Google again."
                    .to_string()
            }
            Some("redirect_uri_mismatch") => format!(
                "Redirect URI mismatch. Make sure {} is registered for the OAuth client.",
                self.config.redirect_uri
            ),
            Some("invalid_client") => {
                "Invalid OAuth client credentials. Check GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET."
                    .to_string()
            }
            Some(_) => err.to_string(),
            None => return map_transport_error(err),
        };

        warn!(error = ?err.oauth_code(), "authorization code exchange rejected");
        IntentRelayError::Auth(AuthError::ExchangeFailed(message))
    }
}

fn map_transport_error(err: OAuthClientError) -> IntentRelayError {
    match err {
        OAuthClientError::RequestFailed(e) => IntentRelayError::from(InfraError::from(e)),
        OAuthClientError::ParseError(msg) => {
            IntentRelayError::Upstream(format!("Invalid token response: {msg}"))
        }
        OAuthClientError::ConfigError(msg) => IntentRelayError::Config(msg),
        OAuthClientError::NoRefreshToken => IntentRelayError::Auth(AuthError::MissingRefreshToken),
        OAuthClientError::Status { status: 429, .. } => {
            IntentRelayError::Network("Google token endpoint is rate limiting requests".to_string())
        }
        OAuthClientError::Status { status, body } => {
            IntentRelayError::Upstream(format!("Google token endpoint error ({status}): {body}"))
        }
        OAuthClientError::OAuthError(e) => {
            IntentRelayError::Upstream(format!("Google token endpoint error: {e}"))
        }
    }
}
