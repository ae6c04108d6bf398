//! Authorization-code flow that creates user credentials
//!
//! The `state` query parameter is a random token bound server-side to the
//! user and a PKCE verifier; the raw user id never travels through the
//! browser.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use intentrelay_common::auth::PkceChallenge;
use intentrelay_common::Clock;
use intentrelay_domain::constants::AUTH_STATE_TTL_SECS;
use intentrelay_domain::{AuthError, IntentRelayError, Result, UserCredential};
use serde::Serialize;
use tracing::{info, warn};

use super::ports::OAuthProvider;
use super::store::CredentialStore;

/// Authorization URL handed to the browser
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequest {
    pub authorization_url: String,
    pub state: String,
}

#[derive(Debug, Clone)]
struct PendingAuthorization {
    user_id: String,
    code_verifier: String,
    created_at: DateTime<Utc>,
}

/// Authorization flow service
pub struct AuthorizationFlow {
    provider: Arc<dyn OAuthProvider>,
    store: Arc<CredentialStore>,
    clock: Arc<dyn Clock>,
    pending: DashMap<String, PendingAuthorization>,
    state_ttl: Duration,
}

impl AuthorizationFlow {
    pub fn new(
        provider: Arc<dyn OAuthProvider>,
        store: Arc<CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            store,
            clock,
            pending: DashMap::new(),
            state_ttl: Duration::seconds(AUTH_STATE_TTL_SECS),
        }
    }

    /// Start authorization for `user_id`
    ///
    /// # Errors
    /// `Validation` for a blank user id; `Config` when the OAuth client is not
    /// configured.
    pub fn begin(&self, user_id: &str) -> Result<AuthorizationRequest> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(IntentRelayError::Validation("User identity is required".to_string()));
        }

        self.prune_expired();

        let challenge = PkceChallenge::generate();
        let authorization_url = self.provider.authorization_url(&challenge)?;

        self.pending.insert(
            challenge.state.clone(),
            PendingAuthorization {
                user_id: user_id.to_string(),
                code_verifier: challenge.code_verifier,
                created_at: self.clock.now(),
            },
        );

        info!(user_id, "authorization started");
        Ok(AuthorizationRequest { authorization_url, state: challenge.state })
    }

    /// Finish authorization with the callback's `code` and `state`
    ///
    /// Returns the user the credential was stored for.
    ///
    /// # Errors
    /// - `AuthError::StateMismatch` for an unknown, reused or expired state
    /// - `AuthError::ExchangeFailed` when the provider refuses the code
    /// - `AuthError::MissingRefreshToken` when consent did not yield offline
    ///   access
    pub async fn complete(&self, code: &str, state: &str) -> Result<String> {
        if code.trim().is_empty() {
            return Err(IntentRelayError::Validation("Authorization code is required".to_string()));
        }

        let (_, pending) = self.pending.remove(state).ok_or(AuthError::StateMismatch)?;
        if self.clock.now() - pending.created_at > self.state_ttl {
            warn!(user_id = %pending.user_id, "authorization state expired");
            return Err(AuthError::StateMismatch.into());
        }

        let tokens = self.provider.exchange_code(code.trim(), &pending.code_verifier).await?;
        if tokens.access_token.is_empty() {
            return Err(AuthError::ExchangeFailed("No access token received".to_string()).into());
        }

        let expiry_epoch_millis = self.store.expiry_from(&tokens);
        let refresh_token = tokens
            .refresh_token
            .filter(|token| !token.trim().is_empty())
            .ok_or(AuthError::MissingRefreshToken)?;

        self.store
            .put_credential(
                &pending.user_id,
                UserCredential::new(tokens.access_token, refresh_token, expiry_epoch_millis),
            )
            .await?;

        info!(user_id = %pending.user_id, "authorization completed");
        Ok(pending.user_id)
    }

    fn prune_expired(&self) {
        let now = self.clock.now();
        self.pending.retain(|_, pending| now - pending.created_at <= self.state_ttl);
    }
}
