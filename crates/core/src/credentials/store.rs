//! Credential store - per-user token lifecycle

use std::sync::Arc;

use chrono::Duration;
use dashmap::DashMap;
use intentrelay_common::auth::TokenSet;
use intentrelay_common::Clock;
use intentrelay_domain::constants::{DEFAULT_TOKEN_LIFETIME_SECS, TOKEN_EXPIRY_BUFFER_MS};
use intentrelay_domain::{AuthError, IntentRelayError, Result, UserCredential};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::ports::{CredentialRepository, OAuthProvider};

/// Per-user credential store
///
/// Access tokens are refreshed transparently once fewer than five minutes
/// remain. A refresh response without a new refresh token keeps the stored
/// one.
pub struct CredentialStore {
    repository: Arc<dyn CredentialRepository>,
    provider: Arc<dyn OAuthProvider>,
    clock: Arc<dyn Clock>,
    /// Present when refreshes for one user are serialized
    refresh_locks: Option<DashMap<String, Arc<Mutex<()>>>>,
}

impl CredentialStore {
    /// Create a store that serializes refreshes per user
    pub fn new(
        repository: Arc<dyn CredentialRepository>,
        provider: Arc<dyn OAuthProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { repository, provider, clock, refresh_locks: Some(DashMap::new()) }
    }

    /// Enable or disable per-user refresh serialization
    ///
    /// Without it, concurrent callers that all see an expiring token each
    /// run their own refresh and the last write wins.
    #[must_use]
    pub fn with_serialized_refreshes(mut self, enabled: bool) -> Self {
        self.refresh_locks = enabled.then(DashMap::new);
        self
    }

    /// Stored credential for `user_id`
    ///
    /// # Errors
    /// `NotFound` when the user never completed authorization.
    pub async fn get_credential(&self, user_id: &str) -> Result<UserCredential> {
        self.repository
            .get(user_id)
            .await?
            .ok_or_else(|| IntentRelayError::NotFound(format!("No credential stored for user {user_id}")))
    }

    /// Insert or overwrite the credential for `user_id`
    pub async fn put_credential(&self, user_id: &str, credential: UserCredential) -> Result<()> {
        self.repository.put(user_id, &credential).await
    }

    /// Access token valid for at least the expiry buffer, refreshing if needed
    ///
    /// # Errors
    /// - `AuthError::NotAuthenticated` when no usable credential exists
    /// - `AuthError::RefreshFailed` when the provider rejects the refresh
    /// - storage errors from the repository
    pub async fn get_valid_access_token(&self, user_id: &str) -> Result<String> {
        let credential = self.load_authenticated(user_id).await?;
        if !self.needs_refresh(&credential) {
            return Ok(credential.access_token);
        }

        let Some(locks) = &self.refresh_locks else {
            return self.refresh(user_id, credential).await;
        };

        let lease = RefreshLease::acquire(locks, user_id);
        let _guard = lease.mutex.lock().await;

        // Another caller may have refreshed while we waited
        let credential = self.load_authenticated(user_id).await?;
        if !self.needs_refresh(&credential) {
            debug!(user_id, "access token refreshed by concurrent caller");
            return Ok(credential.access_token);
        }
        self.refresh(user_id, credential).await
    }

    async fn load_authenticated(&self, user_id: &str) -> Result<UserCredential> {
        match self.repository.get(user_id).await? {
            Some(credential) if credential.has_refresh_token() => Ok(credential),
            _ => Err(AuthError::NotAuthenticated.into()),
        }
    }

    /// Inside the expiry buffer, or no access token stored at all
    fn needs_refresh(&self, credential: &UserCredential) -> bool {
        credential.access_token.is_empty()
            || credential.expires_within(self.clock.millis_since_epoch(), TOKEN_EXPIRY_BUFFER_MS)
    }

    async fn refresh(&self, user_id: &str, previous: UserCredential) -> Result<String> {
        debug!(user_id, expiry = previous.expiry_epoch_millis, "refreshing access token");
        let tokens = self.provider.refresh(&previous.refresh_token).await?;

        let refreshed = UserCredential {
            expiry_epoch_millis: self.expiry_from(&tokens),
            refresh_token: tokens
                .refresh_token
                .filter(|token| !token.trim().is_empty())
                .unwrap_or(previous.refresh_token),
            access_token: tokens.access_token,
        };

        self.repository.put(user_id, &refreshed).await?;
        info!(user_id, expiry = refreshed.expiry_epoch_millis, "access token refreshed");
        Ok(refreshed.access_token)
    }

    /// Expiry in epoch millis, measured from this store's clock
    pub(crate) fn expiry_from(&self, tokens: &TokenSet) -> i64 {
        let lifetime = tokens.expires_in.filter(|secs| *secs > 0).unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        (self.clock.now() + Duration::seconds(lifetime)).timestamp_millis()
    }
}

/// One caller's hold on a user's refresh mutex
///
/// The map entry is removed when the last holder lets go, so the map only
/// holds users with a refresh in flight.
struct RefreshLease<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    user_id: &'a str,
    mutex: Arc<Mutex<()>>,
}

impl<'a> RefreshLease<'a> {
    fn acquire(locks: &'a DashMap<String, Arc<Mutex<()>>>, user_id: &'a str) -> Self {
        let mutex = Arc::clone(locks.entry(user_id.to_string()).or_default().value());
        Self { locks, user_id, mutex }
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        // Two references are the map's and ours: nobody else holds or awaits it.
        // New callers clone under the same shard lock, so this cannot race them.
        self.locks.remove_if(self.user_id, |_, mutex| Arc::strong_count(mutex) == 2);
    }
}
