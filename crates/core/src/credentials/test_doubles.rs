//! In-memory ports shared by the credential unit tests

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use dashmap::DashMap;
use intentrelay_common::auth::{PkceChallenge, TokenSet};
use intentrelay_domain::{AuthError, Result, UserCredential};

use super::ports::{CredentialRepository, OAuthProvider};

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
}

#[derive(Default)]
pub(crate) struct MemoryRepository(pub(crate) DashMap<String, UserCredential>);

#[async_trait]
impl CredentialRepository for MemoryRepository {
    async fn get(&self, user_id: &str) -> Result<Option<UserCredential>> {
        Ok(self.0.get(user_id).map(|entry| entry.value().clone()))
    }

    async fn put(&self, user_id: &str, credential: &UserCredential) -> Result<()> {
        self.0.insert(user_id.to_string(), credential.clone());
        Ok(())
    }
}

/// Refreshes to a 60-second token, or refuses the `"revoked"` refresh token
#[derive(Default)]
pub(crate) struct CountingProvider {
    pub(crate) refreshes: AtomicUsize,
}

#[async_trait]
impl OAuthProvider for CountingProvider {
    fn authorization_url(&self, challenge: &PkceChallenge) -> Result<String> {
        Ok(format!("https://accounts.example.com/auth?state={}", challenge.state))
    }

    async fn exchange_code(&self, _code: &str, _code_verifier: &str) -> Result<TokenSet> {
        Err(AuthError::ExchangeFailed("invalid_grant".into()).into())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if refresh_token == "revoked" {
            return Err(AuthError::RefreshFailed("invalid_grant".into()).into());
        }
        Ok(TokenSet {
            access_token: "fresh".into(),
            refresh_token: None,
            token_type: "Bearer".into(),
            expires_in: Some(60),
            expires_at: None,
            scope: None,
        })
    }
}
