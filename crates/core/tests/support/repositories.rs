//! In-memory credential repository and scripted OAuth provider

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use intentrelay_common::auth::{PkceChallenge, TokenSet};
use intentrelay_core::{CredentialRepository, OAuthProvider};
use intentrelay_domain::{AuthError, Result as DomainResult, UserCredential};

/// In-memory mock for `CredentialRepository`.
#[derive(Default, Clone)]
pub struct InMemoryCredentialRepository {
    records: Arc<Mutex<HashMap<String, UserCredential>>>,
    puts: Arc<AtomicUsize>,
}

impl InMemoryCredentialRepository {
    pub fn with_credential(self, user_id: &str, credential: UserCredential) -> Self {
        self.records.lock().unwrap().insert(user_id.to_string(), credential);
        self
    }

    pub fn stored(&self, user_id: &str) -> Option<UserCredential> {
        self.records.lock().unwrap().get(user_id).cloned()
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn get(&self, user_id: &str) -> DomainResult<Option<UserCredential>> {
        Ok(self.records.lock().unwrap().get(user_id).cloned())
    }

    async fn put(&self, user_id: &str, credential: &UserCredential) -> DomainResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().insert(user_id.to_string(), credential.clone());
        Ok(())
    }
}

/// Scripted `OAuthProvider` counting its calls.
///
/// Refresh yields to the scheduler a few times before answering so that
/// concurrent callers genuinely interleave.
#[derive(Clone)]
pub struct MockOAuthProvider {
    refresh_response: Arc<Mutex<DomainResult<TokenSet>>>,
    exchange_response: Arc<Mutex<DomainResult<TokenSet>>>,
    refresh_calls: Arc<AtomicUsize>,
    exchanged_verifiers: Arc<Mutex<Vec<String>>>,
}

impl Default for MockOAuthProvider {
    fn default() -> Self {
        Self {
            refresh_response: Arc::new(Mutex::new(Ok(token_set("refreshed-access", None, Some(3600))))),
            exchange_response: Arc::new(Mutex::new(Ok(token_set(
                "initial-access",
                Some("initial-refresh"),
                Some(3600),
            )))),
            refresh_calls: Arc::new(AtomicUsize::new(0)),
            exchanged_verifiers: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockOAuthProvider {
    pub fn refresh_returns(self, response: DomainResult<TokenSet>) -> Self {
        *self.refresh_response.lock().unwrap() = response;
        self
    }

    pub fn exchange_returns(self, response: DomainResult<TokenSet>) -> Self {
        *self.exchange_response.lock().unwrap() = response;
        self
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn exchanged_verifiers(&self) -> Vec<String> {
        self.exchanged_verifiers.lock().unwrap().clone()
    }
}

#[async_trait]
impl OAuthProvider for MockOAuthProvider {
    fn authorization_url(&self, challenge: &PkceChallenge) -> DomainResult<String> {
        Ok(format!(
            "https://accounts.example.com/auth?state={}&code_challenge={}",
            challenge.state, challenge.code_challenge
        ))
    }

    async fn exchange_code(&self, _code: &str, code_verifier: &str) -> DomainResult<TokenSet> {
        self.exchanged_verifiers.lock().unwrap().push(code_verifier.to_string());
        self.exchange_response.lock().unwrap().clone()
    }

    async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenSet> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        if refresh_token == "revoked" {
            return Err(AuthError::RefreshFailed("invalid_grant".to_string()).into());
        }
        self.refresh_response.lock().unwrap().clone()
    }
}

/// Token set as a provider would report it
pub fn token_set(access: &str, refresh: Option<&str>, expires_in: Option<i64>) -> TokenSet {
    TokenSet {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        token_type: "Bearer".to_string(),
        expires_in,
        expires_at: None,
        scope: None,
    }
}
