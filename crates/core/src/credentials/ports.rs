//! Port interfaces for credential persistence and the OAuth provider
//!
//! These traits define the boundaries between the credential lifecycle in
//! core and the storage / HTTP implementations in infra.

use async_trait::async_trait;
use intentrelay_common::auth::{PkceChallenge, TokenSet};
use intentrelay_domain::{Result, UserCredential};

/// Per-user credential persistence
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Fetch the stored credential for a user
    async fn get(&self, user_id: &str) -> Result<Option<UserCredential>>;

    /// Insert or overwrite the credential for a user
    async fn put(&self, user_id: &str, credential: &UserCredential) -> Result<()>;
}

/// OAuth provider operations for one process-wide client registration
///
/// Implementations map provider rejections to `AuthError`: a refused
/// refresh grant becomes `RefreshFailed`, a refused code exchange becomes
/// `ExchangeFailed`.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Browser URL starting the consent flow for `challenge`
    fn authorization_url(&self, challenge: &PkceChallenge) -> Result<String>;

    /// Exchange an authorization code for tokens
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<TokenSet>;

    /// Run the refresh-token grant
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet>;
}
