//! Traits for OAuth operations
//!
//! Lets the credential store and the authorization flow run against a mock
//! provider in tests.

use async_trait::async_trait;

use super::client::OAuthClientError;
use super::pkce::PkceChallenge;
use super::types::TokenSet;

/// Trait for OAuth client operations
#[async_trait]
pub trait OAuthClientTrait: Send + Sync {
    /// Build the browser authorization URL for the given state
    fn authorization_url(&self, state: &str, challenge: Option<&PkceChallenge>) -> String;

    /// Exchange an authorization code for tokens
    ///
    /// # Errors
    /// Returns error if the provider rejects the code or the response cannot
    /// be parsed
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenSet, OAuthClientError>;

    /// Run a refresh-token grant
    ///
    /// # Errors
    /// Returns error if refresh fails or token is invalid/revoked
    async fn refresh_access_token(&self, refresh_token: &str)
        -> Result<TokenSet, OAuthClientError>;

    /// Whether client id and secret are configured
    fn is_configured(&self) -> bool;
}
