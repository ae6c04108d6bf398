//! OAuth 2.0 authorization-code + refresh grant plumbing
//!
//! Server-side OAuth support for the Google productivity integrations. The
//! module only speaks the protocol: it builds authorization URLs, exchanges
//! authorization codes, and performs refresh grants. Where tokens live and
//! when they are refreshed is decided by the credential store in
//! `intentrelay-core`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │   CredentialStore    │  (intentrelay-core) per-user token lifecycle
//! └──────────┬───────────┘
//!            │ OAuthProvider port
//!            ▼
//! ┌──────────────────────┐
//! │ GoogleOAuthProvider  │  (intentrelay-infra) error mapping
//! └──────────┬───────────┘
//!            │ OAuthClientTrait
//!            ▼
//! ┌──────────────────────┐
//! │     OAuthClient      │  HTTP token endpoint calls (`runtime`)
//! └──────────────────────┘
//! ```
//!
//! Token types and PKCE/state helpers only need the `foundation` tier.
//!
//! # Usage Example
//!
//! ```no_run
//! use intentrelay_common::auth::{OAuthClient, OAuthConfig, PkceChallenge};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OAuthConfig::new(
//!     "client-id".to_string(),
//!     "http://localhost:5000/api/auth/google/callback".to_string(),
//!     "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
//!     "https://oauth2.googleapis.com/token".to_string(),
//!     vec!["https://www.googleapis.com/auth/calendar".to_string()],
//! )
//! .with_client_secret(Some("client-secret".to_string()));
//!
//! let client = OAuthClient::new(config)?;
//! let challenge = PkceChallenge::generate();
//! let url = client.authorization_url(&challenge.state, Some(&challenge));
//! println!("Open {url}");
//!
//! let tokens = client.exchange_code("code-from-callback", Some(&challenge.code_verifier)).await?;
//! let refreshed = client.refresh_access_token(tokens.refresh_token.as_deref().unwrap_or("")).await?;
//! println!("expires in {:?}s", refreshed.expires_in);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "runtime")]
pub mod client;
pub mod pkce;
#[cfg(feature = "runtime")]
pub mod traits;
pub mod types;

// Re-export commonly used types and functions
#[cfg(feature = "runtime")]
pub use client::{OAuthClient, OAuthClientError};
pub use pkce::{generate_code_challenge, generate_code_verifier, generate_state, PkceChallenge};
#[cfg(feature = "runtime")]
pub use traits::OAuthClientTrait;
pub use types::{OAuthConfig, OAuthError, TokenResponse, TokenSet};
