//! PKCE (RFC 7636) and CSRF state helpers
//!
//! Google accepts PKCE alongside a client secret; the verifier and the state
//! token are generated together and kept server-side until the callback.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// 32 random bytes, base64url encoded (43 characters)
#[must_use]
pub fn generate_code_verifier() -> String {
    random_token()
}

/// `BASE64URL(SHA256(verifier))`
#[must_use]
pub fn generate_code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Random state token for CSRF protection
#[must_use]
pub fn generate_state() -> String {
    random_token()
}

/// Verifier, challenge and state for one authorization attempt
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    pub code_verifier: String,
    pub code_challenge: String,
    pub state: String,
}

impl PkceChallenge {
    /// Generate a fresh challenge
    #[must_use]
    pub fn generate() -> Self {
        let code_verifier = generate_code_verifier();
        let code_challenge = generate_code_challenge(&code_verifier);
        Self { code_verifier, code_challenge, state: generate_state() }
    }

    /// Challenge method (always "S256")
    #[must_use]
    pub const fn challenge_method(&self) -> &'static str {
        "S256"
    }
}
