//! Per-user OAuth credential

use std::fmt;

use serde::{Deserialize, Serialize};

/// OAuth token pair and expiry for one user
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCredential {
    pub access_token: String,
    pub refresh_token: String,
    pub expiry_epoch_millis: i64,
}

impl UserCredential {
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expiry_epoch_millis: i64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expiry_epoch_millis,
        }
    }

    /// True when fewer than `buffer_millis` remain before expiry
    #[must_use]
    pub fn expires_within(&self, now_millis: i64, buffer_millis: i64) -> bool {
        self.expiry_epoch_millis.saturating_sub(now_millis) < buffer_millis
    }

    /// Whether a refresh grant can be attempted
    #[must_use]
    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.trim().is_empty()
    }
}

// Tokens never reach logs through Debug.
impl fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expiry_epoch_millis", &self.expiry_epoch_millis)
            .finish()
    }
}
