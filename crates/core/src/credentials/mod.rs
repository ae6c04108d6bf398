//! Per-user OAuth credential lifecycle
//!
//! - [`CredentialStore`]: read/write credentials and hand out access tokens
//!   that are valid for at least five more minutes
//! - [`AuthorizationFlow`]: authorization-code flow that creates credentials

pub mod authorization;
pub mod ports;
pub mod store;

#[cfg(test)]
mod test_doubles;

pub use authorization::{AuthorizationFlow, AuthorizationRequest};
pub use ports::{CredentialRepository, OAuthProvider};
pub use store::CredentialStore;
