//! Modular common utilities shared across IntentRelay crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: token types, PKCE/state helpers, clock abstraction
//! - `runtime`: HTTP OAuth client (authorization URL, code exchange, refresh)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier (auth types and PKCE; the HTTP client needs `runtime`)
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod auth;
#[cfg(feature = "foundation")]
pub mod time;

#[cfg(feature = "foundation")]
pub use time::{Clock, MockClock, SystemClock};
