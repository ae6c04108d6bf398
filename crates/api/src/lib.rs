//! # IntentRelay API
//!
//! HTTP application layer - routes and main entry point.
//!
//! This crate contains:
//! - axum routes (command processing, Google account connection, health)
//! - Application context (dependency injection)
//! - Logging initialisation
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Caller identity comes from the `X-User-Id` header set by the
//!   authentication layer in front of this service

pub mod context;
pub mod routes;
pub mod utils;

pub use context::AppContext;
pub use routes::{router, USER_ID_HEADER};
