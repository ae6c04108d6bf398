//! # IntentRelay Domain
//!
//! Business domain types and models for IntentRelay.
//!
//! This crate contains:
//! - The action intent tagged union and the raw model response it is
//!   normalized from
//! - Action, batch and routing results with the failure taxonomy
//! - Per-user OAuth credentials
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Relative date resolution
//!
//! ## Architecture
//! - No dependencies on other IntentRelay crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
