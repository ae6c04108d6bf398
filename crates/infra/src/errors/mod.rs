//! Conversions from external infrastructure errors into domain errors.

mod conversions;

pub use conversions::{upstream_error, InfraError};
