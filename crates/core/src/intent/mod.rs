//! Intent extraction port and normalization

pub mod normalizer;
pub mod ports;

pub use normalizer::normalize;
pub use ports::IntentExtractor;
