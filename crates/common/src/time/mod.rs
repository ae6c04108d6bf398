//! Time abstractions shared by the token lifecycle and date resolution.

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
