//! Macro for implementing Display and FromStr for closed keyword enums
//!
//! Model output arrives as loosely formatted strings ("High", " low "), so
//! parsing trims and ignores case while display is always the canonical
//! lowercase keyword.
//!
//! # Example
//!
//! ```rust
//! use intentrelay_domain::impl_keyword_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Urgency {
//!     Later,
//!     Now,
//! }
//!
//! impl_keyword_conversions!(Urgency {
//!     Later => "later",
//!     Now => "now",
//! });
//!
//! assert_eq!(" NOW ".parse::<Urgency>(), Ok(Urgency::Now));
//! ```

/// Implements Display and FromStr for keyword enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase keyword
#[macro_export]
macro_rules! impl_keyword_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
