//! Google integrations
//!
//! - `oauth`: authorization code exchange and refresh grant for the
//!   process-wide client registration
//! - `calendar`, `tasks`, `gmail`: one mutating call each, authorized with
//!   the caller's access token
//!
//! Every API call goes out with
//! [`Delivery::AtMostOnce`](crate::http::Delivery); inserting an event or
//! sending a message twice is worse than reporting a transient failure.

pub mod calendar;
pub mod gmail;
pub mod oauth;
pub mod tasks;

pub use calendar::GoogleCalendarClient;
pub use gmail::GoogleGmailClient;
pub use oauth::GoogleOAuthProvider;
pub use tasks::GoogleTasksClient;
