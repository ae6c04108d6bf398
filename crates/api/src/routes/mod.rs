//! HTTP routes
//!
//! Every error body is `{success: false, message}`. Command routes answer
//! with the routed outcome itself: 200 when it succeeded, 400 otherwise.

pub mod auth;
pub mod commands;
pub mod error;
pub mod health;
pub mod identity;
pub mod user;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

pub use error::ApiError;
pub use identity::{UserId, USER_ID_HEADER};

use crate::context::AppContext;

/// Build the application router over `ctx`
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/process", post(commands::process))
        .route("/api/route", post(commands::route))
        .route("/api/auth/google/url", get(auth::authorization_url))
        .route("/api/auth/google/callback", get(auth::callback))
        .route("/api/user/google-status", get(user::google_status))
        .with_state(ctx)
}
