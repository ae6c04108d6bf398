//! Caller identity supplied by the fronting authentication layer

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::ApiError;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Non-blank user id taken from [`USER_ID_HEADER`]
#[derive(Debug, Clone)]
pub struct UserId(pub String);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
            .ok_or_else(|| ApiError::unauthorized("User not authenticated"))
    }
}
