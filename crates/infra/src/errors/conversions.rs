//! Conversions from external infrastructure errors into domain errors.

use intentrelay_domain::{AuthError, IntentRelayError};
use reqwest::Error as HttpError;
use reqwest::{Response, StatusCode};
use rusqlite::Error as SqlError;
use serde::Deserialize;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub IntentRelayError);

impl From<InfraError> for IntentRelayError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<IntentRelayError> for InfraError {
    fn from(value: IntentRelayError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoIntentRelayError {
    fn into_intentrelay(self) -> IntentRelayError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → IntentRelayError */
/* -------------------------------------------------------------------------- */

impl IntoIntentRelayError for SqlError {
    fn into_intentrelay(self) -> IntentRelayError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        IntentRelayError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        IntentRelayError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 1555 | 2067) => {
                        IntentRelayError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::CannotOpen, _) => {
                        IntentRelayError::Database(format!("unable to open database: {message}"))
                    }
                    _ => IntentRelayError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                IntentRelayError::NotFound("no rows returned by query".into())
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                IntentRelayError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                IntentRelayError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => IntentRelayError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => IntentRelayError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_intentrelay())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → IntentRelayError */
/* -------------------------------------------------------------------------- */

impl IntoIntentRelayError for r2d2::Error {
    fn into_intentrelay(self) -> IntentRelayError {
        IntentRelayError::Database(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_intentrelay())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio JoinError → IntentRelayError */
/* -------------------------------------------------------------------------- */

impl IntoIntentRelayError for JoinError {
    fn into_intentrelay(self) -> IntentRelayError {
        if self.is_cancelled() {
            IntentRelayError::Internal("blocking task was cancelled".into())
        } else {
            IntentRelayError::Internal(format!("blocking task panicked: {self}"))
        }
    }
}

impl From<JoinError> for InfraError {
    fn from(value: JoinError) -> Self {
        InfraError(value.into_intentrelay())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → IntentRelayError */
/* -------------------------------------------------------------------------- */

impl IntoIntentRelayError for HttpError {
    fn into_intentrelay(self) -> IntentRelayError {
        if self.is_timeout() {
            return IntentRelayError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return IntentRelayError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let message = format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            );
            return status_error(status, message);
        }

        if self.is_decode() {
            return IntentRelayError::Upstream(format!("invalid response body: {self}"));
        }

        IntentRelayError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_intentrelay())
    }
}

/* -------------------------------------------------------------------------- */
/* Non-success responses */
/* -------------------------------------------------------------------------- */

/// Google-style error envelope: `{"error": {"code", "message", "status"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Convert a non-success response into a domain error
///
/// 401/403 become `Auth(Rejected)`; every other status becomes `Upstream`
/// carrying the provider's `error.message` when the body has one.
pub async fn upstream_error(service: &str, response: Response) -> IntentRelayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let detail = serde_json::from_str::<ErrorEnvelope>(&body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        });

    status_error(status, format!("{service} API error ({}): {detail}", status.as_u16()))
}

fn status_error(status: StatusCode, message: String) -> IntentRelayError {
    match status.as_u16() {
        401 | 403 => IntentRelayError::Auth(AuthError::Rejected(message)),
        404 => IntentRelayError::NotFound(message),
        429 => IntentRelayError::Network(message),
        _ => IntentRelayError::Upstream(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
