//! Liveness and database health

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::context::AppContext;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub database: ComponentHealth,
}

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /health`
///
/// 200 when the credential database answers, 503 otherwise.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> (StatusCode, Json<HealthReport>) {
    let db = Arc::clone(&ctx.db);
    let database = match tokio::task::spawn_blocking(move || db.health_check()).await {
        Ok(Ok(())) => ComponentHealth { healthy: true, message: None },
        Ok(Err(err)) => ComponentHealth { healthy: false, message: Some(err.detail()) },
        Err(err) => ComponentHealth { healthy: false, message: Some(err.to_string()) },
    };

    let (status, label) = if database.healthy {
        (StatusCode::OK, "ok")
    } else {
        tracing::warn!(error = ?database.message, "database health check failed");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (status, Json(HealthReport { status: label, version: env!("CARGO_PKG_VERSION"), database }))
}
