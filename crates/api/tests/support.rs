#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use intentrelay_api::{router, AppContext, USER_ID_HEADER};
use intentrelay_domain::{
    Config, DatabaseConfig, GoogleConfig, ModelConfig, RoutingConfig, ServerConfig,
    UserCredential,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::MockServer;

pub const USER: &str = "user-1";

/// Config whose Google and Gemini endpoints all point at `server`
pub fn test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut google = GoogleConfig::new("client-123", Some("secret-456".into()));
    google.token_endpoint = format!("{}/token", server.uri());
    google.calendar_base_url = format!("{}/calendar/v3", server.uri());
    google.tasks_base_url = format!("{}/tasks/v1", server.uri());
    google.gmail_base_url = format!("{}/gmail/v1", server.uri());

    Config {
        server: ServerConfig { bind_address: "127.0.0.1:0".into(), request_timeout_secs: 5 },
        google,
        model: ModelConfig {
            api_key: Some("model-key".into()),
            model: "gemini-1.5-flash".into(),
            base_url: format!("{}/v1beta", server.uri()),
        },
        database: DatabaseConfig {
            path: dir.path().join("credentials.db").to_string_lossy().into_owned(),
            pool_size: 2,
        },
        routing: RoutingConfig::default(),
        log_level: "info".into(),
    }
}

/// Router over a fully wired context with a temporary database
pub struct TestApp {
    pub server: MockServer,
    pub ctx: Arc<AppContext>,
    app: Router,
    _dir: TempDir,
}

impl TestApp {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    pub async fn start_with(adjust: impl FnOnce(&mut Config)) -> Self {
        let server = MockServer::start().await;
        let dir = TempDir::new().expect("temp dir should be created");
        let mut config = test_config(&server, &dir);
        adjust(&mut config);

        let ctx = Arc::new(AppContext::new(config).expect("context should build"));
        let app = router(Arc::clone(&ctx));
        Self { server, ctx, app, _dir: dir }
    }

    /// Store a credential for `USER` valid for the next hour
    pub async fn connect_user(&self) {
        let expiry = Utc::now().timestamp_millis() + 3_600_000;
        self.ctx
            .credentials
            .put_credential(USER, UserCredential::new("stored-access", "stored-refresh", expiry))
            .await
            .expect("credential stored");
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user);
        }
        self.send(builder.body(Body::empty()).expect("request")).await
    }

    pub async fn post_json(&self, uri: &str, user: Option<&str>, body: &Value) -> (StatusCode, Value) {
        let mut builder =
            Request::builder().method("POST").uri(uri).header("content-type", "application/json");
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user);
        }
        self.send(builder.body(Body::from(body.to_string())).expect("request")).await
    }
}

/// Gemini `generateContent` body whose first candidate is `intent`
pub fn model_reply(intent: &Value) -> Value {
    serde_json::json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": intent.to_string()}]}}]
    })
}
