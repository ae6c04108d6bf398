//! HTTP surface tests: the real router and context, with Google and Gemini
//! served by wiremock.

mod support;

use std::time::Duration;

use axum::http::StatusCode;
use intentrelay_domain::UserCredential;
use serde_json::json;
use support::{model_reply, TestApp, USER};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn state_param(url: &str) -> String {
    let start = url.find("state=").expect("state parameter") + "state=".len();
    url[start..].split('&').next().unwrap_or_default().to_string()
}

#[tokio::test]
async fn health_reports_database() {
    let app = TestApp::start().await;

    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["healthy"], true);
}

#[tokio::test]
async fn process_requires_user_identity() {
    let app = TestApp::start().await;

    let (status, body) = app.post_json("/api/process", None, &json!({"text": "hello"})).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn process_rejects_blank_text() {
    let app = TestApp::start().await;

    let (status, body) = app.post_json("/api/process", Some(USER), &json!({"text": "   "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "message": "Text is required"}));
}

#[tokio::test]
async fn process_creates_calendar_event() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "model-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(&json!({
            "action": "calendar",
            "title": "Dentist",
            "date": "2030-03-20",
            "time": "14:00",
            "duration": 30
        }))))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/calendar/v3/calendars/primary/events"))
        .and(header("authorization", "Bearer stored-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "evt-9"})))
        .expect(1)
        .mount(&app.server)
        .await;
    app.connect_user().await;

    let (status, body) =
        app.post_json("/api/process", Some(USER), &json!({"text": "dentist at 2pm"})).await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["kind"], "calendar");
    assert_eq!(body["data"]["id"], "evt-9");
}

#[tokio::test]
async fn process_model_failure_is_bad_gateway() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid"}
        })))
        .mount(&app.server)
        .await;

    let (status, body) = app.post_json("/api/process", Some(USER), &json!({"text": "hi"})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap_or_default().contains("API key not valid"));
}

#[tokio::test]
async fn process_times_out_as_gateway_timeout() {
    let app = TestApp::start_with(|config| config.server.request_timeout_secs = 1).await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(model_reply(&json!({"action": "unknown"})))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&app.server)
        .await;

    let (status, body) = app.post_json("/api/process", Some(USER), &json!({"text": "slow"})).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn route_batch_reports_partial_failure() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks/v1/lists/@default/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "task-1",
            "title": "Buy milk",
            "status": "needsAction"
        })))
        .expect(1)
        .mount(&app.server)
        .await;
    app.connect_user().await;

    let raw = json!({"actions": [
        {"action": "task", "title": "Buy milk"},
        {"action": "unknown"}
    ]});
    let (status, body) = app.post_json("/api/route", Some(USER), &raw).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["overallSuccess"], false);
    assert_eq!(body["total"], 2);
    assert_eq!(body["succeeded"], 1);
    assert_eq!(body["results"][0]["success"], true);
    assert_eq!(body["results"][1]["failureKind"], "UnknownIntent");
}

#[tokio::test]
async fn route_without_credential_requires_auth() {
    let app = TestApp::start().await;

    let raw = json!({"action": "email", "recipient": "bob@example.com", "subject": "Hi", "body": "Hello"});
    let (status, body) = app.post_json("/api/route", Some(USER), &raw).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["requiresAuth"], true);
    assert_eq!(body["failureKind"], "AuthRequired");
    assert!(app.server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn route_malformed_actions_is_unknown_intent() {
    let app = TestApp::start().await;

    let raw = json!({"actions": [{"action": "task", "title": "A"}, {"title": "no kind"}]});
    let (status, body) = app.post_json("/api/route", Some(USER), &raw).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "unknown");
    assert_eq!(body["failureKind"], "UnknownIntent");
}

#[tokio::test]
async fn authorization_round_trip_connects_account() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=consent-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new-access",
            "refresh_token": "new-refresh",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let (status, body) = app.get("/api/auth/google/url", Some(USER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let auth_url = body["authUrl"].as_str().expect("authUrl").to_string();
    assert!(auth_url.contains("access_type=offline"));
    assert!(auth_url.contains("client_id=client-123"));

    let state = state_param(&auth_url);
    let (status, body) = app
        .get(&format!("/api/auth/google/callback?code=consent-code&state={state}"), None)
        .await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(
        body,
        json!({"success": true, "message": "Google account connected successfully"})
    );
    let stored = app.ctx.credentials.get_credential(USER).await.expect("credential");
    assert_eq!(stored.refresh_token, "new-refresh");
}

#[tokio::test]
async fn callback_with_unknown_state_is_rejected() {
    let app = TestApp::start().await;

    let (status, body) = app.get("/api/auth/google/callback?code=abc&state=forged", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Authorization state is unknown or expired");
}

#[tokio::test]
async fn callback_reports_declined_consent() {
    let app = TestApp::start().await;

    let (status, body) = app.get("/api/auth/google/callback?error=access_denied", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap_or_default().contains("access_denied"));
}

#[tokio::test]
async fn google_status_reports_connection() {
    let app = TestApp::start().await;

    let (status, body) = app.get("/api/user/google-status", Some(USER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "connected": false, "message": "Google account not connected"})
    );

    app.connect_user().await;
    let (status, body) = app.get("/api/user/google-status", Some(USER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "connected": true, "message": "Google account connected"})
    );
}

#[tokio::test]
async fn google_status_without_refresh_token_is_not_connected() {
    let app = TestApp::start().await;
    app.ctx
        .credentials
        .put_credential(USER, UserCredential::new("access-only", "", i64::MAX))
        .await
        .expect("credential stored");

    let (status, body) = app.get("/api/user/google-status", Some(USER)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], false);
}

#[tokio::test]
async fn google_status_requires_user_identity() {
    let app = TestApp::start().await;

    let (status, body) = app.get("/api/user/google-status", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn authorization_url_requires_client_secret() {
    let app = TestApp::start_with(|config| config.google.client_secret = None).await;

    let (status, body) = app.get("/api/auth/google/url", Some(USER)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "GOOGLE_CLIENT_SECRET is not configured");
}
