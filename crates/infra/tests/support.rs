#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use intentrelay_common::MockClock;
use intentrelay_core::{
    ActionExecutor, AuthorizationFlow, BatchAggregator, CredentialStore, OAuthProvider,
};
use intentrelay_domain::{GoogleConfig, UserCredential};
use intentrelay_infra::database::{DbManager, SqliteCredentialRepository};
use intentrelay_infra::{
    GoogleCalendarClient, GoogleGmailClient, GoogleOAuthProvider, GoogleTasksClient, HttpClient,
};
use tempfile::TempDir;
use wiremock::MockServer;

pub const USER: &str = "user-1";

/// 2025-03-14 15:30:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 15, 30, 0).unwrap()
}

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with the schema applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("test.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("migrations should run");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    pub fn repository(&self) -> SqliteCredentialRepository {
        SqliteCredentialRepository::new(Arc::clone(&self.manager))
    }
}

/// Google config whose token endpoint and API base URLs point at `server`
pub fn google_config(server: &MockServer) -> GoogleConfig {
    let mut config = GoogleConfig::new("client-123", Some("secret-456".into()));
    config.token_endpoint = format!("{}/token", server.uri());
    config.calendar_base_url = format!("{}/calendar/v3", server.uri());
    config.tasks_base_url = format!("{}/tasks/v1", server.uri());
    config.gmail_base_url = format!("{}/gmail/v1", server.uri());
    config
}

/// Core services wired over SQLite and the real Google adapters
pub struct GoogleStack {
    pub db: TestDatabase,
    pub clock: MockClock,
    pub store: Arc<CredentialStore>,
    pub executor: Arc<ActionExecutor>,
    pub batch: Arc<BatchAggregator>,
    pub authorization: AuthorizationFlow,
}

impl GoogleStack {
    pub fn new(server: &MockServer) -> Self {
        let db = TestDatabase::new();
        let clock = MockClock::at(fixed_now());
        let config = google_config(server);

        let provider: Arc<dyn OAuthProvider> =
            Arc::new(GoogleOAuthProvider::from_config(config.clone()).expect("oauth provider"));
        let store = Arc::new(CredentialStore::new(
            Arc::new(db.repository()),
            Arc::clone(&provider),
            Arc::new(clock.clone()),
        ));

        let http = HttpClient::new(Duration::from_secs(5)).expect("http client");

        let executor = Arc::new(ActionExecutor::new(
            Arc::clone(&store),
            Arc::new(GoogleCalendarClient::new(http.clone(), config.calendar_base_url.clone())),
            Arc::new(GoogleTasksClient::new(http.clone(), config.tasks_base_url.clone())),
            Arc::new(GoogleGmailClient::new(http, config.gmail_base_url.clone())),
            Arc::new(clock.clone()),
        ));
        let batch = Arc::new(BatchAggregator::new(Arc::clone(&executor)));
        let authorization =
            AuthorizationFlow::new(provider, Arc::clone(&store), Arc::new(clock.clone()));

        Self { db, clock, store, executor, batch, authorization }
    }

    /// Store a credential for `USER` expiring `minutes` from now
    pub async fn seed_credential(&self, minutes: i64) {
        let expiry = fixed_now().timestamp_millis() + minutes * 60_000;
        self.store
            .put_credential(USER, UserCredential::new("stored-access", "stored-refresh", expiry))
            .await
            .expect("credential stored");
    }
}
