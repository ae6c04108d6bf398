//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use intentrelay_common::{Clock, SystemClock};
use intentrelay_core::{
    ActionExecutor, AuthorizationFlow, BatchAggregator, CommandRouter, CredentialRepository,
    CredentialStore, IntentExtractor, OAuthProvider,
};
use intentrelay_domain::{Config, Result};
use intentrelay_infra::{
    DbManager, GeminiIntentExtractor, GoogleCalendarClient, GoogleGmailClient,
    GoogleOAuthProvider, GoogleTasksClient, HttpClient, SqliteCredentialRepository,
};

// The ports carry `Send + Sync` as supertraits, so the plain trait objects
// are what the core services accept.

/// Type alias for credential repository port trait object
type DynCredentialRepository = dyn CredentialRepository;

/// Type alias for OAuth provider port trait object
type DynOAuthProvider = dyn OAuthProvider;

/// Type alias for intent extractor port trait object
type DynIntentExtractor = dyn IntentExtractor;

/// Per-call timeout for Google and Gemini requests
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub credentials: Arc<CredentialStore>,
    pub router: Arc<CommandRouter>,
    pub authorization: Arc<AuthorizationFlow>,
}

impl AppContext {
    /// Wire every service from `config`
    ///
    /// Opens the credential database and applies migrations. Missing Google
    /// client credentials do not fail construction; they surface when the
    /// authorization flow is used.
    ///
    /// # Errors
    /// `Database` when the database cannot be opened or migrated, `Config`
    /// for an unknown routing time zone.
    pub fn new(config: Config) -> Result<Self> {
        let time_zone = config.routing.time_zone()?;

        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size).map_err(
            |e| {
                tracing::error!(path = %config.database.path, error = %e, "failed to open credential database");
                e
            },
        )?);
        db.run_migrations()?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let repository: Arc<DynCredentialRepository> =
            Arc::new(SqliteCredentialRepository::new(Arc::clone(&db)));
        let provider: Arc<DynOAuthProvider> =
            Arc::new(GoogleOAuthProvider::from_config(config.google.clone())?);

        let credentials = Arc::new(
            CredentialStore::new(repository, Arc::clone(&provider), Arc::clone(&clock))
                .with_serialized_refreshes(config.routing.serialize_refreshes),
        );

        let http = HttpClient::new(UPSTREAM_TIMEOUT)?;
        let executor = Arc::new(
            ActionExecutor::new(
                Arc::clone(&credentials),
                Arc::new(GoogleCalendarClient::new(
                    http.clone(),
                    config.google.calendar_base_url.clone(),
                )),
                Arc::new(GoogleTasksClient::new(http.clone(), config.google.tasks_base_url.clone())),
                Arc::new(GoogleGmailClient::new(http.clone(), config.google.gmail_base_url.clone())),
                Arc::clone(&clock),
            )
            .with_time_zone(time_zone),
        );
        let batch = Arc::new(BatchAggregator::new(executor));

        let extractor: Arc<DynIntentExtractor> =
            Arc::new(GeminiIntentExtractor::new(http, &config.model));
        if config.model.api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; /api/process will fail until it is");
        }

        let router = Arc::new(CommandRouter::new(extractor, batch));
        let authorization =
            Arc::new(AuthorizationFlow::new(provider, Arc::clone(&credentials), clock));

        tracing::info!(
            db_path = %config.database.path,
            timezone = %time_zone,
            serialize_refreshes = config.routing.serialize_refreshes,
            "application context initialized"
        );

        Ok(Self { config, db, credentials, router, authorization })
    }

    /// Caller-side bound for one routed command
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.server.request_timeout_secs)
    }
}
