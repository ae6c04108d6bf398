//! Shared test helpers for `intentrelay-core` integration tests.
//!
//! Wires the core services over in-memory ports and a frozen clock so tests
//! can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod gateways;
pub mod repositories;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use intentrelay_common::MockClock;
use intentrelay_core::{
    ActionExecutor, AuthorizationFlow, BatchAggregator, CommandRouter, CredentialStore,
    IntentExtractor,
};
use intentrelay_domain::{RawIntentResponse, Result as DomainResult, UserCredential};

pub use gateways::{Behaviour, RecordingCalendar, RecordingMail, RecordingTasks};
pub use repositories::{token_set, InMemoryCredentialRepository, MockOAuthProvider};

pub const USER: &str = "user-1";
pub const MINUTE_MS: i64 = 60_000;

/// 2025-03-14 15:30:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 15, 30, 0).unwrap()
}

/// Credential for `USER` expiring `minutes` from [`fixed_now`]
pub fn credential_expiring_in(minutes: i64) -> UserCredential {
    UserCredential::new(
        "stored-access",
        "stored-refresh",
        fixed_now().timestamp_millis() + minutes * MINUTE_MS,
    )
}

/// Extractor answering every utterance with the same response
pub struct StaticExtractor(pub DomainResult<RawIntentResponse>);

#[async_trait]
impl IntentExtractor for StaticExtractor {
    async fn extract(&self, _text: &str) -> DomainResult<RawIntentResponse> {
        self.0.clone()
    }
}

/// Core services wired over mocks
pub struct Harness {
    pub clock: MockClock,
    pub repository: InMemoryCredentialRepository,
    pub provider: MockOAuthProvider,
    pub calendar: RecordingCalendar,
    pub tasks: RecordingTasks,
    pub mail: RecordingMail,
    pub store: Arc<CredentialStore>,
    pub executor: Arc<ActionExecutor>,
    pub batch: Arc<BatchAggregator>,
}

impl Harness {
    /// Harness where `USER` holds a credential valid for another hour
    pub fn authenticated() -> Self {
        Self::with_repository(
            InMemoryCredentialRepository::default().with_credential(USER, credential_expiring_in(60)),
        )
    }

    /// Harness with no stored credentials
    pub fn unauthenticated() -> Self {
        Self::with_repository(InMemoryCredentialRepository::default())
    }

    pub fn with_repository(repository: InMemoryCredentialRepository) -> Self {
        Self::build(repository, MockOAuthProvider::default(), true)
    }

    pub fn build(
        repository: InMemoryCredentialRepository,
        provider: MockOAuthProvider,
        serialize_refreshes: bool,
    ) -> Self {
        let clock = MockClock::at(fixed_now());
        let calendar = RecordingCalendar::default();
        let tasks = RecordingTasks::default();
        let mail = RecordingMail::default();

        let store = Arc::new(
            CredentialStore::new(
                Arc::new(repository.clone()),
                Arc::new(provider.clone()),
                Arc::new(clock.clone()),
            )
            .with_serialized_refreshes(serialize_refreshes),
        );
        let executor = Arc::new(
            ActionExecutor::new(
                Arc::clone(&store),
                Arc::new(calendar.clone()),
                Arc::new(tasks.clone()),
                Arc::new(mail.clone()),
                Arc::new(clock.clone()),
            )
            .with_time_zone(chrono_tz::Europe::Berlin),
        );
        let batch = Arc::new(BatchAggregator::new(Arc::clone(&executor)));

        Self { clock, repository, provider, calendar, tasks, mail, store, executor, batch }
    }

    pub fn authorization(&self) -> AuthorizationFlow {
        AuthorizationFlow::new(
            Arc::new(self.provider.clone()),
            Arc::clone(&self.store),
            Arc::new(self.clock.clone()),
        )
    }

    pub fn router(&self, extracted: DomainResult<RawIntentResponse>) -> CommandRouter {
        CommandRouter::new(Arc::new(StaticExtractor(extracted)), Arc::clone(&self.batch))
    }
}
