use std::time::Duration;

use intentrelay_domain::IntentRelayError;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use tracing::debug;

use crate::errors::InfraError;

const USER_AGENT: &str = concat!("intentrelay/", env!("CARGO_PKG_VERSION"));

/// Total attempts for a [`Delivery::Retryable`] request
const RETRYABLE_ATTEMPTS: usize = 3;

/// Pause between attempts when the server gives no `Retry-After`
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Upper bound on a server-requested `Retry-After` pause
const MAX_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Whether a request may reach the server more than once.
///
/// Model extraction only reads, so a lost or throttled answer can be asked
/// for again. Event inserts, task inserts and message sends create something
/// on the user's account; a retry after a slow success would duplicate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Repeat on 5xx, 429, timeouts and connect failures
    Retryable,
    /// Send once and hand back whatever came of it
    AtMostOnce,
}

impl Delivery {
    fn attempts(self) -> usize {
        match self {
            Self::Retryable => RETRYABLE_ATTEMPTS,
            Self::AtMostOnce => 1,
        }
    }
}

/// HTTP client shared by the Google and Gemini adapters.
///
/// Each call states its own [`Delivery`], so one client serves both the
/// mutating Google endpoints and the model endpoint.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Client whose every attempt is bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self, IntentRelayError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .map_err(|err| IntentRelayError::from(InfraError::from(err)))?;
        Ok(Self { client })
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute `builder` under the given delivery policy.
    ///
    /// Non-2xx answers come back as `Ok` for the adapter to interpret; only
    /// transport failures become errors.
    pub async fn send(
        &self,
        builder: RequestBuilder,
        delivery: Delivery,
    ) -> Result<Response, IntentRelayError> {
        let attempts = delivery.attempts();

        for attempt in 1..=attempts {
            let request = builder
                .try_clone()
                .ok_or_else(|| {
                    IntentRelayError::Internal(
                        "request body cannot be cloned; buffer the body to enable retries".into(),
                    )
                })?
                .build()
                .map_err(|err| IntentRelayError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let host = request.url().host_str().unwrap_or_default().to_string();
            let path = request.url().path().to_string();
            debug!(attempt, ?delivery, %method, %host, %path, "sending HTTP request");

            let last = attempt == attempts;
            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %host, %path, %status, "received HTTP response");

                    if !last && is_transient_status(status) {
                        tokio::time::sleep(retry_delay(&response)).await;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, %method, %host, %path, error = %err, "HTTP request failed");

                    if !last && (err.is_timeout() || err.is_connect()) {
                        tokio::time::sleep(RETRY_DELAY).await;
                        continue;
                    }
                    return Err(IntentRelayError::from(InfraError::from(err)));
                }
            }
        }

        Err(IntentRelayError::Internal(
            "http client exhausted retries without producing a result".into(),
        ))
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// `Retry-After` in seconds when present, capped; the fixed delay otherwise
fn retry_delay(response: &Response) -> Duration {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map_or(RETRY_DELAY, |secs| Duration::from_secs(secs).min(MAX_RETRY_DELAY))
}
