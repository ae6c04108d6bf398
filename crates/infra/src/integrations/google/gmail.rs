//! Gmail client

use async_trait::async_trait;
use intentrelay_core::{MailGateway, SentMessage};
use intentrelay_domain::{IntentRelayError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::upstream_error;
use crate::http::{Delivery, HttpClient};

/// Sends prepared messages through the Gmail v1 REST API
pub struct GoogleGmailClient {
    http: HttpClient,
    base_url: String,
}

impl GoogleGmailClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into().trim_end_matches('/').to_string() }
    }
}

#[async_trait]
impl MailGateway for GoogleGmailClient {
    async fn send_raw(&self, access_token: &str, raw: &str) -> Result<SentMessage> {
        let url = format!("{}/users/me/messages/send", self.base_url);

        let response = self
            .http
            .send(
                self.http
                    .request(Method::POST, &url)
                    .bearer_auth(access_token)
                    .json(&SendRequest { raw }),
                Delivery::AtMostOnce,
            )
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error("Gmail", response).await);
        }

        let sent: SendResponse = response.json().await.map_err(|e| {
            IntentRelayError::Upstream(format!("Failed to parse Gmail response: {e}"))
        })?;

        if sent.id.is_empty() {
            return Err(IntentRelayError::Upstream("Failed to send email".into()));
        }

        debug!(message_id = %sent.id, "message sent");
        Ok(SentMessage { id: sent.id, thread_id: sent.thread_id })
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    raw: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    thread_id: String,
}
