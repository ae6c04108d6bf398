//! Google Calendar client

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use intentrelay_core::{CalendarGateway, CreatedEvent, NewCalendarEvent};
use intentrelay_domain::{IntentRelayError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::upstream_error;
use crate::http::{Delivery, HttpClient};

/// Inserts events through the Calendar v3 REST API
pub struct GoogleCalendarClient {
    http: HttpClient,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into().trim_end_matches('/').to_string() }
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendarClient {
    async fn insert_event(
        &self,
        access_token: &str,
        event: &NewCalendarEvent,
    ) -> Result<CreatedEvent> {
        let url = format!("{}/calendars/{}/events", self.base_url, event.calendar_id);
        let body = EventRequest::from(event);

        let response = self
            .http
            .send(
                self.http.request(Method::POST, &url).bearer_auth(access_token).json(&body),
                Delivery::AtMostOnce,
            )
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error("Calendar", response).await);
        }

        let created: EventResponse = response.json().await.map_err(|e| {
            IntentRelayError::Upstream(format!("Failed to parse Calendar response: {e}"))
        })?;

        if created.id.is_empty() {
            return Err(IntentRelayError::Upstream("Failed to create calendar event".into()));
        }

        debug!(event_id = %created.id, "calendar event inserted");

        Ok(CreatedEvent {
            id: created.id,
            summary: created.summary.unwrap_or_else(|| event.summary.clone()),
            start: created.start.and_then(EventDateTime::parse).unwrap_or(event.start),
            end: created.end.and_then(EventDateTime::parse).unwrap_or(event.end),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventRequest<'a> {
    summary: &'a str,
    description: &'a str,
    start: EventTime<'a>,
    end: EventTime<'a>,
    location: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

impl<'a> From<&'a NewCalendarEvent> for EventRequest<'a> {
    fn from(event: &'a NewCalendarEvent) -> Self {
        Self {
            summary: &event.summary,
            description: &event.description,
            start: EventTime {
                date_time: event.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                time_zone: &event.time_zone,
            },
            end: EventTime {
                date_time: event.end.to_rfc3339_opts(SecondsFormat::Secs, true),
                time_zone: &event.time_zone,
            },
            location: &event.location,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventResponse {
    #[serde(default)]
    id: String,
    summary: Option<String>,
    start: Option<EventDateTime>,
    end: Option<EventDateTime>,
}

#[derive(Debug, Deserialize)]
struct EventDateTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
}

impl EventDateTime {
    fn parse(self) -> Option<DateTime<FixedOffset>> {
        self.date_time.as_deref().and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }
}
