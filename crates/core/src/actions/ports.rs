//! Port interfaces for the calendar, task-list and mail integrations
//!
//! Each call carries the caller's access token explicitly; adapters hold no
//! per-user state.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use intentrelay_domain::Result;

/// Event to insert into a calendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCalendarEvent {
    pub calendar_id: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// IANA zone name sent alongside both timestamps
    pub time_zone: String,
}

/// Event as confirmed by the calendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    pub id: String,
    pub summary: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Task to insert into a task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub task_list_id: String,
    pub title: String,
    pub notes: String,
    pub due: Option<NaiveDate>,
    pub status: String,
}

/// Task as confirmed by the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    pub id: String,
    pub title: String,
    pub due: Option<String>,
    pub status: String,
}

/// Identifiers of a sent message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: String,
    pub thread_id: String,
}

#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Insert one event
    async fn insert_event(&self, access_token: &str, event: &NewCalendarEvent) -> Result<CreatedEvent>;
}

#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// Insert one task
    async fn insert_task(&self, access_token: &str, task: &NewTask) -> Result<CreatedTask>;
}

#[async_trait]
pub trait MailGateway: Send + Sync {
    /// Send a base64url-encoded RFC 5322 message
    async fn send_raw(&self, access_token: &str, raw: &str) -> Result<SentMessage>;
}
