//! Action executor
//!
//! Runs one normalized intent against its integration and always returns
//! an [`ActionResult`]; errors never escape `execute`. Each successful call
//! creates exactly one external resource and nothing is retried.

use std::sync::Arc;

use chrono::Duration;
use chrono_tz::Tz;
use intentrelay_common::Clock;
use intentrelay_domain::constants::{
    CALENDAR_SUCCESS_MESSAGE, DEFAULT_TASK_LIST_ID, EMAIL_SUCCESS_MESSAGE, PRIMARY_CALENDAR_ID,
    TASK_STATUS_NEEDS_ACTION, TASK_SUCCESS_MESSAGE,
};
use intentrelay_domain::utils::dates;
use intentrelay_domain::{
    ActionData, ActionIntent, ActionKind, ActionResult, CalendarIntent, EmailIntent,
    IntentRelayError, Result, TaskIntent,
};
use tracing::{info, warn};

use super::classifier;
use super::mime::encode_plain_text_message;
use super::ports::{CalendarGateway, MailGateway, NewCalendarEvent, NewTask, TaskGateway};
use crate::credentials::CredentialStore;

/// Action executor service
pub struct ActionExecutor {
    credentials: Arc<CredentialStore>,
    calendar: Arc<dyn CalendarGateway>,
    tasks: Arc<dyn TaskGateway>,
    mail: Arc<dyn MailGateway>,
    clock: Arc<dyn Clock>,
    time_zone: Tz,
}

impl ActionExecutor {
    /// Create an executor resolving relative dates in UTC
    pub fn new(
        credentials: Arc<CredentialStore>,
        calendar: Arc<dyn CalendarGateway>,
        tasks: Arc<dyn TaskGateway>,
        mail: Arc<dyn MailGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { credentials, calendar, tasks, mail, clock, time_zone: Tz::UTC }
    }

    /// Zone used for relative dates and the event `timeZone` field
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Execute one intent for `user_id`
    pub async fn execute(&self, user_id: &str, intent: &ActionIntent) -> ActionResult {
        let kind = intent.kind();
        let outcome = match intent {
            ActionIntent::Calendar(calendar) => self.create_event(user_id, calendar).await,
            ActionIntent::Task(task) => self.create_task(user_id, task).await,
            ActionIntent::Email(email) => self.send_email(user_id, email).await,
            ActionIntent::Unknown => Ok(classifier::unknown_intent_result()),
            ActionIntent::Unsupported(other) => Ok(classifier::unsupported_kind_result(other)),
        };

        let result = outcome.unwrap_or_else(|err| classifier::failure_result(kind, &err));

        if result.success {
            info!(user_id, kind = %result.kind, "action succeeded");
        } else {
            warn!(
                user_id,
                kind = %result.kind,
                failure_kind = ?result.failure_kind,
                message = %result.message,
                "action failed"
            );
        }
        result
    }

    async fn create_event(&self, user_id: &str, intent: &CalendarIntent) -> Result<ActionResult> {
        let title = required(intent.title.as_deref(), "Event title is required")?;

        let now = self.clock.now().with_timezone(&self.time_zone);
        let day_start = dates::resolve_event_start_date(intent.date.as_deref(), &now);
        if let Some(time) = intent.time.as_deref().filter(|t| dates::parse_hh_mm(t).is_none()) {
            warn!(user_id, time, "ignoring unparseable event time");
        }
        let start =
            dates::localize(&self.time_zone, dates::apply_time(day_start, intent.time.as_deref()));
        let end = start + Duration::minutes(i64::from(intent.duration_or_default()));

        let access_token = self.credentials.get_valid_access_token(user_id).await?;

        let event = NewCalendarEvent {
            calendar_id: PRIMARY_CALENDAR_ID.to_string(),
            summary: title.to_string(),
            description: intent.description.clone().unwrap_or_default(),
            location: intent.location.clone().unwrap_or_default(),
            start: start.fixed_offset(),
            end: end.fixed_offset(),
            time_zone: self.time_zone.name().to_string(),
        };
        let created = self.calendar.insert_event(&access_token, &event).await?;

        Ok(ActionResult::succeeded(
            ActionKind::Calendar,
            CALENDAR_SUCCESS_MESSAGE,
            ActionData::Event {
                id: created.id,
                title: created.summary,
                start: created.start,
                end: created.end,
            },
        ))
    }

    async fn create_task(&self, user_id: &str, intent: &TaskIntent) -> Result<ActionResult> {
        let title = required(intent.title.as_deref(), "Task title is required")?;

        let now = self.clock.now().with_timezone(&self.time_zone);
        let due = intent
            .due_date
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .map(|token| dates::resolve_task_due_date(token, &now));

        let access_token = self.credentials.get_valid_access_token(user_id).await?;

        let task = NewTask {
            task_list_id: DEFAULT_TASK_LIST_ID.to_string(),
            title: title.to_string(),
            notes: intent.description.clone().unwrap_or_default(),
            due,
            status: TASK_STATUS_NEEDS_ACTION.to_string(),
        };
        let created = self.tasks.insert_task(&access_token, &task).await?;

        Ok(ActionResult::succeeded(
            ActionKind::Task,
            TASK_SUCCESS_MESSAGE,
            ActionData::Task {
                id: created.id,
                title: created.title,
                due: created.due,
                status: created.status,
            },
        ))
    }

    async fn send_email(&self, user_id: &str, intent: &EmailIntent) -> Result<ActionResult> {
        let recipient = required(intent.recipient.as_deref(), "Email recipient is required")?;
        let subject = required(intent.subject.as_deref(), "Email subject is required")?;
        let body = required(intent.body.as_deref(), "Email body is required")?;

        if !is_plausible_address(recipient) {
            return Err(IntentRelayError::Validation(format!(
                "Email recipient is not a valid address: {recipient}"
            )));
        }
        if subject.contains(['\r', '\n']) {
            return Err(IntentRelayError::Validation(
                "Email subject must be a single line".to_string(),
            ));
        }

        let access_token = self.credentials.get_valid_access_token(user_id).await?;

        let raw = encode_plain_text_message(recipient, subject, body);
        let sent = self.mail.send_raw(&access_token, &raw).await?;

        Ok(ActionResult::succeeded(
            ActionKind::Email,
            EMAIL_SUCCESS_MESSAGE,
            ActionData::Message { id: sent.id, thread_id: sent.thread_id },
        ))
    }
}

/// Trimmed value of a required field
fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| IntentRelayError::Validation(message.to_string()))
}

fn is_plausible_address(address: &str) -> bool {
    if address.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    match address.rsplit_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}
