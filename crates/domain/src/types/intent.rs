//! Action intents
//!
//! Two shapes live here: the loosely typed [`RawIntentResponse`] exactly as a
//! language model emits it, and the closed [`ActionIntent`] union the
//! executor pattern-matches on.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, DeserializeFromStr, DisplayFromStr, PickFirst, SerializeDisplay};

use crate::constants::DEFAULT_EVENT_DURATION_MINUTES;
use crate::impl_keyword_conversions;

/// Kind of action requested by the user
///
/// Anything outside the four known kinds is kept verbatim as
/// [`ActionKind::Unsupported`] so results can name it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum ActionKind {
    Calendar,
    Task,
    Email,
    Unknown,
    Unsupported(String),
}

impl ActionKind {
    /// Name of the Google product behind this kind, for user-facing messages
    #[must_use]
    pub fn integration_label(&self) -> &'static str {
        match self {
            Self::Calendar => "Calendar",
            Self::Task => "Tasks",
            Self::Email => "Gmail",
            Self::Unknown | Self::Unsupported(_) => "Google services",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calendar => f.write_str("calendar"),
            Self::Task => f.write_str("task"),
            Self::Email => f.write_str("email"),
            Self::Unknown => f.write_str("unknown"),
            Self::Unsupported(kind) => f.write_str(kind),
        }
    }
}

impl FromStr for ActionKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_lowercase().as_str() {
            "calendar" => Self::Calendar,
            "task" => Self::Task,
            "email" => Self::Email,
            "unknown" => Self::Unknown,
            _ => Self::Unsupported(trimmed.to_string()),
        })
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl_keyword_conversions!(Priority {
    Low => "low",
    Medium => "medium",
    High => "high",
});

/// One intent object as produced by the language model
///
/// Every field is optional and leniently decoded: a duration may arrive as a
/// number or a numeric string, and an unrecognised priority is dropped rather
/// than failing the whole response.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIntent {
    #[serde(default, alias = "kind", skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default, alias = "durationMinutes", skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// Whole structured response for one user command
///
/// Either a single intent (flattened at the top level) or a non-empty
/// `actions` list, which takes precedence when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIntentResponse {
    #[serde(flatten)]
    pub single: RawIntent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<RawIntent>>,
}

impl RawIntentResponse {
    /// Decode from an already parsed JSON value
    ///
    /// # Errors
    /// Returns the serde error when the value is not an object or a field has
    /// an incompatible type (e.g. a numeric title).
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Decode from JSON text
    ///
    /// The text is parsed into a [`serde_json::Value`] first so lenient
    /// fields always see a fully buffered value.
    ///
    /// # Errors
    /// Returns the serde error when the text is not valid JSON or does not
    /// describe an intent object.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        Self::from_value(serde_json::from_str(text)?)
    }
}

/// Calendar event request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarIntent {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Absolute date or relative token ("today", "tomorrow", "next monday")
    pub date: Option<String>,
    /// Start time, `HH:MM` 24h
    pub time: Option<String>,
    pub duration_minutes: Option<u32>,
    pub location: Option<String>,
}

impl CalendarIntent {
    /// Requested duration, or one hour
    #[must_use]
    pub fn duration_or_default(&self) -> u32 {
        self.duration_minutes.filter(|minutes| *minutes > 0).unwrap_or(DEFAULT_EVENT_DURATION_MINUTES)
    }
}

/// Task request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskIntent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
}

/// E-mail send request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailIntent {
    pub recipient: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

/// One normalized action, ready for execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionIntent {
    Calendar(CalendarIntent),
    Task(TaskIntent),
    Email(EmailIntent),
    /// The model could not classify the request
    Unknown,
    /// The model named a kind this router does not handle
    Unsupported(String),
}

impl ActionIntent {
    /// Kind echoed into the result for this intent
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Calendar(_) => ActionKind::Calendar,
            Self::Task(_) => ActionKind::Task,
            Self::Email(_) => ActionKind::Email,
            Self::Unknown => ActionKind::Unknown,
            Self::Unsupported(kind) => ActionKind::Unsupported(kind.clone()),
        }
    }

    /// Build the typed intent for `kind`, keeping only the fields that kind uses
    #[must_use]
    pub fn from_raw(kind: ActionKind, raw: RawIntent) -> Self {
        match kind {
            ActionKind::Calendar => Self::Calendar(CalendarIntent {
                title: raw.title,
                description: raw.description,
                date: raw.date,
                time: raw.time,
                duration_minutes: raw.duration,
                location: raw.location,
            }),
            ActionKind::Task => Self::Task(TaskIntent {
                title: raw.title,
                description: raw.description,
                // Models sometimes put a task's due date under `date`
                due_date: raw.due_date.or(raw.date),
                priority: raw.priority,
            }),
            ActionKind::Email => Self::Email(EmailIntent {
                recipient: raw.recipient,
                subject: raw.subject,
                body: raw.body,
            }),
            ActionKind::Unknown => Self::Unknown,
            ActionKind::Unsupported(kind) => Self::Unsupported(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_action_kind_parsing_is_lenient() {
        assert_eq!("Calendar".parse::<ActionKind>().unwrap(), ActionKind::Calendar);
        assert_eq!(" task ".parse::<ActionKind>().unwrap(), ActionKind::Task);
        assert_eq!(
            "reminder".parse::<ActionKind>().unwrap(),
            ActionKind::Unsupported("reminder".to_string())
        );
        assert_eq!(ActionKind::Unsupported("reminder".into()).to_string(), "reminder");
    }

    #[test]
    fn test_action_kind_serializes_as_string() {
        assert_eq!(serde_json::to_value(ActionKind::Email).unwrap(), json!("email"));
        let kind: ActionKind = serde_json::from_value(json!("UNKNOWN")).unwrap();
        assert_eq!(kind, ActionKind::Unknown);
    }

    #[test]
    fn test_raw_intent_accepts_numeric_string_duration() {
        let raw = RawIntentResponse::from_value(json!({
            "action": "calendar",
            "title": "Standup",
            "duration": "30"
        }))
        .unwrap();
        assert_eq!(raw.single.duration, Some(30));

        let raw = RawIntentResponse::from_value(json!({"action": "calendar", "duration": 45}))
            .unwrap();
        assert_eq!(raw.single.duration, Some(45));
    }

    #[test]
    fn test_raw_intent_drops_unusable_optional_values() {
        let raw = RawIntentResponse::from_value(json!({
            "action": "task",
            "title": "Report",
            "duration": "about an hour",
            "priority": "urgent"
        }))
        .unwrap();
        assert_eq!(raw.single.duration, None);
        assert_eq!(raw.single.priority, None);
        assert_eq!(raw.single.title.as_deref(), Some("Report"));
    }

    #[test]
    fn test_raw_response_with_actions_list() {
        let raw = RawIntentResponse::from_json_str(
            r#"{"actions": [{"action": "task", "title": "A", "dueDate": "tomorrow", "priority": "High"},
                            {"kind": "email", "recipient": "a@b.c", "subject": "s", "body": "b"}]}"#,
        )
        .unwrap();
        let actions = raw.actions.unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].due_date.as_deref(), Some("tomorrow"));
        assert_eq!(actions[0].priority, Some(Priority::High));
        assert_eq!(actions[1].action.as_deref(), Some("email"));
        assert!(raw.single.action.is_none());
    }

    #[test]
    fn test_from_raw_keeps_kind_specific_fields() {
        let raw = RawIntent {
            action: Some("calendar".into()),
            title: Some("Standup".into()),
            time: Some("09:00".into()),
            recipient: Some("ignored@example.com".into()),
            ..RawIntent::default()
        };
        let intent = ActionIntent::from_raw(ActionKind::Calendar, raw);
        match intent {
            ActionIntent::Calendar(calendar) => {
                assert_eq!(calendar.title.as_deref(), Some("Standup"));
                assert_eq!(calendar.duration_or_default(), 60);
            }
            other => panic!("unexpected intent: {other:?}"),
        }
    }

    #[test]
    fn test_task_due_date_falls_back_to_date_field() {
        let raw = RawIntent { date: Some("2025-03-01".into()), ..RawIntent::default() };
        let ActionIntent::Task(task) = ActionIntent::from_raw(ActionKind::Task, raw) else {
            panic!("expected task");
        };
        assert_eq!(task.due_date.as_deref(), Some("2025-03-01"));
    }
}
