//! Action, batch and routing outcomes

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::intent::ActionKind;

/// Closed failure taxonomy surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// A required field is missing; not retryable without new input
    ValidationError,
    /// Credential missing or invalid; the caller should start authorization
    AuthRequired,
    /// The external integration rejected or failed the call
    UpstreamError,
    /// The model could not classify the request
    UnknownIntent,
}

/// Kind-specific payload of a successful action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionData {
    Event {
        id: String,
        title: String,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
    Task {
        id: String,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        due: Option<String>,
        status: String,
    },
    Message {
        id: String,
        #[serde(rename = "threadId")]
        thread_id: String,
    },
}

/// Outcome of executing one action intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub success: bool,
    pub kind: ActionKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ActionData>,
    pub requires_auth: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
}

impl ActionResult {
    #[must_use]
    pub fn succeeded(kind: ActionKind, message: impl Into<String>, data: ActionData) -> Self {
        Self {
            success: true,
            kind,
            message: message.into(),
            data: Some(data),
            requires_auth: false,
            failure_kind: None,
        }
    }

    /// Failed result; `requires_auth` follows from the failure kind
    #[must_use]
    pub fn failed(kind: ActionKind, failure: FailureKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            kind,
            message: message.into(),
            data: None,
            requires_auth: failure == FailureKind::AuthRequired,
            failure_kind: Some(failure),
        }
    }
}

/// Aggregate over an ordered sequence of action results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub overall_success: bool,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub message: String,
    pub results: Vec<ActionResult>,
}

impl BatchResult {
    /// Aggregate results, preserving their order
    #[must_use]
    pub fn from_results(results: Vec<ActionResult>) -> Self {
        let total = results.len();
        let succeeded = results.iter().filter(|result| result.success).count();
        let failed = total - succeeded;

        Self {
            overall_success: failed == 0,
            total,
            succeeded,
            failed,
            message: summarize(succeeded, total),
            results,
        }
    }

    /// Whether any failed action needs the user to authorize again
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.results.iter().any(|result| result.requires_auth)
    }
}

fn summarize(succeeded: usize, total: usize) -> String {
    let failed = total - succeeded;
    if failed == 0 {
        format!("Completed {succeeded} of {total} actions successfully.")
    } else if succeeded == 0 {
        format!("All actions failed ({succeeded} of {total} succeeded).")
    } else {
        format!("Completed {succeeded} of {total} actions; {failed} failed.")
    }
}

/// Result of routing one command: a lone action or a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteOutcome {
    Single(ActionResult),
    Batch(BatchResult),
}

impl RouteOutcome {
    #[must_use]
    pub fn success(&self) -> bool {
        match self {
            Self::Single(result) => result.success,
            Self::Batch(batch) => batch.overall_success,
        }
    }

    #[must_use]
    pub fn requires_auth(&self) -> bool {
        match self {
            Self::Single(result) => result.requires_auth,
            Self::Batch(batch) => batch.requires_auth(),
        }
    }
}
