//! Result formatter / error classifier
//!
//! Maps internal failures into the closed [`FailureKind`] taxonomy and the
//! user-facing message carried by a failed [`ActionResult`].

use intentrelay_domain::constants::UNKNOWN_INTENT_MESSAGE;
use intentrelay_domain::{ActionKind, ActionResult, FailureKind, IntentRelayError};

/// Taxonomy bucket for an error
#[must_use]
pub fn classify(error: &IntentRelayError) -> FailureKind {
    match error {
        IntentRelayError::Validation(_) | IntentRelayError::InvalidInput(_) => {
            FailureKind::ValidationError
        }
        IntentRelayError::Auth(_) => FailureKind::AuthRequired,
        IntentRelayError::MalformedIntent(_) => FailureKind::UnknownIntent,
        IntentRelayError::Upstream(_)
        | IntentRelayError::Network(_)
        | IntentRelayError::Database(_)
        | IntentRelayError::Config(_)
        | IntentRelayError::NotFound(_)
        | IntentRelayError::Internal(_) => FailureKind::UpstreamError,
    }
}

/// Failed result for `error` raised while executing a `kind` action
///
/// Auth failures get the reconnect instruction; everything else surfaces
/// the error's own message.
#[must_use]
pub fn failure_result(kind: ActionKind, error: &IntentRelayError) -> ActionResult {
    let failure = classify(error);
    let message = match failure {
        FailureKind::AuthRequired => auth_required_message(&kind),
        _ => error.detail(),
    };
    ActionResult::failed(kind, failure, message)
}

/// Instruction shown when the user has to connect their Google account
#[must_use]
pub fn auth_required_message(kind: &ActionKind) -> String {
    format!(
        "Google account not connected. To use {}, connect your Google account and complete the authorization.",
        kind.integration_label()
    )
}

#[must_use]
pub fn unknown_intent_result() -> ActionResult {
    ActionResult::failed(ActionKind::Unknown, FailureKind::UnknownIntent, UNKNOWN_INTENT_MESSAGE)
}

#[must_use]
pub fn unsupported_kind_result(kind: &str) -> ActionResult {
    ActionResult::failed(
        ActionKind::Unsupported(kind.to_string()),
        FailureKind::UnknownIntent,
        format!("Unknown action type: {kind}"),
    )
}

/// Result for an action whose execution aborted unexpectedly
#[must_use]
pub fn unexpected_failure_result(kind: ActionKind) -> ActionResult {
    ActionResult::failed(
        kind,
        FailureKind::UpstreamError,
        "An unexpected error occurred while processing the action",
    )
}
