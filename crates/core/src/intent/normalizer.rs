//! Intent normalizer
//!
//! Turns the model's raw response into an ordered, non-empty sequence of
//! typed intents. Order is preserved exactly as received; it is the
//! execution order.

use intentrelay_domain::{ActionIntent, ActionKind, IntentRelayError, RawIntentResponse, Result};

/// Normalize a raw model response
///
/// A non-empty `actions` list wins over the top-level fields. Without one,
/// the top-level intent is used, and a missing kind there means
/// [`ActionKind::Unknown`].
///
/// # Errors
/// `MalformedIntent` when any element of the `actions` list has no kind.
pub fn normalize(raw: RawIntentResponse) -> Result<Vec<ActionIntent>> {
    match raw.actions {
        Some(actions) if !actions.is_empty() => actions
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let kind = parse_kind(item.action.as_deref()).ok_or_else(|| {
                    IntentRelayError::MalformedIntent(format!("actions[{index}] has no action kind"))
                })?;
                Ok(ActionIntent::from_raw(kind, item))
            })
            .collect(),
        _ => {
            let kind = parse_kind(raw.single.action.as_deref()).unwrap_or(ActionKind::Unknown);
            Ok(vec![ActionIntent::from_raw(kind, raw.single)])
        }
    }
}

fn parse_kind(value: Option<&str>) -> Option<ActionKind> {
    value
        .map(str::trim)
        .filter(|kind| !kind.is_empty())
        .map(|kind| kind.parse::<ActionKind>().unwrap_or_else(|never| match never {}))
}
