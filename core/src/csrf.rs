//! CSRF token reconciliation between the payload and the request headers.
//!
//! Every firing reconciles afresh. When a token is configured it overwrites
//! whatever the payload carried; when none is configured the payload's own
//! token (say, a hidden form input) becomes the effective one. Either way the
//! returned token is exactly what the payload now holds, and it is what goes
//! into the `X-CSRF-Token` header. A token missing on both sides is the empty
//! string.

use serde_json::Value;

use crate::error::AjaxError;
use crate::payload::{FieldSet, Payload};

/// Name of the payload field that carries the token.
pub const CSRF_FIELD: &str = "csrf_token";

/// Header the token is always attached under.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Reconcile the token into an event payload. Returns the effective token.
pub fn reconcile_payload(configured: Option<&str>, payload: &mut Payload) -> String {
    let token = match configured {
        Some(token) => token.to_string(),
        None => payload.get(CSRF_FIELD).map(value_text).unwrap_or_default(),
    };
    payload.insert(CSRF_FIELD.to_string(), Value::String(token.clone()));
    token
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reconcile the token into a structured field set. Returns the effective token.
pub fn reconcile_fields(configured: Option<&str>, fields: &mut FieldSet) -> String {
    let token = match configured {
        Some(token) => token.to_string(),
        None => fields.get_text(CSRF_FIELD).unwrap_or_default().to_string(),
    };
    fields.set(CSRF_FIELD, token.as_str());
    token
}

/// Reconcile the token into a URL-encoded form serialization.
///
/// Any `csrf_token` components already present are removed, then exactly one
/// `&csrf_token=<token>` is appended. Returns `(body, token)`.
pub fn reconcile_serialized(
    configured: Option<&str>,
    serialized: &str,
) -> Result<(String, String), AjaxError> {
    let mut carried: Option<String> = None;
    let mut kept = Vec::new();
    for part in serialized.split('&').filter(|p| !p.is_empty()) {
        match decode_pair(part) {
            Some((key, value)) if key == CSRF_FIELD => {
                carried.get_or_insert(value);
            }
            _ => kept.push(part),
        }
    }

    let token = match configured {
        Some(token) => token.to_string(),
        None => carried.unwrap_or_default(),
    };
    let suffix = serde_urlencoded::to_string(&[(CSRF_FIELD, token.as_str())])
        .map_err(|e| AjaxError::Serialization(e.to_string()))?;
    let body = format!("{}&{suffix}", kept.join("&"));
    Ok((body, token))
}

fn decode_pair(part: &str) -> Option<(String, String)> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(part)
        .ok()?
        .into_iter()
        .next()
}
