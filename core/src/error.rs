//! Error types for the request orchestrator.
//!
//! # Design
//! Almost every failure the orchestrator sees is absorbed where it happens:
//! a transport failure becomes an `onError()` call plus a log line, and a
//! form binding on a non-form element becomes an inert binding plus a log
//! line. Only two things reach the caller as `Err`: a JSON decode failure in
//! `parseJson` mode, and a payload that cannot be URL-encoded.

use thiserror::Error;

/// Errors returned by `Firing::resolve` and the request-preparing entry points.
#[derive(Debug, Error)]
pub enum AjaxError {
    /// The response body was not valid JSON while `parse_json` was set.
    ///
    /// Controls are already thawed when this is returned; `on_done` has not
    /// run and nothing was injected.
    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The outbound payload could not be serialized to a URL-encoded body.
    ///
    /// The encoder's own `Result` surfaces here. Payloads are flattened to
    /// string pairs first, which it always accepts, so the request-preparing
    /// entry points only return this if that flattening ever changes.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
