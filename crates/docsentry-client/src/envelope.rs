//! API response envelope
//!
//! Success payloads carry their fields at the top level of the body
//! (`{"user": ..., "token": ...}`, `{"documents": [...]}`). Failures carry
//! `{"error": {"message": "..."}}`.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Extract the server-supplied error message from a failure body.
///
/// Blank messages count as absent so callers fall back to their generic text.
pub fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
}
