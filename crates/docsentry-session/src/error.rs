//! Session error types

use docsentry_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    /// Login or registration did not produce a session. `reason` is the
    /// server's message verbatim when it sent one.
    #[error("{reason}")]
    AuthFailed {
        reason: String,
        #[source]
        source: ClientError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] docsentry_storage::StorageError),
}

impl SessionError {
    pub(crate) fn auth_failed(source: ClientError, fallback: &str) -> Self {
        let reason = source
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());
        SessionError::AuthFailed { reason, source }
    }

    /// Text suitable for showing next to the form that triggered the call
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
