//! Document error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Please select a file")]
    NoFile,

    #[error("Unsupported file type: {0} (accepted: PDF, DOCX, TXT)")]
    UnsupportedType(String),

    #[error("File is too large: {size} bytes (maximum {max})")]
    TooLarge { size: u64, max: u64 },

    #[error("API error: {0}")]
    Client(#[from] docsentry_client::ClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentError {
    pub fn server_message(&self) -> Option<&str> {
        match self {
            DocumentError::Client(e) => e.server_message(),
            _ => None,
        }
    }
}
