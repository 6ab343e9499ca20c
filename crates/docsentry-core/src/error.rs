//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] docsentry_storage::StorageError),

    #[error("Client error: {0}")]
    Client(#[from] docsentry_client::ClientError),

    #[error("Session error: {0}")]
    Session(#[from] docsentry_session::SessionError),

    #[error("Document error: {0}")]
    Document(#[from] docsentry_documents::DocumentError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
