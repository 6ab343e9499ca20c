//! DocSentry Core
//!
//! Configuration, logging setup and the [`App`] container that wires storage,
//! session and documents together.

mod app;
mod config;
mod error;

pub use app::App;
pub use config::{Config, CONFIG_FILE, DEFAULT_API_URL, ENV_API_URL, ENV_DATA_DIR};
pub use error::CoreError;

// Re-export the component crates
pub use docsentry_client::{
    drain_notifications, ClientError, Notification, NotificationLevel, Notifier,
};
pub use docsentry_documents::{
    AnalysisType, Dashboard, Document, DocumentError, DocumentId, DocumentService,
    DocumentStats, DocumentStatus, DownloadedFile, LlmProvider,
};
pub use docsentry_session::{
    RegistrationForm, SessionError, SessionEvent, SessionManager, SessionStatus, User,
};
pub use docsentry_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging to stderr. `RUST_LOG` overrides the default filter.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
