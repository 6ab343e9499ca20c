//! Application state container
//!
//! Owns the database, the notification bus, the session and the document
//! service. Front ends hold one `App` and render what it reports.

use std::sync::Arc;

use docsentry_client::{Notifier, ReqwestTransport, Transport};
use docsentry_documents::DocumentService;
use docsentry_session::{SessionManager, SessionStatus};
use docsentry_storage::Database;

use crate::config::Config;
use crate::Result;

pub struct App {
    config: Config,
    db: Database,
    notifier: Notifier,
    session: SessionManager,
    documents: DocumentService,
}

impl App {
    /// Open the database and connect to the configured API
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let transport = ReqwestTransport::new(&config.api_url, config.request_timeout())?;
        let db = Database::open(&config.database_path)?;

        Ok(Self::with_transport(config, db, Arc::new(transport)))
    }

    /// Wire the services over an existing database and transport
    pub fn with_transport(config: Config, db: Database, transport: Arc<dyn Transport>) -> Self {
        let notifier = Notifier::new();
        let session = SessionManager::new(db.clone(), transport, notifier.clone());
        let documents = DocumentService::new(session.client().clone(), notifier.clone());

        tracing::debug!(api_url = %config.api_url, "App wired");

        Self {
            config,
            db,
            notifier,
            session,
            documents,
        }
    }

    /// Restore any stored session. Never fails; a bad credential just
    /// leaves the app anonymous.
    pub async fn initialize(&self) -> SessionStatus {
        let status = self.session.restore_session().await;
        tracing::info!(status = %status, "App initialized");
        status
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn documents(&self) -> &DocumentService {
        &self.documents
    }
}
