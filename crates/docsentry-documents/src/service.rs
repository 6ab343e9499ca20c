//! Document service
//!
//! Talks to the document endpoints through the shared [`ApiClient`]; pass the
//! session's client so credentials and 401 handling apply here too.

use serde::Deserialize;
use std::path::Path;

use docsentry_client::{ApiClient, Notifier, Url};

use crate::document::{Dashboard, Document, DocumentId, DocumentList};
use crate::download::DownloadedFile;
use crate::error::DocumentError;
use crate::upload::{AnalysisType, AnalysisUpload, LlmProvider};
use crate::Result;

pub const FETCH_FAILED: &str = "Failed to fetch documents";
pub const UPLOAD_STARTED: &str = "Document uploaded and analysis started!";
pub const UPLOAD_FAILED: &str = "Upload failed";
pub const DOWNLOAD_FAILED: &str = "Download failed";

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    document: CreatedDocument,
}

#[derive(Debug, Deserialize)]
struct CreatedDocument {
    id: DocumentId,
}

#[derive(Clone)]
pub struct DocumentService {
    client: ApiClient,
    notifier: Notifier,
}

impl DocumentService {
    pub fn new(client: ApiClient, notifier: Notifier) -> Self {
        Self { client, notifier }
    }

    /// Fetch the document list, propagating any failure
    pub async fn fetch_documents(&self) -> Result<Vec<Document>> {
        let list: DocumentList = self.client.get_json("/documents").await?;
        Ok(list.documents)
    }

    /// Document list for display. A failed fetch yields an empty list and a
    /// single error notification.
    pub async fn list_documents(&self) -> Vec<Document> {
        match self.fetch_documents().await {
            Ok(documents) => {
                tracing::debug!(count = documents.len(), "Fetched documents");
                documents
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch documents");
                self.notifier.error(FETCH_FAILED);
                Vec::new()
            }
        }
    }

    pub async fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.list_documents().await)
    }

    /// Upload a document and start its analysis. Returns the new document id.
    pub async fn analyze(&self, upload: AnalysisUpload) -> Result<DocumentId> {
        let file_name = upload.file_name.clone();
        let provider = upload.provider;
        let analysis_type = upload.analysis_type;

        match self
            .client
            .post_multipart::<AnalyzeResponse>("/documents/analyze", upload.into_parts())
            .await
        {
            Ok(response) => {
                let id = response.document.id;
                tracing::info!(
                    document_id = %id,
                    file_name = %file_name,
                    provider = %provider,
                    analysis_type = %analysis_type,
                    "Analysis started"
                );
                self.notifier.success(UPLOAD_STARTED);
                Ok(id)
            }
            Err(e) => {
                let message = e.server_message().unwrap_or(UPLOAD_FAILED).to_string();
                self.notifier.error(message);
                Err(e.into())
            }
        }
    }

    /// Validate and upload a file from disk. `None` is the "nothing selected"
    /// case and never reaches the network.
    pub async fn analyze_file(
        &self,
        path: Option<&Path>,
        provider: LlmProvider,
        analysis_type: AnalysisType,
    ) -> Result<DocumentId> {
        let Some(path) = path else {
            self.notifier.error(DocumentError::NoFile.to_string());
            return Err(DocumentError::NoFile);
        };

        let upload = match AnalysisUpload::from_path(path, provider, analysis_type).await {
            Ok(upload) => upload,
            Err(e) => {
                self.notifier.error(e.to_string());
                return Err(e);
            }
        };

        self.analyze(upload).await
    }

    pub async fn download(&self, id: &DocumentId) -> Result<DownloadedFile> {
        let path = download_path(id);
        match self.client.get_bytes(&path).await {
            Ok(response) => {
                let file = DownloadedFile::from_response(id, response);
                tracing::info!(
                    document_id = %id,
                    file_name = %file.file_name,
                    bytes = file.size(),
                    "Downloaded analysis"
                );
                Ok(file)
            }
            Err(e) => {
                let message = e.server_message().unwrap_or(DOWNLOAD_FAILED).to_string();
                self.notifier.error(message);
                Err(e.into())
            }
        }
    }

    /// Absolute URL of the download, for handing to an external viewer
    pub fn download_url(&self, id: &DocumentId) -> Result<Url> {
        Ok(self.client.url_for(&download_path(id))?)
    }
}

fn download_path(id: &DocumentId) -> String {
    format!("/documents/{}/download", id)
}
