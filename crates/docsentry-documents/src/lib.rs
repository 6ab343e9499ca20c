//! DocSentry Documents
//!
//! The dashboard (document list + status counts), analysis uploads with
//! client-side validation, and authenticated result downloads.

mod document;
mod download;
mod error;
mod service;
mod upload;

pub use document::{Dashboard, Document, DocumentId, DocumentStats, DocumentStatus};
pub use download::DownloadedFile;
pub use error::DocumentError;
pub use service::{DocumentService, DOWNLOAD_FAILED, FETCH_FAILED, UPLOAD_FAILED, UPLOAD_STARTED};
pub use upload::{
    accepted_mime_type, AnalysisType, AnalysisUpload, LlmProvider, ACCEPTED_TYPES,
    MAX_UPLOAD_BYTES,
};

pub type Result<T> = std::result::Result<T, DocumentError>;
