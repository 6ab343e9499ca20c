//! Document records and dashboard stats

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Number(n) => write!(f, "{}", n),
            DocumentId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for DocumentId {
    fn from(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) => DocumentId::Number(n),
            Err(_) => DocumentId::Text(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processing,
    Completed,
    Failed,
    /// Anything the server reports that this client does not know yet
    #[serde(other)]
    Unknown,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Processing => "processing",
            DocumentStatus::Completed => "completed",
            DocumentStatus::Failed => "failed",
            DocumentStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub original_name: String,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Results can be viewed and downloaded only once analysis finished
    pub fn is_downloadable(&self) -> bool {
        self.status == DocumentStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub total: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

impl DocumentStats {
    pub fn from_documents(documents: &[Document]) -> Self {
        documents.iter().fold(Self::default(), |mut acc, doc| {
            acc.total += 1;
            match doc.status {
                DocumentStatus::Processing => acc.processing += 1,
                DocumentStatus::Completed => acc.completed += 1,
                DocumentStatus::Failed => acc.failed += 1,
                DocumentStatus::Unknown => {}
            }
            acc
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub documents: Vec<Document>,
    pub stats: DocumentStats,
}

impl Dashboard {
    pub fn new(documents: Vec<Document>) -> Self {
        let stats = DocumentStats::from_documents(&documents);
        Self { documents, stats }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentList {
    #[serde(default)]
    pub documents: Vec<Document>,
}
