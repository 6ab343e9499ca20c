//! Downloaded analysis results

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use docsentry_client::ApiResponse;

use crate::document::DocumentId;
use crate::Result;

#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DownloadedFile {
    pub(crate) fn from_response(id: &DocumentId, response: ApiResponse) -> Self {
        let file_name = response
            .headers
            .get("content-disposition")
            .and_then(|value| value.to_str().ok())
            .and_then(disposition_file_name)
            .map(|name| sanitize_file_name(&name))
            .unwrap_or_else(|| format!("document-{}", id));

        Self {
            file_name,
            content_type: response.content_type().map(str::to_string),
            bytes: response.body,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn sha256_hex(&self) -> String {
        format!("{:x}", Sha256::digest(&self.bytes))
    }

    /// Write the file. A directory target receives the server's file name.
    pub async fn save_to(&self, target: &Path) -> Result<PathBuf> {
        let path = if tokio::fs::metadata(target)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            target.join(&self.file_name)
        } else {
            target.to_path_buf()
        };

        tokio::fs::write(&path, &self.bytes).await?;

        tracing::info!(
            path = %path.display(),
            bytes = self.bytes.len(),
            "Saved download"
        );

        Ok(path)
    }
}

/// `attachment; filename="report.pdf"` -> `report.pdf`
fn disposition_file_name(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|param| {
            let (key, value) = param.split_once('=')?;
            if key.trim().eq_ignore_ascii_case("filename") {
                Some(value.trim().trim_matches('"').to_string())
            } else {
                None
            }
        })
        .filter(|name| !name.is_empty())
}

fn sanitize_file_name(file_name: &str) -> String {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("download")
        .trim();

    if name.is_empty() {
        "download".to_string()
    } else {
        name.to_string()
    }
}
