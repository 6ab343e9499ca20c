//! Analysis uploads
//!
//! Files are checked against the accepted types and the size cap before any
//! request is made.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use docsentry_client::FormPart;

use crate::error::DocumentError;
use crate::Result;

/// 10 MiB
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Accepted extensions and the MIME type each is sent with
pub const ACCEPTED_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("txt", "text/plain"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Claude,
    OpenAi,
    Azure,
    Gemini,
}

impl LlmProvider {
    pub const ALL: [LlmProvider; 4] = [
        LlmProvider::Claude,
        LlmProvider::OpenAi,
        LlmProvider::Azure,
        LlmProvider::Gemini,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Claude => "claude",
            LlmProvider::OpenAi => "openai",
            LlmProvider::Azure => "azure",
            LlmProvider::Gemini => "gemini",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LlmProvider::Claude => "Claude (Anthropic) - Best for policy analysis",
            LlmProvider::OpenAi => "OpenAI GPT-4 - Excellent for creative improvements",
            LlmProvider::Azure => "Azure OpenAI - Enterprise-grade processing",
            LlmProvider::Gemini => "Google Gemini - Fast and accurate",
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "claude" => Ok(LlmProvider::Claude),
            "openai" => Ok(LlmProvider::OpenAi),
            "azure" => Ok(LlmProvider::Azure),
            "gemini" => Ok(LlmProvider::Gemini),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisType {
    Compliance,
    GapAnalysis,
    #[default]
    Full,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 3] = [
        AnalysisType::Compliance,
        AnalysisType::GapAnalysis,
        AnalysisType::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Compliance => "compliance",
            AnalysisType::GapAnalysis => "gap-analysis",
            AnalysisType::Full => "full",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnalysisType::Compliance => "Compliance Check - Verify against standards",
            AnalysisType::GapAnalysis => "Gap Analysis - Identify missing controls",
            AnalysisType::Full => "Full Analysis - Comprehensive review",
        }
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compliance" => Ok(AnalysisType::Compliance),
            "gap-analysis" | "gap_analysis" | "gap" => Ok(AnalysisType::GapAnalysis),
            "full" => Ok(AnalysisType::Full),
            _ => Err(format!("Unknown analysis type: {}", s)),
        }
    }
}

/// MIME type for an accepted file name, by extension
pub fn accepted_mime_type(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_lowercase();

    ACCEPTED_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

#[derive(Debug, Clone)]
pub struct AnalysisUpload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
    pub provider: LlmProvider,
    pub analysis_type: AnalysisType,
}

impl AnalysisUpload {
    pub fn new(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        provider: LlmProvider,
        analysis_type: AnalysisType,
    ) -> Result<Self> {
        let file_name = file_name.into();
        let mime_type = check_file(&file_name, bytes.len() as u64)?;

        Ok(Self {
            file_name,
            mime_type,
            bytes,
            provider,
            analysis_type,
        })
    }

    /// Read a file from disk. Size and type are checked before the contents
    /// are loaded.
    pub async fn from_path(
        path: &Path,
        provider: LlmProvider,
        analysis_type: AnalysisType,
    ) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| DocumentError::UnsupportedType(path.display().to_string()))?;

        let metadata = tokio::fs::metadata(path).await?;
        check_file(&file_name, metadata.len())?;

        let bytes = tokio::fs::read(path).await?;
        Self::new(file_name, bytes, provider, analysis_type)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Multipart body: `document`, `llmProvider`, `analysisType`
    pub fn into_parts(self) -> Vec<FormPart> {
        vec![
            FormPart::file("document", self.file_name, self.mime_type, self.bytes),
            FormPart::text("llmProvider", self.provider.as_str()),
            FormPart::text("analysisType", self.analysis_type.as_str()),
        ]
    }
}

fn check_file(file_name: &str, size: u64) -> Result<&'static str> {
    let mime_type = accepted_mime_type(file_name)
        .ok_or_else(|| DocumentError::UnsupportedType(file_name.to_string()))?;

    if size > MAX_UPLOAD_BYTES {
        return Err(DocumentError::TooLarge {
            size,
            max: MAX_UPLOAD_BYTES,
        });
    }

    Ok(mime_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsentry_client::PartValue;

    #[test]
    fn test_accepted_types() {
        assert_eq!(accepted_mime_type("policy.PDF"), Some("application/pdf"));
        assert_eq!(accepted_mime_type("notes.txt"), Some("text/plain"));
        assert!(accepted_mime_type("controls.docx")
            .unwrap()
            .contains("wordprocessingml"));
        assert_eq!(accepted_mime_type("setup.exe"), None);
        assert_eq!(accepted_mime_type("README"), None);
    }

    #[test]
    fn test_size_cap() {
        let at_cap = vec![0u8; MAX_UPLOAD_BYTES as usize];
        assert!(AnalysisUpload::new("a.txt", at_cap, LlmProvider::Claude, AnalysisType::Full).is_ok());

        let over = vec![0u8; MAX_UPLOAD_BYTES as usize + 1];
        let err = AnalysisUpload::new("a.txt", over, LlmProvider::Claude, AnalysisType::Full)
            .unwrap_err();
        assert!(matches!(err, DocumentError::TooLarge { .. }));
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let err = AnalysisUpload::new(
            "image.png",
            vec![1, 2, 3],
            LlmProvider::default(),
            AnalysisType::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedType(_)));
    }

    #[test]
    fn test_parts() {
        let upload = AnalysisUpload::new(
            "policy.pdf",
            b"%PDF".to_vec(),
            LlmProvider::Gemini,
            AnalysisType::GapAnalysis,
        )
        .unwrap();
        let parts = upload.into_parts();

        assert_eq!(parts[0].name, "document");
        match &parts[0].value {
            PartValue::File {
                file_name,
                mime_type,
                bytes,
            } => {
                assert_eq!(file_name, "policy.pdf");
                assert_eq!(mime_type, "application/pdf");
                assert_eq!(bytes, b"%PDF");
            }
            other => panic!("expected file part, got {:?}", other),
        }
        assert_eq!(parts[1], FormPart::text("llmProvider", "gemini"));
        assert_eq!(parts[2], FormPart::text("analysisType", "gap-analysis"));
    }

    #[test]
    fn test_defaults_and_parsing() {
        assert_eq!(LlmProvider::default(), LlmProvider::Claude);
        assert_eq!(AnalysisType::default(), AnalysisType::Full);
        assert_eq!("OpenAI".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
        assert_eq!(
            "gap-analysis".parse::<AnalysisType>().unwrap(),
            AnalysisType::GapAnalysis
        );
        assert!("gpt".parse::<LlmProvider>().is_err());

        for provider in LlmProvider::ALL {
            assert_eq!(provider.as_str().parse::<LlmProvider>().unwrap(), provider);
        }
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.txt");
        tokio::fs::write(&path, b"Access control policy").await.unwrap();

        let upload = AnalysisUpload::from_path(&path, LlmProvider::Azure, AnalysisType::Compliance)
            .await
            .unwrap();
        assert_eq!(upload.file_name, "policy.txt");
        assert_eq!(upload.mime_type, "text/plain");
        assert_eq!(upload.size(), 21);
    }

    #[tokio::test]
    async fn test_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = AnalysisUpload::from_path(
            &dir.path().join("missing.pdf"),
            LlmProvider::Claude,
            AnalysisType::Full,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DocumentError::Io(_)));
    }
}
