//! Document classification and text decoding for uploads.

use policyguide_core::{AppError, AppResult};
use std::path::Path;

/// Content type for presigned uploads, whose body is not known in advance.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Document kind classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
    Markdown,
    Docx,
    Unknown,
}

impl DocumentKind {
    /// Detect document kind from file extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("txt") => Self::PlainText,
            Some("md") | Some("markdown") => Self::Markdown,
            Some("docx") => Self::Docx,
            _ => Self::Unknown,
        }
    }

    /// Detect document kind from a bare file name.
    pub fn from_name(file_name: &str) -> Self {
        Self::from_path(Path::new(file_name))
    }

    /// MIME type sent with the object.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::PlainText => "text/plain",
            Self::Markdown => "text/markdown",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Unknown => OCTET_STREAM,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::PlainText => "text",
            Self::Markdown => "markdown",
            Self::Docx => "docx",
            Self::Unknown => "unknown",
        }
    }
}

/// Decode an uploaded policy file as text.
///
/// `.txt` files must be valid UTF-8. Other formats are decoded lossily with
/// invalid sequences dropped; no format-specific extraction is attempted.
pub fn decode_policy_text(file_name: &str, bytes: &[u8]) -> AppResult<String> {
    if DocumentKind::from_name(file_name) == DocumentKind::PlainText {
        return String::from_utf8(bytes.to_vec()).map_err(|e| {
            AppError::Validation(format!("{} is not valid UTF-8 text: {}", file_name, e))
        });
    }

    let text = String::from_utf8_lossy(bytes).replace('\u{FFFD}', "");
    tracing::debug!(
        "Decoded {} lossily ({} bytes -> {} chars)",
        file_name,
        bytes.len(),
        text.chars().count()
    );
    Ok(text)
}

/// File name component of a path, for object keys.
pub fn file_name_of(path: &Path) -> AppResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::Validation(format!("Path has no UTF-8 file name: {:?}", path))
        })
}
