//! Knowledge system type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback source label for passages without a usable location.
pub const DEFAULT_SOURCE_LABEL: &str = "Policy Document";

/// A passage returned by the knowledge base for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Passage text
    pub text: String,

    /// Human-readable source label (document file name)
    pub source: String,

    /// Relevance score reported by the service, 0 when absent
    #[serde(default)]
    pub score: f64,

    /// Location of the source document, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl RetrievedPassage {
    pub fn new(text: impl Into<String>, source: impl Into<String>, score: f64) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            score,
            uri: None,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }
}

/// Status of a remote ingestion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestionStatus {
    Pending,
    Running,
    Complete,
    Failed,
}

impl IngestionStatus {
    /// Map a remote status string to a status.
    ///
    /// Unknown values are treated as still running so that polling continues.
    pub fn from_remote(status: &str) -> Self {
        match status.to_ascii_uppercase().as_str() {
            "STARTING" => Self::Pending,
            "IN_PROGRESS" | "STOPPING" => Self::Running,
            "COMPLETE" => Self::Complete,
            "FAILED" | "STOPPED" => Self::Failed,
            other => {
                tracing::debug!("Unknown ingestion status '{}', treating as running", other);
                Self::Running
            }
        }
    }

    /// Whether polling should stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for IngestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document counts reported for an ingestion job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionStatistics {
    pub documents_scanned: u64,
    pub documents_indexed: u64,
    pub documents_failed: u64,
}

/// Snapshot of a remote ingestion job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionJob {
    /// Opaque job identifier
    pub job_id: String,

    pub status: IngestionStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<IngestionStatistics>,

    /// Reasons reported for a failed job
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failure_reasons: Vec<String>,
}

impl IngestionJob {
    pub fn new(job_id: impl Into<String>, status: IngestionStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
            statistics: None,
            failure_reasons: Vec::new(),
        }
    }
}

/// Result of storing one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub bucket: String,
    pub key: String,
    pub original_filename: String,
    pub category: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Summary of a policy document batch upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadStats {
    /// Receipts for the documents that were stored
    pub uploaded: Vec<UploadReceipt>,

    /// File names that could not be stored
    pub failed: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_status_mapping() {
        assert_eq!(IngestionStatus::from_remote("STARTING"), IngestionStatus::Pending);
        assert_eq!(IngestionStatus::from_remote("IN_PROGRESS"), IngestionStatus::Running);
        assert_eq!(IngestionStatus::from_remote("STOPPING"), IngestionStatus::Running);
        assert_eq!(IngestionStatus::from_remote("COMPLETE"), IngestionStatus::Complete);
        assert_eq!(IngestionStatus::from_remote("FAILED"), IngestionStatus::Failed);
        assert_eq!(IngestionStatus::from_remote("STOPPED"), IngestionStatus::Failed);
        assert_eq!(IngestionStatus::from_remote("SOMETHING_NEW"), IngestionStatus::Running);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(IngestionStatus::Complete.is_terminal());
        assert!(IngestionStatus::Failed.is_terminal());
        assert!(!IngestionStatus::Pending.is_terminal());
        assert!(!IngestionStatus::Running.is_terminal());
    }

    #[test]
    fn test_passage_serialization_omits_missing_uri() {
        let passage = RetrievedPassage::new("Collision covers accidents.", "auto.pdf", 0.8);
        let json = serde_json::to_value(&passage).unwrap();
        assert!(json.get("uri").is_none());
        assert_eq!(json["source"], "auto.pdf");
    }
}
