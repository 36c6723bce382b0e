use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for classified documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two document categories recognized during intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    BankStatement,
    FinancialReport,
}

impl DocumentType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BankStatement => "Bank Statement",
            Self::FinancialReport => "Financial Report",
        }
    }
}

/// File metadata as supplied by a picker, a drop event, or a manifest row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFile {
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size,
        }
    }
}

/// A candidate that passed the MIME check and received a category.
///
/// Serialised in the `uploadedDocuments` record layout (`type`, `uploadDate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    pub id: DocumentId,
    pub name: String,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub size: u64,
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    NotPdf,
}

/// A candidate filtered out before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedFile {
    pub name: String,
    pub content_type: String,
    pub reason: RejectionReason,
}

impl RejectedFile {
    pub fn message(&self) -> String {
        match self.reason {
            RejectionReason::NotPdf => format!("{} is not a PDF file", self.name),
        }
    }

    pub fn notice(&self) -> Notice {
        Notice::error(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient, dismissible notification surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }
}

/// Result of feeding one batch of candidates through intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeOutcome {
    pub accepted: Vec<UploadedDocument>,
    pub rejected: Vec<RejectedFile>,
}

impl IntakeOutcome {
    pub fn notices(&self) -> Vec<Notice> {
        self.rejected.iter().map(RejectedFile::notice).collect()
    }
}
