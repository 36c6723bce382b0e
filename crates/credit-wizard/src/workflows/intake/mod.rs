//! Document intake: MIME filtering, filename classification, and the
//! bank statement submission gate.

mod batch;
mod classifier;
pub mod domain;
pub mod manifest;

pub use batch::{DocumentIntake, IntakeError, IntakeState};
pub use classifier::{classify, is_pdf};
pub use domain::{
    CandidateFile, DocumentId, DocumentType, IntakeOutcome, Notice, NoticeLevel, RejectedFile,
    RejectionReason, UploadedDocument,
};
pub use manifest::{parse_manifest, read_manifest, ManifestError};

pub const DEFAULT_MINIMUM_BANK_STATEMENTS: usize = 6;
