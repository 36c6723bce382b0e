use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::classifier::admit;
use super::domain::{CandidateFile, DocumentId, DocumentType, IntakeOutcome, UploadedDocument};
use crate::config::IntakeConfig;

/// Lifecycle of a single intake session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeState {
    Idle,
    Accumulating,
    Submitted,
}

impl IntakeState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Accumulating => "accumulating",
            Self::Submitted => "submitted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("You need to upload at least {required} bank statements")]
    InsufficientBankStatements { required: usize, found: usize },
    #[error("documents were already submitted; start a new intake to upload more")]
    AlreadySubmitted,
}

/// Ordered, in-memory document list with the submission gate.
#[derive(Debug, Clone)]
pub struct DocumentIntake {
    config: IntakeConfig,
    documents: Vec<UploadedDocument>,
    state: IntakeState,
}

impl Default for DocumentIntake {
    fn default() -> Self {
        Self::new(IntakeConfig::default())
    }
}

impl DocumentIntake {
    pub fn new(config: IntakeConfig) -> Self {
        Self {
            config,
            documents: Vec::new(),
            state: IntakeState::Idle,
        }
    }

    pub fn state(&self) -> IntakeState {
        self.state
    }

    pub fn documents(&self) -> &[UploadedDocument] {
        &self.documents
    }

    pub fn minimum_bank_statements(&self) -> usize {
        self.config.minimum_bank_statements
    }

    pub fn count_of(&self, document_type: DocumentType) -> usize {
        self.documents
            .iter()
            .filter(|document| document.document_type == document_type)
            .count()
    }

    pub fn bank_statement_count(&self) -> usize {
        self.count_of(DocumentType::BankStatement)
    }

    pub fn financial_report_count(&self) -> usize {
        self.count_of(DocumentType::FinancialReport)
    }

    /// Bank statements still missing before the batch can be submitted.
    pub fn remaining(&self) -> usize {
        self.config
            .minimum_bank_statements
            .saturating_sub(self.bank_statement_count())
    }

    pub fn is_submittable(&self) -> bool {
        self.state != IntakeState::Submitted && self.remaining() == 0
    }

    /// Filter, classify, and append a batch in the order it was supplied.
    pub fn ingest<I>(&mut self, batch: I) -> Result<IntakeOutcome, IntakeError>
    where
        I: IntoIterator<Item = CandidateFile>,
    {
        self.ingest_at(batch, Utc::now())
    }

    pub fn ingest_at<I>(&mut self, batch: I, now: DateTime<Utc>) -> Result<IntakeOutcome, IntakeError>
    where
        I: IntoIterator<Item = CandidateFile>,
    {
        self.ensure_open()?;

        let mut outcome = IntakeOutcome::default();
        for candidate in batch {
            match admit(candidate, now) {
                Ok(document) => {
                    debug!(
                        document_id = %document.id,
                        name = %document.name,
                        document_type = document.document_type.label(),
                        "document classified"
                    );
                    self.documents.push(document.clone());
                    outcome.accepted.push(document);
                }
                Err(rejected) => {
                    warn!(
                        name = %rejected.name,
                        content_type = %rejected.content_type,
                        "rejected non-PDF upload"
                    );
                    outcome.rejected.push(rejected);
                }
            }
        }

        if self.state == IntakeState::Idle {
            self.state = IntakeState::Accumulating;
        }

        Ok(outcome)
    }

    /// Returns whether a document was removed; unknown ids are a no-op.
    pub fn remove(&mut self, id: &DocumentId) -> Result<bool, IntakeError> {
        self.ensure_open()?;

        let before = self.documents.len();
        self.documents.retain(|document| &document.id != id);
        Ok(self.documents.len() != before)
    }

    /// Apply the submission gate and hand back the full list exactly once.
    pub fn submit(&mut self) -> Result<Vec<UploadedDocument>, IntakeError> {
        self.ensure_open()?;

        let found = self.bank_statement_count();
        let required = self.config.minimum_bank_statements;
        if found < required {
            info!(found, required, "submission blocked by bank statement minimum");
            return Err(IntakeError::InsufficientBankStatements { required, found });
        }

        self.state = IntakeState::Submitted;
        info!(
            documents = self.documents.len(),
            bank_statements = found,
            "document batch submitted"
        );
        Ok(self.documents.clone())
    }

    fn ensure_open(&self) -> Result<(), IntakeError> {
        if self.state == IntakeState::Submitted {
            return Err(IntakeError::AlreadySubmitted);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str, size: u64) -> CandidateFile {
        CandidateFile::new(name, "application/pdf", size)
    }

    fn bank_batch(count: usize) -> Vec<CandidateFile> {
        (1..=count)
            .map(|index| pdf(&format!("bank_statement_{index:02}.pdf"), 1024))
            .collect()
    }

    #[test]
    fn mixed_batch_keeps_pdfs_in_order_and_warns_for_the_rest() {
        let mut intake = DocumentIntake::default();
        let outcome = intake
            .ingest(vec![
                pdf("bankstmt1.pdf", 1_048_576),
                pdf("report.pdf", 2_097_152),
                CandidateFile::new("photo.jpg", "image/jpeg", 4096),
            ])
            .expect("intake open");

        let names: Vec<&str> = intake.documents().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["bankstmt1.pdf", "report.pdf"]);
        assert_eq!(
            intake.documents()[0].document_type,
            DocumentType::BankStatement
        );
        assert_eq!(
            intake.documents()[1].document_type,
            DocumentType::FinancialReport
        );
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.notices()[0].message, "photo.jpg is not a PDF file");

        let err = intake.submit().expect_err("one bank statement is not enough");
        assert_eq!(
            err,
            IntakeError::InsufficientBankStatements {
                required: 6,
                found: 1
            }
        );
        assert_eq!(
            err.to_string(),
            "You need to upload at least 6 bank statements"
        );
        assert_eq!(intake.state(), IntakeState::Accumulating);
    }

    #[test]
    fn non_pdf_batch_leaves_list_unchanged() {
        let mut intake = DocumentIntake::default();
        intake.ingest(bank_batch(2)).expect("intake open");

        let outcome = intake
            .ingest(vec![
                CandidateFile::new("bank.png", "image/png", 1),
                CandidateFile::new("bank.docx", "application/msword", 1),
            ])
            .expect("intake open");

        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.notices().len(), 2);
        assert_eq!(intake.documents().len(), 2);
        assert_eq!(intake.bank_statement_count(), 2);
    }

    #[test]
    fn first_batch_moves_idle_to_accumulating() {
        let mut intake = DocumentIntake::default();
        assert_eq!(intake.state(), IntakeState::Idle);
        intake.ingest(Vec::new()).expect("intake open");
        assert_eq!(intake.state(), IntakeState::Accumulating);
    }

    #[test]
    fn removing_twice_is_a_no_op() {
        let mut intake = DocumentIntake::default();
        let outcome = intake.ingest(bank_batch(3)).expect("intake open");
        let id = outcome.accepted[1].id.clone();

        assert!(intake.remove(&id).expect("intake open"));
        let after_first: Vec<UploadedDocument> = intake.documents().to_vec();
        assert!(!intake.remove(&id).expect("intake open"));
        assert_eq!(intake.documents(), after_first.as_slice());
        assert_eq!(intake.documents().len(), 2);
    }

    #[test]
    fn submission_forwards_every_document_once() {
        let mut intake = DocumentIntake::default();
        let mut batch = bank_batch(6);
        batch.push(pdf("annual_report.pdf", 512));
        intake.ingest(batch).expect("intake open");

        assert!(intake.is_submittable());
        let forwarded = intake.submit().expect("six bank statements pass");
        assert_eq!(forwarded.len(), 7);
        assert_eq!(forwarded.last().map(|d| d.name.as_str()), Some("annual_report.pdf"));
        assert_eq!(intake.state(), IntakeState::Submitted);

        assert_eq!(intake.submit(), Err(IntakeError::AlreadySubmitted));
        assert_eq!(
            intake.ingest(bank_batch(1)).map(|_| ()),
            Err(IntakeError::AlreadySubmitted)
        );
        assert!(!intake.is_submittable());
    }

    #[test]
    fn financial_reports_do_not_count_towards_minimum() {
        let mut intake = DocumentIntake::default();
        let reports: Vec<CandidateFile> = (0..10)
            .map(|index| pdf(&format!("report_{index}.pdf"), 1))
            .collect();
        intake.ingest(reports).expect("intake open");
        intake.ingest(bank_batch(5)).expect("intake open");

        assert_eq!(intake.remaining(), 1);
        assert!(intake.submit().is_err());

        intake.ingest(vec![pdf("Bank-June.pdf", 1)]).expect("intake open");
        assert_eq!(intake.remaining(), 0);
        assert!(intake.submit().is_ok());
    }

    #[test]
    fn configured_minimum_drives_message() {
        let mut intake = DocumentIntake::new(IntakeConfig {
            minimum_bank_statements: 2,
        });
        intake.ingest(bank_batch(1)).expect("intake open");

        let err = intake.submit().expect_err("below minimum");
        assert_eq!(err.to_string(), "You need to upload at least 2 bank statements");
    }
}
