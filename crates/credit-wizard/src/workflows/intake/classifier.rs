use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use mime::Mime;

use super::domain::{
    CandidateFile, DocumentId, DocumentType, RejectedFile, RejectionReason, UploadedDocument,
};

const BANK_MARKER: &str = "bank";

static DOCUMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_document_id(now: DateTime<Utc>) -> DocumentId {
    let sequence = DOCUMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DocumentId(format!("doc-{}-{sequence:06}", now.timestamp_millis()))
}

/// Parameters and letter case are ignored; anything unparsable is not a PDF.
pub fn is_pdf(content_type: &str) -> bool {
    content_type
        .trim()
        .parse::<Mime>()
        .map(|declared| declared.essence_str() == mime::APPLICATION_PDF.essence_str())
        .unwrap_or(false)
}

/// Filename heuristic only: the document body is never inspected.
pub fn classify(name: &str) -> DocumentType {
    if name.to_lowercase().contains(BANK_MARKER) {
        DocumentType::BankStatement
    } else {
        DocumentType::FinancialReport
    }
}

pub(crate) fn admit(
    candidate: CandidateFile,
    now: DateTime<Utc>,
) -> Result<UploadedDocument, RejectedFile> {
    if !is_pdf(&candidate.content_type) {
        return Err(RejectedFile {
            name: candidate.name,
            content_type: candidate.content_type,
            reason: RejectionReason::NotPdf,
        });
    }

    let document_type = classify(&candidate.name);
    Ok(UploadedDocument {
        id: next_document_id(now),
        name: candidate.name,
        document_type,
        size: candidate.size,
        upload_date: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_detection_ignores_case_and_parameters() {
        assert!(is_pdf("application/pdf"));
        assert!(is_pdf("Application/PDF"));
        assert!(is_pdf(" application/pdf; name=statement.pdf "));
        assert!(!is_pdf("image/jpeg"));
        assert!(!is_pdf("application/x-pdf"));
        assert!(!is_pdf(""));
        assert!(!is_pdf("pdf"));
    }

    #[test]
    fn classification_matches_bank_anywhere_in_name() {
        assert_eq!(classify("bankstmt1.pdf"), DocumentType::BankStatement);
        assert_eq!(classify("March_BANK_Export.pdf"), DocumentType::BankStatement);
        assert_eq!(classify("Databank summary.pdf"), DocumentType::BankStatement);
        assert_eq!(classify("report.pdf"), DocumentType::FinancialReport);
        assert_eq!(classify("statement_march.pdf"), DocumentType::FinancialReport);
    }

    #[test]
    fn admitted_documents_receive_distinct_ids() {
        let now = Utc::now();
        let first = admit(CandidateFile::new("bank1.pdf", "application/pdf", 10), now)
            .expect("pdf admitted");
        let second = admit(CandidateFile::new("bank1.pdf", "application/pdf", 10), now)
            .expect("pdf admitted");

        assert_ne!(first.id, second.id);
        assert!(first.id.0.starts_with("doc-"));
        assert_eq!(first.upload_date, now);
    }

    #[test]
    fn non_pdf_candidates_are_rejected_with_their_name() {
        let rejected = admit(CandidateFile::new("photo.jpg", "image/jpeg", 10), Utc::now())
            .expect_err("jpeg rejected");

        assert_eq!(rejected.reason, RejectionReason::NotPdf);
        assert_eq!(rejected.message(), "photo.jpg is not a PDF file");
    }
}
