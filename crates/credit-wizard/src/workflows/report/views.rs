use chrono::NaiveDate;
use serde::Serialize;

use super::format::{format_currency, format_megabytes};
use crate::workflows::intake::{DocumentId, DocumentType, UploadedDocument};
use crate::workflows::scoring::{CreditScoreResult, ScoreRange};

pub const RECOMMENDED_ACTIONS: [&str; 3] = [
    "Continue to make payments on time to maintain your score",
    "Keep credit utilization below 30% of total available credit",
    "Regularly check your credit report for errors",
];

const SCORE_HIGHLIGHTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentEntryView {
    pub id: DocumentId,
    pub name: String,
    pub document_type: DocumentType,
    pub type_label: &'static str,
    pub uploaded_on: NaiveDate,
    pub size_label: String,
}

impl DocumentEntryView {
    pub fn from_document(document: &UploadedDocument) -> Self {
        Self {
            id: document.id.clone(),
            name: document.name.clone(),
            document_type: document.document_type,
            type_label: document.document_type.label(),
            uploaded_on: document.upload_date.date_naive(),
            size_label: format_megabytes(document.size),
        }
    }
}

/// Submitted batch partitioned by category, order preserved within each group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewView {
    pub bank_statements: Vec<DocumentEntryView>,
    pub financial_reports: Vec<DocumentEntryView>,
    pub bank_statement_count: usize,
    pub financial_report_count: usize,
}

impl PreviewView {
    pub fn from_documents(documents: &[UploadedDocument]) -> Self {
        let entries_of = |document_type: DocumentType| -> Vec<DocumentEntryView> {
            documents
                .iter()
                .filter(|document| document.document_type == document_type)
                .map(DocumentEntryView::from_document)
                .collect()
        };

        let bank_statements = entries_of(DocumentType::BankStatement);
        let financial_reports = entries_of(DocumentType::FinancialReport);

        Self {
            bank_statement_count: bank_statements.len(),
            financial_report_count: financial_reports.len(),
            bank_statements,
            financial_reports,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreView {
    pub score: u16,
    pub range: ScoreRange,
    pub range_label: &'static str,
    pub new_debt_capacity: u32,
    pub new_debt_capacity_label: String,
    pub highlights: Vec<String>,
}

impl ScoreView {
    pub fn from_result(result: &CreditScoreResult) -> Self {
        let range = result.range();
        Self {
            score: result.score,
            range,
            range_label: range.label(),
            new_debt_capacity: result.new_debt_capacity,
            new_debt_capacity_label: format_currency(result.new_debt_capacity),
            highlights: result
                .explanation
                .iter()
                .take(SCORE_HIGHLIGHTS)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplanationItem {
    pub position: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplanationView {
    pub score: u16,
    pub range_label: &'static str,
    pub items: Vec<ExplanationItem>,
    pub recommended_actions: Vec<&'static str>,
    pub report_date: NaiveDate,
}

impl ExplanationView {
    pub fn from_result(result: &CreditScoreResult) -> Self {
        Self {
            score: result.score,
            range_label: result.range().label(),
            items: result
                .explanation
                .iter()
                .enumerate()
                .map(|(index, text)| ExplanationItem {
                    position: index + 1,
                    text: text.clone(),
                })
                .collect(),
            recommended_actions: RECOMMENDED_ACTIONS.to_vec(),
            report_date: result.report_date.date_naive(),
        }
    }
}
