mod range;

pub use range::ScoreRange;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::intake::UploadedDocument;

/// Output of the analysis stage, shared by the score and explanation views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditScoreResult {
    pub score: u16,
    pub new_debt_capacity: u32,
    pub explanation: Vec<String>,
    pub report_date: DateTime<Utc>,
}

impl CreditScoreResult {
    pub fn range(&self) -> ScoreRange {
        ScoreRange::from_score(self.score)
    }
}

/// Seam for the analysis stage so a real model can replace the mock.
pub trait CreditScorer: Send + Sync {
    fn score(&self, documents: &[UploadedDocument], now: DateTime<Utc>) -> CreditScoreResult;
}

pub const MOCK_SCORE: u16 = 720;
pub const MOCK_NEW_DEBT_CAPACITY: u32 = 40_000;
pub const MOCK_EXPLANATION: [&str; 4] = [
    "Your payment history shows consistent on-time payments.",
    "Your credit utilization ratio is below 30%.",
    "You have a good mix of credit types.",
    "Your average account age is over 5 years.",
];

/// Placeholder analysis: the documents are never read.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockCreditScorer;

impl CreditScorer for MockCreditScorer {
    fn score(&self, _documents: &[UploadedDocument], now: DateTime<Utc>) -> CreditScoreResult {
        CreditScoreResult {
            score: MOCK_SCORE,
            new_debt_capacity: MOCK_NEW_DEBT_CAPACITY,
            explanation: MOCK_EXPLANATION.iter().map(|line| line.to_string()).collect(),
            report_date: now,
        }
    }
}
