use chrono::NaiveDate;
use serde::Serialize;

use super::format::format_currency;
use crate::workflows::intake::Notice;
use crate::workflows::scoring::CreditScoreResult;

pub const REPORT_FILE_NAME: &str = "credit_score_report.txt";
pub const REPORT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const REPORT_DOWNLOADED_NOTICE: &str = "Report downloaded successfully";

/// The rendered report plus the confirmation shown once it is handed over.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDownload {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub body: String,
    pub notice: Notice,
}

impl ReportDownload {
    pub fn render(result: &CreditScoreResult, generated_on: NaiveDate) -> Self {
        Self {
            file_name: REPORT_FILE_NAME,
            content_type: REPORT_CONTENT_TYPE,
            body: render_text_report(result, generated_on),
            notice: Notice::success(REPORT_DOWNLOADED_NOTICE),
        }
    }
}

pub fn render_text_report(result: &CreditScoreResult, generated_on: NaiveDate) -> String {
    let mut lines = vec![
        "CREDIT SCORE REPORT".to_string(),
        format!("Generated on: {generated_on}"),
        String::new(),
        format!("CREDIT SCORE: {}", result.score),
        format!(
            "NEW DEBT CAPACITY: {}",
            format_currency(result.new_debt_capacity)
        ),
        String::new(),
        "DETAILED EXPLANATION:".to_string(),
    ];
    lines.extend(result.explanation.iter().cloned());
    lines.push(String::new());
    lines.push("ADDITIONAL INFORMATION:".to_string());
    lines.push(format!(
        "- Your credit score is in the {} range.",
        result.range().label()
    ));
    lines.push("- This analysis is based on the documents you provided.".to_string());
    lines.push(
        "- For more detailed financial advice, please consult with a financial advisor."
            .to_string(),
    );

    let mut report = lines.join("\n");
    report.push('\n');
    report
}
