//! Read-only views over a submitted batch and its score, plus the
//! downloadable text report.

mod format;
mod text;
pub mod views;

pub use format::{format_currency, format_megabytes, format_thousands};
pub use text::{
    render_text_report, ReportDownload, REPORT_CONTENT_TYPE, REPORT_DOWNLOADED_NOTICE,
    REPORT_FILE_NAME,
};
pub use views::{
    DocumentEntryView, ExplanationItem, ExplanationView, PreviewView, ScoreView,
    RECOMMENDED_ACTIONS,
};
