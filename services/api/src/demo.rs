use crate::infra::{candidate_from_path, InMemorySessionStore};
use chrono::{Local, NaiveDate};
use clap::Args;
use credit_wizard::config::{AppConfig, IntakeConfig};
use credit_wizard::error::AppError;
use credit_wizard::workflows::intake::{read_manifest, CandidateFile, IntakeError};
use credit_wizard::workflows::report::{ExplanationView, PreviewView, ReportDownload, ScoreView};
use credit_wizard::workflows::scoring::MockCreditScorer;
use credit_wizard::workflows::wizard::{IntakeReceipt, WizardError, WizardService};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct IntakeArgs {
    /// Local files to classify (type is guessed from the extension)
    pub(crate) files: Vec<PathBuf>,
    /// CSV manifest with `name,content_type,size` columns
    #[arg(long)]
    pub(crate) manifest: Option<PathBuf>,
    /// Override the minimum number of bank statements required to submit
    #[arg(long)]
    pub(crate) min_bank_statements: Option<usize>,
    /// Continue through scoring and print the text report when the batch is accepted
    #[arg(long)]
    pub(crate) report: bool,
    /// Date printed on the report (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date printed on the report (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Stop after the preview stage.
    #[arg(long)]
    pub(crate) skip_scoring: bool,
}

type CliService = WizardService<InMemorySessionStore, MockCreditScorer>;

fn build_service(config: IntakeConfig) -> CliService {
    WizardService::new(
        Arc::new(InMemorySessionStore::default()),
        Arc::new(MockCreditScorer),
        config,
    )
}

fn intake_config(override_minimum: Option<usize>) -> Result<IntakeConfig, AppError> {
    match override_minimum {
        Some(minimum) => Ok(IntakeConfig::with_minimum(minimum)?),
        None => Ok(AppConfig::load()?.intake),
    }
}

pub(crate) fn run_intake(args: IntakeArgs) -> Result<(), AppError> {
    let IntakeArgs {
        files,
        manifest,
        min_bank_statements,
        report,
        today,
    } = args;

    let mut batch = Vec::new();
    if let Some(path) = manifest {
        batch.extend(read_manifest(path)?);
    }
    for path in files {
        batch.push(candidate_from_path(&path)?);
    }

    let service = build_service(intake_config(min_bank_statements)?);
    let session = service.open_session();
    let receipt = service.ingest(&session, batch)?;
    render_intake_receipt(&receipt);

    let preview = match service.submit(&session) {
        Ok(preview) => preview,
        Err(WizardError::Intake(err @ IntakeError::InsufficientBankStatements { .. })) => {
            println!("\nSubmission blocked: {err}");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    render_preview(&preview);

    if report {
        service.analyze(&session)?;
        let today = today.unwrap_or_else(|| Local::now().date_naive());
        render_report(&service.report(&session, today)?);
    }

    service.close_session(&session)?;
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        skip_scoring,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("Credit wizard demo");
    let service = build_service(IntakeConfig::default());
    let session = service.open_session();

    println!("\n[1/4] Upload Documents");
    let mut first_drop: Vec<CandidateFile> = (1..=4)
        .map(|month| {
            CandidateFile::new(
                format!("bank_statement_2025_{month:02}.pdf"),
                "application/pdf",
                180_000 + month * 12_500,
            )
        })
        .collect();
    first_drop.push(CandidateFile::new("scan.jpg", "image/jpeg", 2_400_000));
    render_intake_receipt(&service.ingest(&session, first_drop)?);

    match service.submit(&session) {
        Err(WizardError::Intake(err)) => println!("  Submit attempt: {err}"),
        Err(err) => return Err(err.into()),
        Ok(_) => println!("  Submit attempt unexpectedly passed"),
    }

    let second_drop = vec![
        CandidateFile::new("Bank_Statement_2025_05.pdf", "application/pdf", 201_331),
        CandidateFile::new("bank_statement_2025_06.pdf", "application/pdf", 198_004),
        CandidateFile::new("profit_and_loss_2024.pdf", "application/pdf", 3_145_728),
    ];
    render_intake_receipt(&service.ingest(&session, second_drop)?);

    println!("\n[2/4] Preview Data");
    let preview = service.submit(&session)?;
    render_preview(&preview);

    if skip_scoring {
        return Ok(());
    }

    println!("\n[3/4] Credit Score");
    let score = service.analyze(&session)?;
    render_score(&score);

    println!("\n[4/4] Explanation");
    let explanation = service.explanation(&session)?;
    render_explanation(&explanation);

    println!("\nDownloadable report\n");
    render_report(&service.report(&session, today)?);

    service.close_session(&session)?;
    Ok(())
}

fn render_intake_receipt(receipt: &IntakeReceipt) {
    for document in &receipt.accepted {
        println!(
            "  + {} -> {} ({} bytes)",
            document.name,
            document.document_type.label(),
            document.size
        );
    }
    for notice in &receipt.notices {
        println!("  ! {}", notice.message);
    }

    let status = &receipt.status;
    println!(
        "  {} bank statements and {} financial reports (minimum requirement: {} bank statements)",
        status.bank_statement_count, status.financial_report_count, status.minimum_bank_statements
    );
}

fn render_preview(preview: &PreviewView) {
    println!("Bank Statements ({})", preview.bank_statement_count);
    for entry in &preview.bank_statements {
        println!(
            "  - {} | {} | {}",
            entry.name, entry.uploaded_on, entry.size_label
        );
    }

    if !preview.financial_reports.is_empty() {
        println!("Financial Reports ({})", preview.financial_report_count);
        for entry in &preview.financial_reports {
            println!(
                "  - {} | {} | {}",
                entry.name, entry.uploaded_on, entry.size_label
            );
        }
    }
}

fn render_score(score: &ScoreView) {
    println!("  Credit Score: {} ({})", score.score, score.range_label);
    println!("  New debt capacity: {}", score.new_debt_capacity_label);
    for line in &score.highlights {
        println!("  * {line}");
    }
}

fn render_explanation(explanation: &ExplanationView) {
    println!(
        "  Your credit score is {} | {}",
        explanation.score, explanation.range_label
    );
    for item in &explanation.items {
        println!("  {}. {}", item.position, item.text);
    }
    println!("  Recommended actions:");
    for action in &explanation.recommended_actions {
        println!("  - {action}");
    }
}

fn render_report(report: &ReportDownload) {
    println!("{}", report.body);
    println!("  {} ({})", report.notice.message, report.file_name);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_minimum_override_is_rejected() {
        let err = intake_config(Some(0)).expect_err("zero minimum is invalid");
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("WIZARD_MIN_BANK_STATEMENTS"));
    }

    #[test]
    fn positive_minimum_override_wins() {
        let config = intake_config(Some(2)).expect("override accepted");
        assert_eq!(config.minimum_bank_statements, 2);
    }
}
