use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use credit_wizard::config::IntakeConfig;
use credit_wizard::error::AppError;
use credit_wizard::workflows::intake::{
    CandidateFile, DocumentIntake, IntakeError, Notice, RejectedFile, UploadedDocument,
};
use credit_wizard::workflows::scoring::CreditScorer;
use credit_wizard::workflows::wizard::{wizard_router, SessionStore, WizardError, WizardService};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyRequest {
    pub(crate) files: Vec<CandidateFile>,
    #[serde(default)]
    pub(crate) minimum_bank_statements: Option<usize>,
}

/// Stateless intake dry run: classification plus the submission gate verdict.
#[derive(Debug, Serialize)]
pub(crate) struct ClassifyResponse {
    pub(crate) accepted: Vec<UploadedDocument>,
    pub(crate) rejected: Vec<RejectedFile>,
    pub(crate) notices: Vec<Notice>,
    pub(crate) bank_statement_count: usize,
    pub(crate) financial_report_count: usize,
    pub(crate) submittable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) blocked_reason: Option<String>,
}

pub(crate) fn with_wizard_routes<S, C>(service: Arc<WizardService<S, C>>) -> axum::Router
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    wizard_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/intake/classify",
            axum::routing::post(classify_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn classify_endpoint(
    Json(payload): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, Response> {
    let ClassifyRequest {
        files,
        minimum_bank_statements,
    } = payload;

    let config = match minimum_bank_statements {
        Some(minimum) => IntakeConfig::with_minimum(minimum).map_err(|err| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        })?,
        None => IntakeConfig::default(),
    };

    let mut intake = DocumentIntake::new(config);
    let outcome = intake.ingest(files).map_err(intake_failure)?;
    let notices = outcome.notices();
    let blocked_reason = match intake.submit() {
        Ok(_) => None,
        Err(err @ IntakeError::InsufficientBankStatements { .. }) => Some(err.to_string()),
        Err(err) => return Err(intake_failure(err)),
    };

    Ok(Json(ClassifyResponse {
        bank_statement_count: intake.bank_statement_count(),
        financial_report_count: intake.financial_report_count(),
        submittable: blocked_reason.is_none(),
        accepted: outcome.accepted,
        rejected: outcome.rejected,
        notices,
        blocked_reason,
    }))
}

fn intake_failure(err: IntakeError) -> Response {
    AppError::from(WizardError::from(err)).into_response()
}
