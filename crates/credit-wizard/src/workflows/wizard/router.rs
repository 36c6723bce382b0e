use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::service::{WizardError, WizardService};
use super::stage::{StepView, WizardStage};
use super::store::{SessionId, SessionStore};
use crate::workflows::intake::{CandidateFile, DocumentId, IntakeError};

/// Response header carrying the confirmation notice for a report download.
pub const NOTICE_HEADER: &str = "x-wizard-notice";
use crate::workflows::scoring::CreditScorer;

type SharedService<S, C> = Arc<WizardService<S, C>>;

/// Body of a picker or drag-and-drop upload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadBatchRequest {
    pub files: Vec<CandidateFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionOpenedView {
    pub session_id: SessionId,
    pub stage: WizardStage,
    pub progress: Vec<StepView>,
}

/// Router builder exposing the wizard stages over HTTP.
pub fn wizard_router<S, C>(service: SharedService<S, C>) -> Router
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    Router::new()
        .route("/api/v1/wizard/sessions", post(open_handler::<S, C>))
        .route(
            "/api/v1/wizard/sessions/:session_id",
            delete(close_handler::<S, C>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/documents",
            get(intake_status_handler::<S, C>).post(upload_handler::<S, C>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/documents/:document_id",
            delete(remove_handler::<S, C>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/intake",
            post(restart_handler::<S, C>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/submit",
            post(submit_handler::<S, C>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/preview",
            get(preview_handler::<S, C>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/analysis",
            post(analyze_handler::<S, C>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/score",
            get(score_handler::<S, C>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/explanation",
            get(explanation_handler::<S, C>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/report",
            get(report_handler::<S, C>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/progress",
            get(progress_handler::<S, C>),
        )
        .with_state(service)
}

pub(crate) async fn open_handler<S, C>(State(service): State<SharedService<S, C>>) -> Response
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    let session_id = service.open_session();
    let view = SessionOpenedView {
        session_id,
        stage: WizardStage::Upload,
        progress: WizardStage::Upload.progress(),
    };
    (StatusCode::CREATED, axum::Json(view)).into_response()
}

pub(crate) async fn close_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    match service.close_session(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn intake_status_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    respond(service.intake_status(&SessionId(session_id)))
}

pub(crate) async fn upload_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<UploadBatchRequest>,
) -> Response
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    respond(service.ingest(&SessionId(session_id), request.files))
}

pub(crate) async fn remove_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Path((session_id, document_id)): Path<(String, String)>,
) -> Response
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    respond(service.remove_document(&SessionId(session_id), &DocumentId(document_id)))
}

pub(crate) async fn restart_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    respond(service.begin_intake(&SessionId(session_id)))
}

pub(crate) async fn submit_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    respond(service.submit(&SessionId(session_id)))
}

pub(crate) async fn preview_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    respond(service.preview(&SessionId(session_id)))
}

pub(crate) async fn analyze_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    respond(service.analyze(&SessionId(session_id)))
}

pub(crate) async fn score_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    respond(service.score(&SessionId(session_id)))
}

pub(crate) async fn explanation_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    respond(service.explanation(&SessionId(session_id)))
}

pub(crate) async fn report_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    let today = Local::now().date_naive();
    match service.report(&SessionId(session_id), today) {
        Ok(report) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, report.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", report.file_name),
                ),
                (
                    header::HeaderName::from_static(NOTICE_HEADER),
                    report.notice.message,
                ),
            ],
            report.body,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn progress_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    respond(service.progress(&SessionId(session_id)))
}

fn respond<T: Serialize>(result: Result<T, WizardError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: WizardError) -> Response {
    let notice = error.notice();
    match error {
        WizardError::Intake(IntakeError::InsufficientBankStatements { required, found }) => {
            let payload = json!({
                "error": notice.message,
                "notice": notice,
                "required": required,
                "found": found,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        WizardError::Intake(IntakeError::AlreadySubmitted) => {
            let payload = json!({
                "error": notice.message,
                "notice": notice,
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        WizardError::MissingState { redirect_to, .. } => {
            let payload = json!({
                "error": notice.message,
                "notice": notice,
                "redirect_to": redirect_to,
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        WizardError::UnknownSession(session_id) => {
            let payload = json!({
                "error": notice.message,
                "session_id": session_id,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        WizardError::Context(_) => {
            let payload = json!({
                "error": notice.message,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
