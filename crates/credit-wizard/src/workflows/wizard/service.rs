use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::context::{ContextError, WizardContext};
use super::stage::{StepView, WizardStage};
use super::store::{SessionId, SessionStore};
use crate::config::IntakeConfig;
use crate::workflows::intake::{
    CandidateFile, DocumentId, DocumentIntake, IntakeError, IntakeState, Notice, RejectedFile,
    UploadedDocument,
};
use crate::workflows::report::{ExplanationView, PreviewView, ReportDownload, ScoreView};
use crate::workflows::scoring::{CreditScoreResult, CreditScorer};

pub const MISSING_DOCUMENTS_NOTICE: &str =
    "No documents found. Please upload your documents first.";
pub const MISSING_SCORE_NOTICE: &str =
    "No credit score available. Please start from the beginning.";

pub const DEFAULT_SESSION_IDLE_MINUTES: u32 = 30;

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("wiz-{id:06}"))
}

struct SessionEntry {
    intake: DocumentIntake,
    stage: WizardStage,
    last_touched: DateTime<Utc>,
}

/// Snapshot of the intake list and the submission gate.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeStatus {
    pub session_id: SessionId,
    pub state: IntakeState,
    pub documents: Vec<UploadedDocument>,
    pub bank_statement_count: usize,
    pub financial_report_count: usize,
    pub minimum_bank_statements: usize,
    pub remaining_bank_statements: usize,
    pub submittable: bool,
}

impl IntakeStatus {
    fn capture(session_id: &SessionId, intake: &DocumentIntake) -> Self {
        Self {
            session_id: session_id.clone(),
            state: intake.state(),
            documents: intake.documents().to_vec(),
            bank_statement_count: intake.bank_statement_count(),
            financial_report_count: intake.financial_report_count(),
            minimum_bank_statements: intake.minimum_bank_statements(),
            remaining_bank_statements: intake.remaining(),
            submittable: intake.is_submittable(),
        }
    }
}

/// Result of one picker or drop event.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeReceipt {
    pub accepted: Vec<UploadedDocument>,
    pub rejected: Vec<RejectedFile>,
    pub notices: Vec<Notice>,
    pub status: IntakeStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemovalReceipt {
    pub removed: bool,
    pub status: IntakeStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("unknown wizard session '{0}'")]
    UnknownSession(SessionId),
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("{}", .notice.message)]
    MissingState {
        redirect_to: WizardStage,
        notice: Notice,
    },
    #[error(transparent)]
    Context(#[from] ContextError),
}

impl WizardError {
    fn missing(message: &str) -> Self {
        Self::MissingState {
            redirect_to: WizardStage::Upload,
            notice: Notice::error(message),
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            WizardError::MissingState { notice, .. } => notice.clone(),
            other => Notice::error(other.to_string()),
        }
    }
}

/// Drives a wizard session through intake, preview, scoring, and explanation.
pub struct WizardService<S, C> {
    store: Arc<S>,
    scorer: Arc<C>,
    config: IntakeConfig,
    idle_timeout: Duration,
    sessions: Mutex<HashMap<SessionId, SessionEntry>>,
}

impl<S, C> WizardService<S, C>
where
    S: SessionStore + 'static,
    C: CreditScorer + 'static,
{
    pub fn new(store: Arc<S>, scorer: Arc<C>, config: IntakeConfig) -> Self {
        Self {
            store,
            scorer,
            config,
            idle_timeout: Duration::minutes(i64::from(DEFAULT_SESSION_IDLE_MINUTES)),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Sessions untouched for longer than `idle_timeout` are reclaimed on the next open.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn open_session(&self) -> SessionId {
        self.open_session_at(Utc::now())
    }

    pub fn open_session_at(&self, now: DateTime<Utc>) -> SessionId {
        self.evict_idle(now);

        let session_id = next_session_id();
        self.sessions().insert(
            session_id.clone(),
            SessionEntry {
                intake: DocumentIntake::new(self.config),
                stage: WizardStage::Upload,
                last_touched: now,
            },
        );
        info!(session_id = %session_id, "wizard session opened");
        session_id
    }

    pub fn live_sessions(&self) -> usize {
        self.sessions().len()
    }

    /// Discard the in-memory list and start over at the upload step.
    pub fn begin_intake(&self, session_id: &SessionId) -> Result<IntakeStatus, WizardError> {
        self.with_entry(session_id, |entry| {
            entry.intake = DocumentIntake::new(self.config);
            entry.stage = WizardStage::Upload;
            Ok(IntakeStatus::capture(session_id, &entry.intake))
        })
    }

    pub fn ingest(
        &self,
        session_id: &SessionId,
        batch: Vec<CandidateFile>,
    ) -> Result<IntakeReceipt, WizardError> {
        self.with_entry(session_id, |entry| {
            let outcome = entry.intake.ingest(batch)?;
            info!(
                session_id = %session_id,
                accepted = outcome.accepted.len(),
                rejected = outcome.rejected.len(),
                "upload batch processed"
            );
            let notices = outcome.notices();
            Ok(IntakeReceipt {
                accepted: outcome.accepted,
                rejected: outcome.rejected,
                notices,
                status: IntakeStatus::capture(session_id, &entry.intake),
            })
        })
    }

    pub fn remove_document(
        &self,
        session_id: &SessionId,
        document_id: &DocumentId,
    ) -> Result<RemovalReceipt, WizardError> {
        self.with_entry(session_id, |entry| {
            let removed = entry.intake.remove(document_id)?;
            Ok(RemovalReceipt {
                removed,
                status: IntakeStatus::capture(session_id, &entry.intake),
            })
        })
    }

    pub fn intake_status(&self, session_id: &SessionId) -> Result<IntakeStatus, WizardError> {
        self.with_entry(session_id, |entry| {
            Ok(IntakeStatus::capture(session_id, &entry.intake))
        })
    }

    /// Apply the submission gate and forward the batch to the preview stage.
    pub fn submit(&self, session_id: &SessionId) -> Result<PreviewView, WizardError> {
        self.with_entry(session_id, |entry| {
            let mut pending = entry.intake.clone();
            let documents = pending.submit()?;

            let context = WizardContext::new(self.store.as_ref(), session_id);
            context.clear_score()?;
            context.save_documents(&documents)?;

            entry.intake = pending;
            entry.stage = WizardStage::Preview;
            Ok(PreviewView::from_documents(&documents))
        })
    }

    pub fn preview(&self, session_id: &SessionId) -> Result<PreviewView, WizardError> {
        self.with_entry(session_id, |entry| {
            let documents = self.stored_documents(session_id, entry)?;
            entry.stage = WizardStage::Preview;
            Ok(PreviewView::from_documents(&documents))
        })
    }

    /// Run the scorer over the stored batch and keep the result for later stages.
    pub fn analyze(&self, session_id: &SessionId) -> Result<ScoreView, WizardError> {
        self.with_entry(session_id, |entry| {
            let documents = self.stored_documents(session_id, entry)?;
            let result = self.scorer.score(&documents, Utc::now());

            WizardContext::new(self.store.as_ref(), session_id).save_score(&result)?;
            info!(
                session_id = %session_id,
                documents = documents.len(),
                score = result.score,
                "credit analysis stored"
            );

            entry.stage = WizardStage::Score;
            Ok(ScoreView::from_result(&result))
        })
    }

    pub fn score(&self, session_id: &SessionId) -> Result<ScoreView, WizardError> {
        self.with_entry(session_id, |entry| {
            let result = self.stored_score(session_id, entry)?;
            entry.stage = WizardStage::Score;
            Ok(ScoreView::from_result(&result))
        })
    }

    pub fn explanation(&self, session_id: &SessionId) -> Result<ExplanationView, WizardError> {
        self.with_entry(session_id, |entry| {
            let result = self.stored_score(session_id, entry)?;
            entry.stage = WizardStage::Explanation;
            Ok(ExplanationView::from_result(&result))
        })
    }

    pub fn report(
        &self,
        session_id: &SessionId,
        generated_on: NaiveDate,
    ) -> Result<ReportDownload, WizardError> {
        self.with_entry(session_id, |entry| {
            let result = self.stored_score(session_id, entry)?;
            Ok(ReportDownload::render(&result, generated_on))
        })
    }

    pub fn progress(&self, session_id: &SessionId) -> Result<Vec<StepView>, WizardError> {
        self.with_entry(session_id, |entry| Ok(entry.stage.progress()))
    }

    /// End the session and drop everything stored for it.
    pub fn close_session(&self, session_id: &SessionId) -> Result<(), WizardError> {
        if self.sessions().remove(session_id).is_none() {
            return Err(WizardError::UnknownSession(session_id.clone()));
        }
        WizardContext::new(self.store.as_ref(), session_id).clear()?;
        info!(session_id = %session_id, "wizard session closed");
        Ok(())
    }

    fn evict_idle(&self, now: DateTime<Utc>) {
        let expired: Vec<SessionId> = {
            let mut sessions = self.sessions();
            let expired: Vec<SessionId> = sessions
                .iter()
                .filter(|(_, entry)| now - entry.last_touched > self.idle_timeout)
                .map(|(session_id, _)| session_id.clone())
                .collect();
            for session_id in &expired {
                sessions.remove(session_id);
            }
            expired
        };

        for session_id in expired {
            match WizardContext::new(self.store.as_ref(), &session_id).clear() {
                Ok(()) => info!(session_id = %session_id, "idle wizard session reclaimed"),
                Err(err) => warn!(
                    session_id = %session_id,
                    error = %err,
                    "idle wizard session dropped but its stored state could not be cleared"
                ),
            }
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_entry<T>(
        &self,
        session_id: &SessionId,
        action: impl FnOnce(&mut SessionEntry) -> Result<T, WizardError>,
    ) -> Result<T, WizardError> {
        let mut sessions = self.sessions();
        let entry = sessions
            .get_mut(session_id)
            .ok_or_else(|| WizardError::UnknownSession(session_id.clone()))?;
        entry.last_touched = entry.last_touched.max(Utc::now());
        action(entry)
    }

    fn stored_documents(
        &self,
        session_id: &SessionId,
        entry: &mut SessionEntry,
    ) -> Result<Vec<UploadedDocument>, WizardError> {
        match WizardContext::new(self.store.as_ref(), session_id).load_documents()? {
            Some(documents) => Ok(documents),
            None => {
                warn!(session_id = %session_id, "no stored documents; redirecting to upload");
                entry.stage = WizardStage::Upload;
                Err(WizardError::missing(MISSING_DOCUMENTS_NOTICE))
            }
        }
    }

    fn stored_score(
        &self,
        session_id: &SessionId,
        entry: &mut SessionEntry,
    ) -> Result<CreditScoreResult, WizardError> {
        match WizardContext::new(self.store.as_ref(), session_id).load_score()? {
            Some(result) => Ok(result),
            None => {
                warn!(session_id = %session_id, "no stored credit score; redirecting to upload");
                entry.stage = WizardStage::Upload;
                Err(WizardError::missing(MISSING_SCORE_NOTICE))
            }
        }
    }
}
