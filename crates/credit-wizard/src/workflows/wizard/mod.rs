//! Stage sequencing for the credit wizard. Each stage reads what the previous
//! one saved through a [`WizardContext`] over a [`SessionStore`].

pub mod context;
pub mod router;
pub mod service;
pub mod stage;
pub mod store;

#[cfg(test)]
mod tests;

pub use context::{ContextError, WizardContext, DOCUMENTS_KEY, SCORE_KEY};
pub use router::{wizard_router, UploadBatchRequest, NOTICE_HEADER};
pub use service::{
    IntakeReceipt, IntakeStatus, RemovalReceipt, WizardError, WizardService,
    DEFAULT_SESSION_IDLE_MINUTES, MISSING_DOCUMENTS_NOTICE, MISSING_SCORE_NOTICE,
};
pub use stage::{StepState, StepView, WizardStage};
pub use store::{SessionId, SessionStore, StoreError};
