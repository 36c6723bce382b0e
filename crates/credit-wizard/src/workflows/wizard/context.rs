use serde::de::DeserializeOwned;
use serde::Serialize;

use super::store::{SessionId, SessionStore, StoreError};
use crate::workflows::intake::UploadedDocument;
use crate::workflows::scoring::CreditScoreResult;

pub const DOCUMENTS_KEY: &str = "uploadedDocuments";
pub const SCORE_KEY: &str = "creditScoreResult";

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("stored value for '{key}' is not valid: {source}")]
    Corrupt {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("unable to encode value for '{key}': {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
}

/// Stage-boundary view of one session's stored state.
pub struct WizardContext<'a, S: ?Sized> {
    store: &'a S,
    session: &'a SessionId,
}

impl<'a, S> WizardContext<'a, S>
where
    S: SessionStore + ?Sized,
{
    pub fn new(store: &'a S, session: &'a SessionId) -> Self {
        Self { store, session }
    }

    pub fn load_documents(&self) -> Result<Option<Vec<UploadedDocument>>, ContextError> {
        self.load(DOCUMENTS_KEY)
    }

    pub fn save_documents(&self, documents: &[UploadedDocument]) -> Result<(), ContextError> {
        self.save(DOCUMENTS_KEY, documents)
    }

    pub fn load_score(&self) -> Result<Option<CreditScoreResult>, ContextError> {
        self.load(SCORE_KEY)
    }

    pub fn save_score(&self, result: &CreditScoreResult) -> Result<(), ContextError> {
        self.save(SCORE_KEY, result)
    }

    pub fn clear_score(&self) -> Result<(), ContextError> {
        self.store.remove(self.session, SCORE_KEY)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ContextError> {
        self.store.clear(self.session)?;
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, ContextError> {
        match self.store.get(self.session, key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| ContextError::Corrupt { key, source }),
            None => Ok(None),
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> Result<(), ContextError> {
        let raw =
            serde_json::to_string(value).map_err(|source| ContextError::Encode { key, source })?;
        self.store.set(self.session, key, raw)?;
        Ok(())
    }
}
