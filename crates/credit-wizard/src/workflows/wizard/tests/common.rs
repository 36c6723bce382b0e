use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::IntakeConfig;
use crate::workflows::intake::CandidateFile;
use crate::workflows::scoring::MockCreditScorer;
use crate::workflows::wizard::store::{SessionId, SessionStore, StoreError};
use crate::workflows::wizard::{wizard_router, WizardService};

#[derive(Default)]
pub(super) struct MemoryStore {
    values: Mutex<HashMap<(SessionId, String), String>>,
}

impl MemoryStore {
    pub(super) fn raw(&self, session: &SessionId, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .get(&(session.clone(), key.to_string()))
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.values.lock().expect("store mutex poisoned").len()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, session: &SessionId, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(session, key))
    }

    fn set(&self, session: &SessionId, key: &str, value: String) -> Result<(), StoreError> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .insert((session.clone(), key.to_string()), value);
        Ok(())
    }

    fn remove(&self, session: &SessionId, key: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .remove(&(session.clone(), key.to_string()));
        Ok(())
    }

    fn clear(&self, session: &SessionId) -> Result<(), StoreError> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .retain(|(owner, _), _| owner != session);
        Ok(())
    }
}

pub(super) struct OfflineStore;

impl SessionStore for OfflineStore {
    fn get(&self, _session: &SessionId, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("storage offline".to_string()))
    }

    fn set(&self, _session: &SessionId, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage offline".to_string()))
    }

    fn remove(&self, _session: &SessionId, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage offline".to_string()))
    }

    fn clear(&self, _session: &SessionId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage offline".to_string()))
    }
}

/// Memory store whose key removals can be switched to fail.
#[derive(Default)]
pub(super) struct StuckRemovalStore {
    pub(super) inner: MemoryStore,
    failing: AtomicBool,
}

impl StuckRemovalStore {
    pub(super) fn fail_removals(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

impl SessionStore for StuckRemovalStore {
    fn get(&self, session: &SessionId, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(session, key)
    }

    fn set(&self, session: &SessionId, key: &str, value: String) -> Result<(), StoreError> {
        self.inner.set(session, key, value)
    }

    fn remove(&self, session: &SessionId, key: &str) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("removal rejected".to_string()));
        }
        self.inner.remove(session, key)
    }

    fn clear(&self, session: &SessionId) -> Result<(), StoreError> {
        self.inner.clear(session)
    }
}

pub(super) type MemoryService = WizardService<MemoryStore, MockCreditScorer>;

pub(super) fn build_service() -> (Arc<MemoryService>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = Arc::new(WizardService::new(
        store.clone(),
        Arc::new(MockCreditScorer),
        IntakeConfig::default(),
    ));
    (service, store)
}

pub(super) fn router_with_service(service: Arc<MemoryService>) -> axum::Router {
    wizard_router(service)
}

pub(super) fn pdf(name: &str, size: u64) -> CandidateFile {
    CandidateFile::new(name, "application/pdf", size)
}

pub(super) fn bank_statements(count: usize) -> Vec<CandidateFile> {
    (1..=count)
        .map(|month| pdf(&format!("bank_statement_2025_{month:02}.pdf"), 1_048_576))
        .collect()
}

pub(super) fn complete_batch() -> Vec<CandidateFile> {
    let mut batch = bank_statements(6);
    batch.push(pdf("annual_financial_report.pdf", 2_097_152));
    batch
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
