use chrono::NaiveDate;
use credit_wizard::workflows::intake::CandidateFile;
use credit_wizard::workflows::wizard::{SessionId, SessionStore, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local stand-in for a browser tab's session storage.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, HashMap<String, String>>>>,
}

impl InMemorySessionStore {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<SessionId, HashMap<String, String>>>, StoreError>
    {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Unavailable("session store mutex poisoned".to_string()))
    }
}

#[cfg(test)]
impl InMemorySessionStore {
    pub(crate) fn session_count(&self) -> usize {
        self.sessions.lock().map(|guard| guard.len()).unwrap_or_default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, session: &SessionId, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .get(session)
            .and_then(|values| values.get(key))
            .cloned())
    }

    fn set(&self, session: &SessionId, key: &str, value: String) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        guard
            .entry(session.clone())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, session: &SessionId, key: &str) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if let Some(values) = guard.get_mut(session) {
            values.remove(key);
        }
        Ok(())
    }

    fn clear(&self, session: &SessionId) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        guard.remove(session);
        Ok(())
    }
}

/// Describe a local file the way a browser picker would: name, guessed type, size.
pub(crate) fn candidate_from_path(path: &Path) -> std::io::Result<CandidateFile> {
    let metadata = std::fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let content_type = mime_guess::from_path(path)
        .first()
        .map(|guess| guess.essence_str().to_string())
        .unwrap_or_default();

    Ok(CandidateFile {
        name,
        content_type,
        size: metadata.len(),
    })
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
