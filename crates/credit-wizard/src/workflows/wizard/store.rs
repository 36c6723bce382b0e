use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for one wizard session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Volatile, string-valued key-value storage scoped to a session.
pub trait SessionStore: Send + Sync {
    fn get(&self, session: &SessionId, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, session: &SessionId, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&self, session: &SessionId, key: &str) -> Result<(), StoreError>;
    fn clear(&self, session: &SessionId) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
