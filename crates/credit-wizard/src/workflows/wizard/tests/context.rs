use super::common::*;
use chrono::Utc;

use crate::workflows::intake::DocumentIntake;
use crate::workflows::scoring::{CreditScorer, MockCreditScorer};
use crate::workflows::wizard::context::{ContextError, WizardContext, DOCUMENTS_KEY, SCORE_KEY};
use crate::workflows::wizard::store::{SessionId, SessionStore};

#[test]
fn documents_round_trip_through_the_store() {
    let store = MemoryStore::default();
    let session = SessionId("wiz-test".to_string());
    let context = WizardContext::new(&store, &session);

    let mut intake = DocumentIntake::default();
    intake.ingest(complete_batch()).expect("intake open");

    assert!(context.load_documents().expect("load succeeds").is_none());
    context
        .save_documents(intake.documents())
        .expect("save succeeds");

    let loaded = context
        .load_documents()
        .expect("load succeeds")
        .expect("documents stored");
    assert_eq!(loaded.as_slice(), intake.documents());

    let raw = store.raw(&session, DOCUMENTS_KEY).expect("raw json stored");
    assert!(raw.contains("\"type\":\"bankStatement\""));
    assert!(raw.contains("\"uploadDate\":"));
    assert!(!raw.contains("upload_date"));
}

#[test]
fn clear_drops_only_the_owning_session() {
    let store = MemoryStore::default();
    let first = SessionId("wiz-a".to_string());
    let second = SessionId("wiz-b".to_string());
    let score = MockCreditScorer.score(&[], Utc::now());

    WizardContext::new(&store, &first)
        .save_score(&score)
        .expect("save succeeds");
    WizardContext::new(&store, &second)
        .save_score(&score)
        .expect("save succeeds");

    WizardContext::new(&store, &first)
        .clear()
        .expect("clear succeeds");

    assert!(store.raw(&first, SCORE_KEY).is_none());
    assert!(store.raw(&second, SCORE_KEY).is_some());
}

#[test]
fn corrupt_values_are_reported_with_their_key() {
    let store = MemoryStore::default();
    let session = SessionId("wiz-corrupt".to_string());
    store
        .set(&session, SCORE_KEY, "{not json".to_string())
        .expect("set succeeds");

    match WizardContext::new(&store, &session).load_score() {
        Err(ContextError::Corrupt { key, .. }) => assert_eq!(key, SCORE_KEY),
        other => panic!("expected corrupt value error, got {other:?}"),
    }
}
