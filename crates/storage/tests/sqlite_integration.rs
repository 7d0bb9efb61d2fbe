use std::collections::BTreeMap;

use chrono::Duration;
use quiz_core::model::{AnswerRecord, SessionId, SessionState};
use quiz_core::time::fixed_now;
use storage::repository::{SessionRepository, StorageError};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_unknown_session_is_not_started() {
    let repo = connect("memdb_unknown").await;

    let state = repo.load_session(SessionId::new(404)).await.unwrap();
    assert_eq!(state, SessionState::NotStarted);
    assert!(matches!(
        repo.get_record(SessionId::new(404)).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn sqlite_roundtrip_persists_answers_and_overwrites() {
    let repo = connect("memdb_roundtrip").await;
    let id = SessionId::new(12);

    repo.store_session(id, &SessionState::started(), fixed_now())
        .await
        .unwrap();

    let mut answers = BTreeMap::new();
    answers.insert(0, AnswerRecord::from_persisted("4".into(), true));
    answers.insert(1, AnswerRecord::from_persisted("".into(), false));
    let state = SessionState::InProgress { index: 2, answers };
    let later = fixed_now() + Duration::minutes(3);
    repo.store_session(id, &state, later).await.unwrap();

    let record = repo.get_record(id).await.expect("record");
    assert_eq!(record.id, id);
    assert_eq!(record.state, state);
    assert_eq!(record.updated_at, later);
    assert_eq!(record.state.correct_count(), 1);
}

#[tokio::test]
async fn sqlite_completed_session_stores_not_started() {
    let repo = connect("memdb_completed").await;
    let id = SessionId::new(3);

    repo.store_session(id, &SessionState::started(), fixed_now())
        .await
        .unwrap();
    repo.store_session(id, &SessionState::NotStarted, fixed_now())
        .await
        .unwrap();

    assert_eq!(repo.load_session(id).await.unwrap(), SessionState::NotStarted);
}

#[tokio::test]
async fn sqlite_migrate_is_repeatable() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}
