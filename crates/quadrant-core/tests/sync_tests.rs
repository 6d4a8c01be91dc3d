use std::{sync::Arc, time::Duration};

use quadrant_core::{
    models::TaskCollection, params::ChangeStatus, store::Slot, Session, SessionBuilder,
    TaskStatus,
};
use tempfile::TempDir;

mod common;
use common::{add, create_test_session, session_on, ScriptedBoundary, DO_REPLY};

fn no_ai() -> Arc<ScriptedBoundary> {
    Arc::new(ScriptedBoundary::new(Ok(DO_REPLY)))
}

/// Waits until the session's tasks satisfy `done`, failing after a second.
async fn wait_for(session: &Session, done: impl Fn(&TaskCollection) -> bool) {
    let mut rx = session.watch_tasks();
    tokio::time::timeout(Duration::from_secs(1), async {
        while !done(&rx.borrow_and_update()) {
            rx.changed().await.expect("task document closed");
        }
    })
    .await
    .expect("timed out waiting for sync");
}

#[tokio::test]
async fn test_write_from_another_device_is_applied() {
    let (store, laptop) = create_test_session(no_ai()).await;
    let phone = session_on(store, "student", no_ai()).await;

    let task = add(&laptop, "Buy notebook").await;
    wait_for(&phone, |tasks| tasks.contains(&task.id)).await;

    phone
        .change_status(&ChangeStatus {
            id: task.id.to_string(),
            status: TaskStatus::Completed,
        })
        .await
        .unwrap();
    wait_for(&laptop, |tasks| {
        tasks.get(&task.id).is_some_and(|t| t.is_completed())
    })
    .await;
}

#[tokio::test]
async fn test_users_do_not_share_documents() {
    let (store, alice) = create_test_session(no_ai()).await;
    let bob = session_on(store, "bob", no_ai()).await;

    add(&alice, "Alice's task").await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(bob.tasks().is_empty());
}

#[tokio::test]
async fn test_sign_out_stops_remote_updates() {
    let (store, laptop) = create_test_session(no_ai()).await;
    let phone = session_on(store, "student", no_ai()).await;
    assert!(phone.is_syncing(Slot::Tasks));

    phone.sign_out();
    assert!(!phone.is_syncing(Slot::Tasks));
    assert!(!phone.is_syncing(Slot::Settings));

    add(&laptop, "Written after sign out").await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(phone.tasks().is_empty());
}

#[tokio::test]
async fn test_sqlite_store_persists_across_sessions() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("quadrant.db");
    let open = || async {
        SessionBuilder::new()
            .with_database_path(Some(&db_path))
            .with_ai_boundary(no_ai())
            .build()
            .await
            .expect("Failed to open session")
    };

    let first = open().await;
    let task = add(&first, "Survives restart").await;
    first.sign_out();
    drop(first);

    let second = open().await;
    let restored = second.tasks();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored.get(&task.id).unwrap().name, "Survives restart");
}
