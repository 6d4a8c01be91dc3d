//! Tests for the mutation services.

use jiff::civil::date;
use serde_json::json;

use super::*;
use crate::{
    error::QuadrantError,
    models::{AssignedQuadrant, RecurrenceKind},
    params::{UpdateContext, UpdateSettings},
    recurrence::NEEDS_CLASSIFICATION,
    store::{DocumentKey, MemoryStore, Slot},
    sync::RemoteMirror,
};

/// Helper function to create a task service over an in-memory store
fn create_test_service() -> (Arc<MemoryStore>, TaskService) {
    let store = Arc::new(MemoryStore::new());
    let mirror = Arc::new(RemoteMirror::new(store.clone(), "u1"));
    let service = TaskService::new(Arc::new(LocalDocument::new(Slot::Tasks, mirror)));
    (store, service)
}

fn stored_tasks(store: &MemoryStore) -> TaskCollection {
    let body = store
        .get(&DocumentKey::new("u1", Slot::Tasks))
        .expect("tasks were never written");
    serde_json::from_value(body).expect("stored tasks do not parse")
}

/// Builds parent → child → grandchild and returns their ids.
async fn create_chain(service: &TaskService) -> (TaskId, TaskId, TaskId) {
    let parent = service.add_task("Thesis", None).await.unwrap();
    let child = service
        .add_subtasks(&parent.id, &["Chapter 1".to_string()])
        .await
        .unwrap()
        .remove(0);
    let grandchild = service
        .add_subtasks(&child.id, &["Intro".to_string()])
        .await
        .unwrap()
        .remove(0);
    (parent.id, child.id, grandchild.id)
}

#[tokio::test]
async fn test_add_task_commits_and_persists() {
    let (store, service) = create_test_service();

    let task = service
        .add_task("  Read paper ", Some(date(2024, 5, 1)))
        .await
        .expect("Failed to add task");

    assert_eq!(task.name, "Read paper");
    assert_eq!(task.quadrant, Quadrant::Unclassified);
    assert_eq!(task.status, TaskStatus::Active);
    assert!(task.recurring.is_none());
    assert!(service.snapshot().contains(&task.id));
    assert_eq!(stored_tasks(&store), *service.snapshot());
}

#[tokio::test]
async fn test_add_task_rejects_blank_name() {
    let (store, service) = create_test_service();

    let error = service.add_task("   ", None).await.unwrap_err();

    assert!(matches!(error, QuadrantError::InvalidInput { ref field, .. } if field == "name"));
    assert!(service.snapshot().is_empty());
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_add_subtasks_inherit_quadrant() {
    let (_store, service) = create_test_service();
    let parent = service.add_task("Move house", None).await.unwrap();
    service
        .move_quadrant(&parent.id, Quadrant::Unclassified, Quadrant::Schedule)
        .await
        .unwrap();

    let created = service
        .add_subtasks(
            &parent.id,
            &["Pack books".to_string(), " ".to_string(), "Book van".to_string()],
        )
        .await
        .unwrap();

    assert_eq!(created.len(), 2);
    for sub in &created {
        assert_eq!(sub.quadrant, Quadrant::Schedule);
        assert_eq!(sub.parent_id.as_ref(), Some(&parent.id));
    }
    let snapshot = service.snapshot();
    let children: Vec<&str> = snapshot
        .children_of(&parent.id)
        .iter()
        .map(|task| task.name.as_str())
        .collect();
    assert_eq!(children, vec!["Pack books", "Book van"]);
}

#[tokio::test]
async fn test_add_subtasks_unknown_parent() {
    let (store, service) = create_test_service();

    let error = service
        .add_subtasks(&TaskId::from("missing"), &["x".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(error, QuadrantError::TaskNotFound { .. }));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_change_status_cascades_to_every_descendant() {
    let (store, service) = create_test_service();
    let (parent, child, grandchild) = create_chain(&service).await;
    let unrelated = service.add_task("Groceries", None).await.unwrap();

    let change = service
        .change_status(&parent, TaskStatus::Trashed)
        .await
        .unwrap();

    assert_eq!(change.updated.len(), 3);
    assert!(change.successor.is_none());
    let snapshot = service.snapshot();
    for id in [&parent, &child, &grandchild] {
        assert_eq!(snapshot.get(id).unwrap().status, TaskStatus::Trashed);
    }
    assert_eq!(snapshot.get(&unrelated.id).unwrap().status, TaskStatus::Active);
    assert_eq!(stored_tasks(&store), *snapshot);
}

#[tokio::test]
async fn test_change_status_unknown_id_still_persists() {
    let (store, service) = create_test_service();
    service.add_task("Only task", None).await.unwrap();
    let writes = store.write_count();

    let change = service
        .change_status(&TaskId::from("nope"), TaskStatus::Completed)
        .await
        .unwrap();

    assert_eq!(change, StatusChange::default());
    assert_eq!(store.write_count(), writes + 1);
    assert_eq!(service.snapshot().len(), 1);
}

#[tokio::test]
async fn test_completing_recurring_task_spawns_one_successor() {
    let (_store, service) = create_test_service();
    let task = service
        .add_task("Laundry", Some(date(2024, 1, 1)))
        .await
        .unwrap();
    service
        .update_details(
            &task.id,
            "Laundry",
            Some(date(2024, 1, 1)),
            Some(Recurrence::new(RecurrenceKind::Weekly, 2)),
        )
        .await
        .unwrap();

    let change = service
        .change_status(&task.id, TaskStatus::Completed)
        .await
        .unwrap();

    let successor = change.successor.expect("no successor spawned");
    assert_ne!(successor.id, task.id);
    assert_eq!(successor.due_date, Some(date(2024, 1, 15)));
    assert_eq!(successor.status, TaskStatus::Active);
    assert_eq!(successor.quadrant, Quadrant::Unclassified);
    assert_eq!(successor.reasoning.as_deref(), Some(NEEDS_CLASSIFICATION));
    assert_eq!(successor.recurring, Some(Recurrence::new(RecurrenceKind::Weekly, 2)));
    assert_eq!(service.snapshot().len(), 2);

    // Completing again without reopening is not a new completion event.
    let again = service
        .change_status(&task.id, TaskStatus::Completed)
        .await
        .unwrap();
    assert!(again.successor.is_none());
    assert_eq!(service.snapshot().len(), 2);
}

#[tokio::test]
async fn test_reopen_and_complete_spawns_second_successor() {
    let (_store, service) = create_test_service();
    let task = service.add_task("Gym", Some(date(2024, 3, 4))).await.unwrap();
    service
        .update_details(
            &task.id,
            "Gym",
            Some(date(2024, 3, 4)),
            Some(Recurrence::new(RecurrenceKind::Daily, 1)),
        )
        .await
        .unwrap();

    service.change_status(&task.id, TaskStatus::Completed).await.unwrap();
    service.change_status(&task.id, TaskStatus::Active).await.unwrap();
    service.change_status(&task.id, TaskStatus::Completed).await.unwrap();

    assert_eq!(service.snapshot().len(), 3);
}

#[tokio::test]
async fn test_recover_restores_whole_subtree() {
    let (_store, service) = create_test_service();
    let (parent, child, grandchild) = create_chain(&service).await;
    service.change_status(&child, TaskStatus::Completed).await.unwrap();
    service.change_status(&parent, TaskStatus::Trashed).await.unwrap();

    let restored = service.recover_from_trash(&parent).await.unwrap();

    assert_eq!(restored.len(), 3);
    let snapshot = service.snapshot();
    for id in [&parent, &child, &grandchild] {
        assert_eq!(snapshot.get(id).unwrap().status, TaskStatus::Active);
    }
}

#[tokio::test]
async fn test_permanently_delete_removes_subtree_everywhere() {
    let (store, service) = create_test_service();
    let (parent, child, grandchild) = create_chain(&service).await;
    let other = service.add_task("Keep me", None).await.unwrap();

    let removed = service.permanently_delete(&parent).await.unwrap();

    assert_eq!(removed.len(), 3);
    let snapshot = service.snapshot();
    for id in [&parent, &child, &grandchild] {
        assert!(!snapshot.contains(id));
    }
    assert!(snapshot.contains(&other.id));
    let persisted = stored_tasks(&store);
    assert_eq!(persisted.len(), 1);
    assert!(persisted.contains(&other.id));
}

#[tokio::test]
async fn test_empty_trash_leaves_no_orphans() {
    let (_store, service) = create_test_service();
    let (parent, child, grandchild) = create_chain(&service).await;
    let keep = service.add_task("Active", None).await.unwrap();
    // Trash only the middle of the chain; its descendant goes with it.
    service.change_status(&child, TaskStatus::Trashed).await.unwrap();

    let removed = service.empty_trash().await.unwrap();

    assert_eq!(removed.len(), 2);
    let snapshot = service.snapshot();
    assert!(snapshot.contains(&parent));
    assert!(snapshot.contains(&keep.id));
    assert!(!snapshot.contains(&grandchild));
    assert!(snapshot
        .iter()
        .all(|task| task.parent_id.as_ref().map_or(true, |p| snapshot.contains(p))));
}

#[tokio::test]
async fn test_update_details_touches_only_editable_fields() {
    let (_store, service) = create_test_service();
    let task = service.add_task("Draft", None).await.unwrap();
    service
        .move_quadrant(&task.id, Quadrant::Unclassified, Quadrant::Do)
        .await
        .unwrap();

    let updated = service
        .update_details(&task.id, "Final draft", Some(date(2024, 2, 2)), None)
        .await
        .unwrap();

    assert_eq!(updated.name, "Final draft");
    assert_eq!(updated.due_date, Some(date(2024, 2, 2)));
    assert_eq!(updated.quadrant, Quadrant::Do);
    assert_eq!(updated.reasoning.as_deref(), Some("Manually moved from unclassified to do"));
    assert_eq!(updated.created_at, task.created_at);
}

#[tokio::test]
async fn test_update_details_errors() {
    let (_store, service) = create_test_service();
    let task = service.add_task("Draft", None).await.unwrap();

    let blank = service.update_details(&task.id, "", None, None).await;
    assert!(matches!(blank, Err(QuadrantError::InvalidInput { .. })));

    let missing = service
        .update_details(&TaskId::from("ghost"), "Name", None, None)
        .await;
    assert!(matches!(missing, Err(QuadrantError::TaskNotFound { .. })));
    assert_eq!(service.snapshot().get(&task.id).unwrap().name, "Draft");
}

#[tokio::test]
async fn test_move_quadrant_replaces_reasoning() {
    let (_store, service) = create_test_service();
    let task = service.add_task("Call bank", None).await.unwrap();
    service
        .apply_classifications(&[ClassificationOutcome::Classified {
            id: task.id.clone(),
            reply: serde_json::from_value(json!({
                "quadrant": "delegate",
                "reasoning": "Someone else can call"
            }))
            .unwrap(),
        }])
        .await
        .unwrap();

    let moved = service
        .move_quadrant(&task.id, Quadrant::Delegate, Quadrant::Do)
        .await
        .unwrap();

    assert_eq!(moved.quadrant, Quadrant::Do);
    assert_eq!(moved.reasoning.as_deref(), Some("Manually moved from delegate to do"));
}

#[tokio::test]
async fn test_apply_classifications_apply_if_present() {
    let (_store, service) = create_test_service();
    let kept = service.add_task("Essay", Some(date(2024, 4, 1))).await.unwrap();
    let failed = service.add_task("Email", None).await.unwrap();

    let applied = service
        .apply_classifications(&[
            ClassificationOutcome::Classified {
                id: kept.id.clone(),
                reply: crate::ai::ClassificationReply {
                    quadrant: AssignedQuadrant::Schedule,
                    reasoning: "Important".to_string(),
                    suggested_date: Some(date(2024, 3, 28)),
                    date_reasoning: Some("Buffer before deadline".to_string()),
                    scheduling_hint: None,
                },
            },
            ClassificationOutcome::Failed {
                id: failed.id.clone(),
                diagnostic: "Classification failed: timeout".to_string(),
            },
            ClassificationOutcome::Failed {
                id: TaskId::from("deleted-meanwhile"),
                diagnostic: "Classification failed: x".to_string(),
            },
        ])
        .await
        .unwrap();

    assert_eq!(applied.len(), 2);
    let snapshot = service.snapshot();
    let kept = snapshot.get(&kept.id).unwrap();
    assert_eq!(kept.quadrant, Quadrant::Schedule);
    assert_eq!(kept.due_date, Some(date(2024, 3, 28)));
    assert_eq!(kept.date_reasoning.as_deref(), Some("Buffer before deadline"));
    let failed = snapshot.get(&failed.id).unwrap();
    assert_eq!(failed.quadrant, Quadrant::Unclassified);
    assert_eq!(failed.reasoning.as_deref(), Some("Classification failed: timeout"));
    assert_eq!(snapshot.len(), 2);
}

#[tokio::test]
async fn test_persistence_failure_keeps_local_state() {
    let (store, service) = create_test_service();
    store.fail_writes(true);

    let error = service.add_task("Offline task", None).await.unwrap_err();

    assert!(matches!(error, QuadrantError::Persistence { ref slot, .. } if slot == "tasks"));
    assert_eq!(service.snapshot().len(), 1);
    assert!(store.get(&DocumentKey::new("u1", Slot::Tasks)).is_none());

    store.fail_writes(false);
    service.add_task("Back online", None).await.unwrap();
    assert_eq!(stored_tasks(&store).len(), 2);
}

#[tokio::test]
async fn test_replace_all() {
    let (store, service) = create_test_service();
    service.add_task("Old", None).await.unwrap();

    let incoming = TaskCollection::new(vec![Task::new("Imported", None)]);
    service.replace_all(incoming.clone()).await.unwrap();

    assert_eq!(*service.snapshot(), incoming);
    assert_eq!(stored_tasks(&store), incoming);
}

#[tokio::test]
async fn test_profile_updates_persist_independently() {
    let store = Arc::new(MemoryStore::new());
    let mirror = Arc::new(RemoteMirror::new(store.clone(), "u1"));
    let profile = ProfileService::new(
        Arc::new(LocalDocument::new(Slot::Context, mirror.clone())),
        Arc::new(LocalDocument::new(Slot::Settings, mirror)),
    );

    profile
        .update_context(&UpdateContext {
            goals: Some("Graduate".to_string()),
            ..UpdateContext::default()
        })
        .await
        .unwrap();
    let settings = profile
        .update_settings(&UpdateSettings {
            api_key: Some("key-1".to_string()),
            coaching_enabled: None,
        })
        .await
        .unwrap();

    assert_eq!(profile.context().goals, "Graduate");
    assert_eq!(settings.credential(), Some("key-1"));
    assert!(settings.coaching_enabled);
    assert_eq!(
        store.get(&DocumentKey::new("u1", Slot::Context)).unwrap()["goals"],
        "Graduate"
    );
    assert_eq!(
        store.get(&DocumentKey::new("u1", Slot::Settings)).unwrap()["apiKey"],
        "key-1"
    );
}
