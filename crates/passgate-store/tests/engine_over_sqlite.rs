//! The lifecycle engine driving the real SQLite store end to end.
//!
//! The in-memory store covers the state machine; this suite pins the
//! store-boundary behavior: status vocabulary on disk, the edited-fields
//! delimited string, and the version column the CAS pivots on.

use chrono::NaiveDateTime;
use passgate_core::{
    Action, Actor, ActorId, AllowedWindow, DraftRequest, Engine, EngineError, RequestStore, Role,
    Status, StoreError,
};
use passgate_store::SqliteStore;

const ADMIN: ActorId = ActorId(1);
const OPERATOR: ActorId = ActorId(7);
const SUBMITTER: ActorId = ActorId(42);

fn noon() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2024, 5, 10)
        .expect("date")
        .and_hms_opt(12, 0, 0)
        .expect("time")
}

fn seeded_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().expect("open");
    store
        .upsert_actor(&Actor::new(ADMIN, Role::Admin))
        .expect("admin");
    store
        .upsert_actor(&Actor::new(OPERATOR, Role::Operator))
        .expect("operator");
    store
        .upsert_actor(&Actor::new(SUBMITTER, Role::User))
        .expect("user");
    store
}

#[test]
fn full_lifecycle_persists_through_sqlite() {
    let store = seeded_store();
    let engine = Engine::new(&store, &store, AllowedWindow::default());

    let submitted = engine
        .submit(
            SUBMITTER,
            &DraftRequest {
                checkpoint: Some("north gate".to_string()),
                date_start: Some("2024-05-12".to_string()),
                people_count: Some(4),
                purpose: "resupply".to_string(),
                ..DraftRequest::default()
            },
            noon(),
        )
        .expect("submit");
    let id = submitted.request.id;
    assert_eq!(submitted.notifications.len(), 1);

    let edited = engine
        .apply(
            SUBMITTER,
            id,
            &Action::EditField {
                field: "checkpoint".to_string(),
                value: "south gate".to_string(),
            },
            noon(),
        )
        .expect("edit");
    assert_eq!(edited.request.status, Status::Edited);

    // The dirty marker survives the delimited-string roundtrip.
    let row = store.get(id).expect("reload");
    assert!(row.edited_fields.contains("checkpoint"));
    assert_eq!(row.checkpoint.as_deref(), Some("south gate"));

    let approved = engine
        .apply(
            ADMIN,
            id,
            &Action::Approve {
                operator: Some(OPERATOR),
            },
            noon(),
        )
        .expect("approve");
    assert_eq!(approved.request.status, Status::InProgress);
    assert_eq!(approved.request.operator_id, Some(OPERATOR));
    assert!(approved.request.edited_fields.is_empty());

    let completed = engine
        .apply(OPERATOR, id, &Action::Complete, noon())
        .expect("complete");
    assert_eq!(completed.request.status, Status::Completed);
    assert!(completed.request.operator_id.is_none());

    // Terminal on disk means terminal for everyone.
    let err = engine
        .apply(SUBMITTER, id, &Action::Duplicate, noon())
        .expect_err("terminal");
    assert!(matches!(err, EngineError::InvalidTransition { .. }));
}

#[test]
fn concurrent_admins_race_on_the_version_column() {
    let store = seeded_store();
    let engine = Engine::new(&store, &store, AllowedWindow::default());

    let id = engine
        .submit(SUBMITTER, &DraftRequest::free_form("one truck"), noon())
        .expect("submit")
        .request
        .id;

    // Both admins read version 1; the first engine call wins the write.
    let snapshot = store.get(id).expect("read");
    engine
        .apply(
            ADMIN,
            id,
            &Action::Approve {
                operator: Some(OPERATOR),
            },
            noon(),
        )
        .expect("first approval");

    let err = store
        .update(&snapshot, snapshot.version)
        .expect_err("stale write");
    assert_eq!(err, StoreError::Conflict(id));
}

#[test]
fn blocked_submitter_is_rejected_from_the_directory() {
    let store = seeded_store();
    store
        .set_actor_blocked(SUBMITTER, true)
        .expect("block flag");
    let engine = Engine::new(&store, &store, AllowedWindow::default());

    let err = engine
        .submit(SUBMITTER, &DraftRequest::free_form("one truck"), noon())
        .expect_err("blocked");
    assert!(matches!(err, EngineError::Forbidden { .. }));
}
