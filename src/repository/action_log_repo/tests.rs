use super::ActionLogRepository;
use crate::domain::action_log::{ActionLog, ActionType};
use chrono::{Duration, Utc};
use rusqlite::Connection;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::configure_sqlite_connection(&conn).unwrap();
    crate::db::init_schema(&conn).unwrap();
    Arc::new(Mutex::new(conn))
}

#[test]
fn test_insert_and_find_by_id() {
    let repo = ActionLogRepository::new(setup_test_db());

    let log = ActionLog::record(ActionType::ResolveEntry, "admin")
        .with_payload(json!({"staff_id": "s1", "entry_index": 0}))
        .with_detail("X. Zephyr");
    let id = repo.insert(&log).unwrap();
    assert_eq!(id, log.action_id);

    let found = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(found.action_type, "RESOLVE_ENTRY");
    assert_eq!(found.actor, "admin");
    assert_eq!(found.payload_json, Some(json!({"staff_id": "s1", "entry_index": 0})));
    assert_eq!(found.detail.as_deref(), Some("X. Zephyr"));

    assert!(repo.find_by_id("missing").unwrap().is_none());
}

#[test]
fn test_batch_insert_and_filters() {
    let repo = ActionLogRepository::new(setup_test_db());
    let logs = vec![
        ActionLog::record(ActionType::UploadExamSchedule, "admin"),
        ActionLog::record(ActionType::CorrelateSchedule, "admin"),
        ActionLog::record(ActionType::TakeAttendance, "chief"),
    ];

    assert_eq!(repo.batch_insert(logs).unwrap(), 3);
    assert_eq!(repo.count_by_actor("admin").unwrap(), 2);
    assert_eq!(repo.find_by_actor("chief", 10).unwrap().len(), 1);
    assert_eq!(
        repo.find_by_action_type(ActionType::CorrelateSchedule.to_db_str(), 10)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_find_by_time_range() {
    let repo = ActionLogRepository::new(setup_test_db());
    let mut old = ActionLog::record(ActionType::SyncStaffDirectory, "admin");
    old.action_ts = Utc::now().naive_utc() - Duration::days(30);
    repo.insert(&old).unwrap();
    repo.insert(&ActionLog::record(ActionType::CreateStaff, "admin")).unwrap();

    let now = Utc::now().naive_utc();
    let recent = repo
        .find_by_time_range(now - Duration::days(1), now + Duration::days(1))
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].action_type, "CREATE_STAFF");
}

#[test]
fn test_find_recent_paged() {
    let repo = ActionLogRepository::new(setup_test_db());
    for _ in 0..5 {
        repo.insert(&ActionLog::record(ActionType::ResolveEntry, "admin")).unwrap();
    }

    assert_eq!(repo.find_recent_paged(2, 0).unwrap().len(), 2);
    assert_eq!(repo.find_recent_paged(2, 4).unwrap().len(), 1);
}
