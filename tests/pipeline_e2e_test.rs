// ==========================================
// End-to-end pipeline tests
// ==========================================
// Staff directory -> exam timetable -> invigilator
// timetable -> resolution -> correlation -> attendance
// ==========================================


use exam_ops::api::ApiError;
use exam_ops::domain::{
    AttendanceStatus, MatchSource, NewStaff, StaffRole, StaffSyncSummary, UnmatchedReason,
};
use exam_ops::logging;
use test_helpers::{
    create_test_state, EXAM_SCHEDULE_JSON, INVIGILATOR_SCHEDULE_JSON, STAFF_DIRECTORY_JSON,
};

#[tokio::test]
async fn test_full_schedule_pipeline() {
    logging::init_test();
    let (_temp_file, state) = create_test_state();

    // 1. staff directory
    let summary = state
        .staff_api
        .sync_staff_directory(STAFF_DIRECTORY_JSON, "registrar")
        .unwrap();
    assert_eq!(summary, StaffSyncSummary { created: 5, updated: 0 });
    assert_eq!(state.staff_api.fetch_staff_details("invigilators").unwrap().len(), 3);
    assert_eq!(state.staff_api.fetch_staff_details("nurses").unwrap().len(), 1);

    // 2. exam timetable
    let upload = state
        .exam_api
        .upload_exam_schedule(EXAM_SCHEDULE_JSON, "registrar")
        .unwrap();
    assert_eq!(upload.sessions, 3);

    // 3. invigilator timetable
    let mut queue = state
        .invigilator_api
        .open_resolution_queue(INVIGILATOR_SCHEDULE_JSON, "registrar")
        .await
        .unwrap();
    assert_eq!(queue.matched().len(), 3);
    assert_eq!(queue.unmatched().len(), 1);
    assert_eq!(queue.unmatched()[0].abbreviated_name, "T. Darko");

    let owusu = queue
        .matched()
        .iter()
        .find(|m| m.abbreviated_name == "Owusu-Ansah K.")
        .unwrap();
    assert_eq!(owusu.full_name, "Kwame Owusu-Ansah");
    assert_eq!(owusu.source, MatchSource::Surname);

    // 4. manual resolution with a new staff member
    let created = state
        .invigilator_api
        .create_staff_and_resolve(
            &mut queue,
            0,
            &NewStaff::new("Thomas Darko", StaffRole::PartTimeLecturer),
            "registrar",
        )
        .unwrap();
    assert_eq!(created.full_name, "Thomas Darko");
    assert!(queue.is_settled());
    assert!(queue.duplicates().is_empty());

    // 5. correlation
    let report = state
        .invigilator_api
        .confirm_and_correlate(queue, "registrar")
        .unwrap();
    assert_eq!(report.created_or_updated_sessions, 4);
    assert_eq!(report.unmatched_details.len(), 1);
    assert_eq!(report.unmatched_details[0].staff_name, "Kwame Owusu-Ansah");
    assert_eq!(report.unmatched_details[0].reason, UnmatchedReason::NoSession);

    // course codes picked the SMA session for J. Smith's morning slot
    let sessions = state
        .exam_api
        .get_exam_schedule(&upload.exam_name.exam_name_id)
        .unwrap();
    let sma_morning = sessions
        .iter()
        .find(|s| s.venue == "SMA" && s.start_time == "9:00am")
        .unwrap();
    let assigned = state
        .attendance_api
        .list_session_assignments(&sma_morning.exam_id)
        .unwrap();
    assert_eq!(assigned.len(), 1);

    // blank detail venue fell back to the session venue
    let afternoon = sessions.iter().find(|s| s.start_time == "1:30pm").unwrap();
    let afternoon_assigned = state
        .attendance_api
        .list_session_assignments(&afternoon.exam_id)
        .unwrap();
    assert_eq!(afternoon_assigned.len(), 2);
    assert!(afternoon_assigned.iter().all(|a| a.venue == "SMA"));

    // 6. attendance
    let attendance = state
        .attendance_api
        .take_attendance(&assigned[0].assignment_id, Some(AttendanceStatus::Present), "chief")
        .unwrap();
    assert_eq!(attendance.status, Some(AttendanceStatus::Present));

    let overwritten = state
        .attendance_api
        .take_attendance(&assigned[0].assignment_id, Some(AttendanceStatus::Late), "chief")
        .unwrap();
    assert_eq!(overwritten.attendance_id, attendance.attendance_id);
    assert_eq!(overwritten.status, Some(AttendanceStatus::Late));

    // every step left an audit entry
    let logs = state.action_log_repo.find_by_actor("registrar", 100).unwrap();
    for action in [
        "SYNC_STAFF_DIRECTORY",
        "UPLOAD_EXAM_SCHEDULE",
        "UPLOAD_INVIGILATOR_SCHEDULE",
        "CREATE_STAFF",
        "RESOLVE_ENTRY",
        "CORRELATE_SCHEDULE",
    ] {
        assert!(
            logs.iter().any(|log| log.action_type == action),
            "missing action log {}",
            action
        );
    }
}

#[tokio::test]
async fn test_correlation_is_idempotent() {
    let (_temp_file, state) = create_test_state();
    state.staff_api.sync_staff_directory(STAFF_DIRECTORY_JSON, "registrar").unwrap();
    state.exam_api.upload_exam_schedule(EXAM_SCHEDULE_JSON, "registrar").unwrap();

    let outcome = state
        .invigilator_api
        .match_extracted_schedule(INVIGILATOR_SCHEDULE_JSON, "registrar")
        .await
        .unwrap();

    let first = state.invigilator_api.correlate_confirmed(&outcome.matched, "registrar");
    let second = state.invigilator_api.correlate_confirmed(&outcome.matched, "registrar");

    assert_eq!(first.created_or_updated_sessions, 3);
    assert_eq!(second.created_or_updated_sessions, 3);
    assert_eq!(first.unmatched_details, second.unmatched_details);
}

#[tokio::test]
async fn test_unsettled_queue_writes_nothing() {
    let (_temp_file, state) = create_test_state();
    state.staff_api.sync_staff_directory(STAFF_DIRECTORY_JSON, "registrar").unwrap();
    let upload = state
        .exam_api
        .upload_exam_schedule(EXAM_SCHEDULE_JSON, "registrar")
        .unwrap();

    let queue = state
        .invigilator_api
        .open_resolution_queue(INVIGILATOR_SCHEDULE_JSON, "registrar")
        .await
        .unwrap();
    let result = state.invigilator_api.confirm_and_correlate(queue, "registrar");
    assert!(matches!(result, Err(ApiError::Unresolved(_))));

    for session in state.exam_api.get_exam_schedule(&upload.exam_name.exam_name_id).unwrap() {
        assert!(state
            .attendance_api
            .list_session_assignments(&session.exam_id)
            .unwrap()
            .is_empty());
    }
}

#[tokio::test]
async fn test_worksheet_review_then_correlate() {
    let (_temp_file, state) = create_test_state();
    state.staff_api.sync_staff_directory(STAFF_DIRECTORY_JSON, "registrar").unwrap();
    state.exam_api.upload_exam_schedule(EXAM_SCHEDULE_JSON, "registrar").unwrap();

    let outcome = state
        .invigilator_api
        .match_extracted_schedule(INVIGILATOR_SCHEDULE_JSON, "registrar")
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviewed.csv");
    let rows = state.invigilator_api.export_worksheet(&outcome.matched, &path).unwrap();
    assert_eq!(rows, 4);

    let imported = state.invigilator_api.import_worksheet(&path).unwrap();
    assert_eq!(imported.len(), 3);
    assert!(imported.iter().all(|r| r.source == MatchSource::Manual));

    let report = state.invigilator_api.correlate_confirmed(&imported, "registrar");
    assert_eq!(report.created_or_updated_sessions, 3);
    assert_eq!(report.unmatched_details.len(), 1);
}

#[tokio::test]
async fn test_bad_uploads_fail_generically() {
    let (_temp_file, state) = create_test_state();

    let exam = state.exam_api.upload_exam_schedule("not json", "registrar");
    assert!(matches!(exam, Err(ApiError::UploadFailed)));

    let invigilators = state
        .invigilator_api
        .match_extracted_schedule(r#"[{"Details": []}]"#, "registrar")
        .await;
    assert!(matches!(invigilators, Err(ApiError::UploadFailed)));
    assert_eq!(
        invigilators.unwrap_err().to_string(),
        "An error occurred while uploading the schedule."
    );

    state.exam_api.upload_exam_schedule(EXAM_SCHEDULE_JSON, "registrar").unwrap();
    assert!(matches!(
        state.exam_api.upload_exam_schedule(EXAM_SCHEDULE_JSON, "registrar"),
        Err(ApiError::DuplicateUpload(_))
    ));
}

#[test]
fn test_attendance_requires_assignment() {
    let (_temp_file, state) = create_test_state();
    let result = state
        .attendance_api
        .take_attendance("missing", Some(AttendanceStatus::Absent), "chief");
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}
