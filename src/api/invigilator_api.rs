// ==========================================
// Exam Ops - Invigilator Schedule API
// ==========================================
// Pipeline: extractor JSON -> abbreviation matching ->
// manual resolution -> session correlation.
// Worksheet export / import lets the confirmed schedule
// be reviewed offline before correlation.
// ==========================================

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::match_config_trait::MatchConfigReader;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::exam::CorrelationReport;
use crate::domain::schedule::{MatchOutcome, MatchResult};
use crate::domain::staff::{NewStaff, StaffRecord};
use crate::domain::types::AssignmentRole;
use crate::engine::correlator::SessionCorrelator;
use crate::engine::matcher::AbbreviationMatcher;
use crate::engine::resolution::ResolutionQueue;
use crate::importer::schedule_parser::parse_extracted_schedule;
use crate::importer::worksheet;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::assignment_repo::AssignmentRepository;
use crate::repository::exam_repo::ExamRepository;
use crate::repository::staff_repo::StaffRepository;
use crate::repository::StaffDirectory;

pub struct InvigilatorApi {
    staff_repo: Arc<StaffRepository>,
    exam_repo: Arc<ExamRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<dyn MatchConfigReader>,
}

impl InvigilatorApi {
    pub fn new(
        staff_repo: Arc<StaffRepository>,
        exam_repo: Arc<ExamRepository>,
        assignment_repo: Arc<AssignmentRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<dyn MatchConfigReader>,
    ) -> Self {
        Self {
            staff_repo,
            exam_repo,
            assignment_repo,
            action_log_repo,
            config,
        }
    }

    // ==========================================
    // matching
    // ==========================================

    /// Match an extracted invigilator timetable against the roster
    ///
    /// Any payload that cannot be parsed fails with the generic
    /// `UploadFailed`; the cause is only logged.
    pub async fn match_extracted_schedule(&self, raw_json: &str, operator: &str) -> ApiResult<MatchOutcome> {
        let (outcome, _) = self.match_with_roster(raw_json, operator).await?;
        Ok(outcome)
    }

    /// Match and open a resolution queue over the unmatched entries
    pub async fn open_resolution_queue(&self, raw_json: &str, operator: &str) -> ApiResult<ResolutionQueue> {
        let (outcome, roster) = self.match_with_roster(raw_json, operator).await?;
        Ok(ResolutionQueue::new(outcome, roster))
    }

    async fn match_with_roster(
        &self,
        raw_json: &str,
        operator: &str,
    ) -> ApiResult<(MatchOutcome, Vec<StaffRecord>)> {
        let entries = parse_extracted_schedule(raw_json).map_err(|e| {
            warn!(error = %e, "invigilator schedule payload rejected");
            ApiError::UploadFailed
        })?;

        let matcher_config = self
            .config
            .load_matcher_config()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let roles = self
            .config
            .get_invigilator_roles()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let roster = self.staff_repo.list_by_roles(&roles)?;
        let outcome = AbbreviationMatcher::new(matcher_config).match_entries(&entries, &roster);

        let log = ActionLog::record(ActionType::UploadInvigilatorSchedule, operator).with_payload(
            serde_json::json!({
                "entries": entries.len(),
                "matched": outcome.matched.len(),
                "unmatched": outcome.unmatched.len(),
                "roster": roster.len(),
            }),
        );
        self.write_log(&log);

        Ok((outcome, roster))
    }

    // ==========================================
    // manual resolution
    // ==========================================

    /// Resolve an unmatched entry to an existing staff member
    pub fn resolve_entry(
        &self,
        queue: &mut ResolutionQueue,
        entry_index: usize,
        staff_id: &str,
        operator: &str,
    ) -> ApiResult<MatchResult> {
        let result = queue.resolve(entry_index, staff_id)?;
        self.log_resolution(&result, entry_index, queue.is_duplicate(staff_id), operator);
        Ok(result)
    }

    /// Create a staff member for an unmatched entry and resolve the entry to them
    pub fn create_staff_and_resolve(
        &self,
        queue: &mut ResolutionQueue,
        entry_index: usize,
        new_staff: &NewStaff,
        operator: &str,
    ) -> ApiResult<MatchResult> {
        let directory: &dyn StaffDirectory = self.staff_repo.as_ref();
        let result = queue.create_staff_and_resolve(entry_index, new_staff, directory)?;

        let created = ActionLog::record(ActionType::CreateStaff, operator).with_payload(
            serde_json::json!({
                "staff_id": result.staff_id,
                "staff_name": result.full_name,
                "staff_role": new_staff.staff_role.to_db_str(),
            }),
        );
        self.write_log(&created);
        self.log_resolution(&result, entry_index, false, operator);
        Ok(result)
    }

    fn log_resolution(&self, result: &MatchResult, entry_index: usize, duplicate: bool, operator: &str) {
        let log = ActionLog::record(ActionType::ResolveEntry, operator).with_payload(serde_json::json!({
            "entry_index": entry_index,
            "abbreviated_name": result.abbreviated_name,
            "staff_id": result.staff_id,
            "duplicate": duplicate,
        }));
        self.write_log(&log);
    }

    // ==========================================
    // correlation
    // ==========================================

    /// Confirm the queue and bind every detail to its exam session
    ///
    /// Fails with `Unresolved` while entries are still open; nothing is
    /// written in that case.
    pub fn confirm_and_correlate(&self, queue: ResolutionQueue, operator: &str) -> ApiResult<CorrelationReport> {
        let duplicates = queue.duplicates();
        if !duplicates.is_empty() {
            warn!(count = duplicates.len(), "duplicate staff usage in confirmed batch");
        }
        let confirmed = queue.confirm()?;
        Ok(self.correlate_confirmed(&confirmed, operator))
    }

    /// Correlate already confirmed results (e.g. an imported worksheet)
    pub fn correlate_confirmed(&self, results: &[MatchResult], operator: &str) -> CorrelationReport {
        self.correlate_confirmed_as(results, AssignmentRole::Invigilator, operator)
    }

    /// Correlate confirmed results, recording `role` as the duty on every assignment
    pub fn correlate_confirmed_as(
        &self,
        results: &[MatchResult],
        role: AssignmentRole,
        operator: &str,
    ) -> CorrelationReport {
        let correlator = SessionCorrelator::new(
            self.exam_repo.as_ref(),
            self.assignment_repo.as_ref(),
            operator,
        )
        .with_role(role);
        let report = correlator.correlate(results);

        let log = ActionLog::record(ActionType::CorrelateSchedule, operator).with_payload(
            serde_json::json!({
                "staff": results.len(),
                "role": role.to_db_str(),
                "created_or_updated_sessions": report.created_or_updated_sessions,
                "unmatched_details": report.unmatched_details.len(),
            }),
        );
        self.write_log(&log);

        report
    }

    // ==========================================
    // worksheet
    // ==========================================

    pub fn export_worksheet<P: AsRef<Path>>(&self, results: &[MatchResult], path: P) -> ApiResult<usize> {
        Ok(worksheet::export_worksheet(results, path)?)
    }

    pub fn import_worksheet<P: AsRef<Path>>(&self, path: P) -> ApiResult<Vec<MatchResult>> {
        let results = worksheet::import_worksheet(path)?;
        info!(staff = results.len(), "worksheet ready for correlation");
        Ok(results)
    }

    fn write_log(&self, log: &ActionLog) {
        if let Err(e) = self.action_log_repo.insert(log) {
            warn!(error = %e, action = %log.action_type, "failed to write action log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_manager::{config_keys, ConfigManager};
    use crate::db::init_schema;
    use crate::domain::exam::{ExamSession, UnmatchedReason};
    use crate::domain::types::{MatchSource, StaffRole};
    use chrono::NaiveDate;
    use rusqlite::Connection;
    use std::sync::Mutex;

    struct Fixture {
        api: InvigilatorApi,
        staff_repo: Arc<StaffRepository>,
        exam_repo: Arc<ExamRepository>,
        assignment_repo: Arc<AssignmentRepository>,
        config: Arc<ConfigManager>,
    }

    fn setup() -> Fixture {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));

        let staff_repo = Arc::new(StaffRepository::from_connection(conn.clone()));
        let exam_repo = Arc::new(ExamRepository::from_connection(conn.clone()));
        let assignment_repo = Arc::new(AssignmentRepository::from_connection(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));
        let config = Arc::new(ConfigManager::from_connection(conn).unwrap());

        let api = InvigilatorApi::new(
            staff_repo.clone(),
            exam_repo.clone(),
            assignment_repo.clone(),
            action_log_repo,
            config.clone(),
        );
        Fixture {
            api,
            staff_repo,
            exam_repo,
            assignment_repo,
            config,
        }
    }

    fn seed_session(fx: &Fixture, date: NaiveDate) {
        let session = ExamSession {
            exam_id: "e1".to_string(),
            exam_name_id: None,
            exam_code: Some("CS101".to_string()),
            venue: "SMA".to_string(),
            date,
            start_time: "9:00am".to_string(),
            end_time: "12:00pm".to_string(),
            year: None,
        };
        fx.exam_repo.create_schedule("First Semester", &[session]).unwrap();
    }

    const PAYLOAD: &str = r#"[
        {"Invigilator": "J. Smith", "Date": "05/03/24", "Start Time": "9:00am", "End Time": "12:00pm", "Venue": "SMA"},
        {"Invigilator": "Q. Unknown", "Date": "05/03/24", "Start Time": "9:00am", "End Time": "12:00pm", "Venue": "SMA"}
    ]"#;

    #[tokio::test]
    async fn test_match_uses_invigilator_roster() {
        let fx = setup();
        fx.staff_repo.create(&NewStaff::new("John Smith", StaffRole::Lecturer)).unwrap();
        fx.staff_repo.create(&NewStaff::new("Jane Smith", StaffRole::Security)).unwrap();

        let outcome = fx.api.match_extracted_schedule(PAYLOAD, "admin").await.unwrap();
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].full_name, "John Smith");
        assert_eq!(outcome.unmatched.len(), 1);
        assert_eq!(outcome.unmatched[0].abbreviated_name, "Q. Unknown");
    }

    #[tokio::test]
    async fn test_configured_roles_change_the_roster() {
        let fx = setup();
        fx.staff_repo.create(&NewStaff::new("Jane Smith", StaffRole::Security)).unwrap();
        fx.config
            .set_config_value(config_keys::INVIGILATOR_ROLES, "Security")
            .unwrap();

        let outcome = fx.api.match_extracted_schedule(PAYLOAD, "admin").await.unwrap();
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].full_name, "Jane Smith");
    }

    #[tokio::test]
    async fn test_malformed_payload_is_upload_failed() {
        let fx = setup();
        let result = fx.api.match_extracted_schedule("{\"oops\": 1}", "admin").await;
        assert!(matches!(result, Err(ApiError::UploadFailed)));
    }

    #[tokio::test]
    async fn test_resolve_confirm_and_correlate() {
        let fx = setup();
        seed_session(&fx, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        fx.staff_repo.create(&NewStaff::new("John Smith", StaffRole::Lecturer)).unwrap();

        let mut queue = fx.api.open_resolution_queue(PAYLOAD, "admin").await.unwrap();
        assert!(matches!(
            fx.api.confirm_and_correlate(queue.clone(), "admin"),
            Err(ApiError::Unresolved(_))
        ));

        let created = fx
            .api
            .create_staff_and_resolve(&mut queue, 0, &NewStaff::new("Quincy Unknown", StaffRole::PhdStudent), "admin")
            .unwrap();
        assert_eq!(created.source, MatchSource::Manual);

        let report = fx.api.confirm_and_correlate(queue, "admin").unwrap();
        assert_eq!(report.created_or_updated_sessions, 2);
        assert!(report.unmatched_details.is_empty());
        assert_eq!(fx.assignment_repo.find_by_exam("e1").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_session_is_reported() {
        let fx = setup();
        fx.staff_repo.create(&NewStaff::new("John Smith", StaffRole::Lecturer)).unwrap();

        let outcome = fx.api.match_extracted_schedule(PAYLOAD, "admin").await.unwrap();
        let report = fx.api.correlate_confirmed(&outcome.matched, "admin");

        assert_eq!(report.created_or_updated_sessions, 0);
        assert_eq!(report.unmatched_details.len(), 1);
        assert_eq!(report.unmatched_details[0].reason, UnmatchedReason::NoSession);
    }

    #[tokio::test]
    async fn test_worksheet_round_trip_feeds_correlation() {
        let fx = setup();
        seed_session(&fx, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        fx.staff_repo.create(&NewStaff::new("John Smith", StaffRole::Lecturer)).unwrap();
        let outcome = fx.api.match_extracted_schedule(PAYLOAD, "admin").await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confirmed.csv");
        assert_eq!(fx.api.export_worksheet(&outcome.matched, &path).unwrap(), 1);

        let imported = fx.api.import_worksheet(&path).unwrap();
        let report = fx.api.correlate_confirmed(&imported, "admin");
        assert_eq!(report.created_or_updated_sessions, 1);
    }

    #[tokio::test]
    async fn test_correlation_records_the_requested_role() {
        let fx = setup();
        seed_session(&fx, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        fx.staff_repo.create(&NewStaff::new("John Smith", StaffRole::Lecturer)).unwrap();
        let outcome = fx.api.match_extracted_schedule(PAYLOAD, "admin").await.unwrap();

        let report = fx
            .api
            .correlate_confirmed_as(&outcome.matched, AssignmentRole::Security, "admin");
        assert_eq!(report.created_or_updated_sessions, 1);

        let rows = fx.assignment_repo.find_by_exam("e1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role, AssignmentRole::Security);

        // the default entry point records invigilators
        fx.api.correlate_confirmed(&outcome.matched, "admin");
        let rows = fx.assignment_repo.find_by_exam("e1").unwrap();
        assert_eq!(rows[0].role, AssignmentRole::Invigilator);
    }
}
