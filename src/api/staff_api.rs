// ==========================================
// Exam Ops - Staff API
// ==========================================
// Staff listing by category, one-off creation and
// directory synchronisation
// ==========================================

use std::sync::Arc;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::staff::{NewStaff, StaffRecord, StaffSyncSummary};
use crate::domain::types::StaffCategory;
use crate::importer::schedule_parser::parse_staff_directory;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::staff_repo::StaffRepository;
use crate::repository::StaffDirectory;

pub struct StaffApi {
    staff_repo: Arc<StaffRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl StaffApi {
    pub fn new(staff_repo: Arc<StaffRepository>, action_log_repo: Arc<ActionLogRepository>) -> Self {
        Self {
            staff_repo,
            action_log_repo,
        }
    }

    /// Staff whose role belongs to the given category ("invigilators", "security", ...)
    pub fn fetch_staff_details(&self, category_id: &str) -> ApiResult<Vec<StaffRecord>> {
        let category = StaffCategory::from_id(category_id.trim()).ok_or_else(|| {
            ApiError::InvalidInput(format!("unknown staff category: {}", category_id))
        })?;

        let staff = self.staff_repo.list_by_roles(category.roles())?;
        info!(category = %category, count = staff.len(), "fetched staff details");
        Ok(staff)
    }

    /// Create a single staff member
    pub fn create_staff(&self, new_staff: &NewStaff, operator: &str) -> ApiResult<StaffRecord> {
        let record = self.staff_repo.create(new_staff)?;

        let log = ActionLog::record(ActionType::CreateStaff, operator)
            .with_payload(serde_json::json!({
                "staff_id": record.staff_id,
                "staff_name": record.staff_name,
                "staff_role": record.staff_role.to_db_str(),
            }));
        self.write_log(&log);

        Ok(record)
    }

    /// Upsert a staff directory listing `[{Name, Position, Department}]`
    pub fn sync_staff_directory(&self, raw_json: &str, operator: &str) -> ApiResult<StaffSyncSummary> {
        let entries = parse_staff_directory(raw_json)?;
        let summary = self.staff_repo.sync_directory(&entries)?;

        let log = ActionLog::record(ActionType::SyncStaffDirectory, operator)
            .with_payload(serde_json::json!({
                "entries": entries.len(),
                "created": summary.created,
                "updated": summary.updated,
            }));
        self.write_log(&log);

        Ok(summary)
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
    use crate::db::init_schema;
    use crate::domain::types::StaffRole;
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn setup() -> (StaffApi, Arc<ActionLogRepository>) {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));
        let api = StaffApi::new(
            Arc::new(StaffRepository::from_connection(conn)),
            action_log_repo.clone(),
        );
        (api, action_log_repo)
    }

    #[test]
    fn test_fetch_by_category() {
        let (api, _) = setup();
        api.create_staff(&NewStaff::new("John Smith", StaffRole::Lecturer), "admin")
            .unwrap();
        api.create_staff(&NewStaff::new("Ama Ofori", StaffRole::Security), "admin")
            .unwrap();

        let invigilators = api.fetch_staff_details("invigilators").unwrap();
        assert_eq!(invigilators.len(), 1);
        assert_eq!(invigilators[0].staff_name, "John Smith");

        assert!(matches!(
            api.fetch_staff_details("janitors"),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_sync_directory_logs_summary() {
        let (api, logs) = setup();
        let raw = r#"[
            {"Name": "John Smith", "Position": "Lecturer"},
            {"Name": "Ama Ofori", "Position": "Senior Lecturer", "Department": "Maths"}
        ]"#;

        let summary = api.sync_staff_directory(raw, "admin").unwrap();
        assert_eq!(summary, StaffSyncSummary { created: 2, updated: 0 });

        let again = api.sync_staff_directory(raw, "admin").unwrap();
        assert_eq!(again, StaffSyncSummary { created: 0, updated: 2 });

        let entries = logs.find_by_action_type("SYNC_STAFF_DIRECTORY", 10).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_blank_name_is_invalid_input() {
        let (api, _) = setup();
        let result = api.create_staff(&NewStaff::new("   ", StaffRole::Lecturer), "admin");
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }
}
