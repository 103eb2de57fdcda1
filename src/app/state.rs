// ==========================================
// Exam Ops - Application State
// ==========================================
// Owns the shared database connection and wires
// repositories, config and API instances together
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{AttendanceApi, ExamApi, InvigilatorApi, StaffApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{
    ActionLogRepository, AssignmentRepository, ExamRepository, StaffRepository,
};

/// Application state
///
/// One SQLite connection shared by every repository.
pub struct AppState {
    pub db_path: String,

    pub staff_api: Arc<StaffApi>,
    pub exam_api: Arc<ExamApi>,
    pub invigilator_api: Arc<InvigilatorApi>,
    pub attendance_api: Arc<AttendanceApi>,

    pub config_manager: Arc<ConfigManager>,
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// Open (and if needed create) the database, then build every API
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "initializing application state");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("failed to open database: {}", e))?;
        init_schema(&conn).map_err(|e| format!("failed to initialize schema: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // repositories
        // ==========================================
        let staff_repo = Arc::new(StaffRepository::from_connection(conn.clone()));
        let exam_repo = Arc::new(ExamRepository::from_connection(conn.clone()));
        let assignment_repo = Arc::new(AssignmentRepository::from_connection(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("failed to create ConfigManager: {}", e))?,
        );

        // ==========================================
        // APIs
        // ==========================================
        let staff_api = Arc::new(StaffApi::new(staff_repo.clone(), action_log_repo.clone()));
        let exam_api = Arc::new(ExamApi::new(exam_repo.clone(), action_log_repo.clone()));
        let invigilator_api = Arc::new(InvigilatorApi::new(
            staff_repo,
            exam_repo,
            assignment_repo.clone(),
            action_log_repo.clone(),
            config_manager.clone(),
        ));
        let attendance_api = Arc::new(AttendanceApi::new(assignment_repo, action_log_repo.clone()));

        tracing::info!("application state ready");

        Ok(Self {
            db_path,
            staff_api,
            exam_api,
            invigilator_api,
            attendance_api,
            config_manager,
            action_log_repo,
        })
    }
}

/// Default database location
///
/// `EXAM_OPS_DB_PATH` wins when set; otherwise the user data directory
/// (a separate `-dev` directory in debug builds), falling back to the
/// working directory.
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("EXAM_OPS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./exam_ops.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("exam-ops-dev");
        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("exam-ops");

        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("exam_ops.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_new_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("state.db").to_string_lossy().to_string();

        let state = AppState::new(db_path.clone()).unwrap();
        assert!(state.exam_api.list_exam_names().unwrap().is_empty());

        // reopening an existing database is fine
        drop(state);
        assert!(AppState::new(db_path).is_ok());
    }
}
