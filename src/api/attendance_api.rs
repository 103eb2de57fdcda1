// ==========================================
// Exam Ops - Attendance API
// ==========================================

use std::sync::Arc;
use tracing::warn;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::exam::{Attendance, SessionAssignment};
use crate::domain::types::AttendanceStatus;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::assignment_repo::AssignmentRepository;

pub struct AttendanceApi {
    assignment_repo: Arc<AssignmentRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl AttendanceApi {
    pub fn new(assignment_repo: Arc<AssignmentRepository>, action_log_repo: Arc<ActionLogRepository>) -> Self {
        Self {
            assignment_repo,
            action_log_repo,
        }
    }

    /// Assignments of one exam session, for the attendance sheet
    pub fn list_session_assignments(&self, exam_id: &str) -> ApiResult<Vec<SessionAssignment>> {
        Ok(self.assignment_repo.find_by_exam(exam_id)?)
    }

    /// Record (or overwrite) attendance for an assignment
    pub fn take_attendance(
        &self,
        assignment_id: &str,
        status: Option<AttendanceStatus>,
        operator: &str,
    ) -> ApiResult<Attendance> {
        if self.assignment_repo.find_by_id(assignment_id)?.is_none() {
            return Err(ApiError::NotFound(format!("assignment (id={})", assignment_id)));
        }

        let attendance = self
            .assignment_repo
            .take_attendance(assignment_id, status, operator)?;

        let log = ActionLog::record(ActionType::TakeAttendance, operator).with_payload(
            serde_json::json!({
                "assignment_id": assignment_id,
                "status": status.map(|s| s.to_db_str()),
            }),
        );
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "failed to write action log");
        }

        Ok(attendance)
    }

    pub fn get_attendance(&self, assignment_id: &str) -> ApiResult<Option<Attendance>> {
        Ok(self.assignment_repo.find_attendance(assignment_id)?)
    }
}
