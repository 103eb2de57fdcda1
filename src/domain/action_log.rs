// ==========================================
// Exam Ops - Action Log Domain Model
// ==========================================
// Audit trail for uploads, resolutions, correlation
// and attendance changes
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

// ==========================================
// ActionLog - audit record
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,
    pub action_type: String, // stored as ActionType::to_db_str
    pub action_ts: NaiveDateTime,
    pub actor: String,
    pub payload_json: Option<JsonValue>,
    pub detail: Option<String>,
}

impl ActionLog {
    /// Build a log entry stamped with the current UTC time and a fresh id
    pub fn record(action_type: ActionType, actor: &str) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.to_db_str().to_string(),
            action_ts: chrono::Utc::now().naive_utc(),
            actor: actor.to_string(),
            payload_json: None,
            detail: None,
        }
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ==========================================
// ActionType
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    UploadExamSchedule,
    UploadInvigilatorSchedule,
    ResolveEntry,
    CreateStaff,
    SyncStaffDirectory,
    CorrelateSchedule,
    TakeAttendance,
}

impl ActionType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ActionType::UploadExamSchedule => "UPLOAD_EXAM_SCHEDULE",
            ActionType::UploadInvigilatorSchedule => "UPLOAD_INVIGILATOR_SCHEDULE",
            ActionType::ResolveEntry => "RESOLVE_ENTRY",
            ActionType::CreateStaff => "CREATE_STAFF",
            ActionType::SyncStaffDirectory => "SYNC_STAFF_DIRECTORY",
            ActionType::CorrelateSchedule => "CORRELATE_SCHEDULE",
            ActionType::TakeAttendance => "TAKE_ATTENDANCE",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
