// ==========================================
// Exam Ops - Domain Layer
// ==========================================
// Entities and value types only.
// No data access, no matching logic.
// ==========================================

pub mod action_log;
pub mod exam;
pub mod schedule;
pub mod staff;
pub mod types;

pub use action_log::{ActionLog, ActionType};
pub use exam::{
    Attendance, CorrelationReport, ExamName, ExamScheduleRow, ExamScheduleUpload, ExamSession,
    SessionAssignment, UnmatchedDetail, UnmatchedReason, UpsertOutcome,
};
pub use schedule::{ExtractedEntry, MatchOutcome, MatchResult, ScheduleDetail, UnmatchedEntry};
pub use staff::{NewStaff, StaffDirectoryEntry, StaffRecord, StaffSyncSummary};
pub use types::{AssignmentRole, AttendanceStatus, MatchSource, StaffCategory, StaffRole};
