// ==========================================
// Exam Ops - Exam Session Domain Model
// ==========================================
// Exam sessions, staff assignments, attendance and
// correlation output
// ==========================================

use crate::domain::schedule::ScheduleDetail;
use crate::domain::types::{AssignmentRole, AttendanceStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// ExamName - one uploaded exam timetable
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamName {
    pub exam_name_id: String,
    pub exam_name: String,
}

// ==========================================
// ExamSession - a scheduled exam slot
// ==========================================
// Looked up by the correlator, never created by it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSession {
    pub exam_id: String,
    pub exam_name_id: Option<String>,
    pub exam_code: Option<String>, // comma / slash separated course codes
    pub venue: String,             // comma separated venues
    pub date: NaiveDate,
    pub start_time: String, // normalized time label, e.g. "9:00am"
    pub end_time: String,
    pub year: Option<String>,
}

impl ExamSession {
    /// Individual course codes, split on "," and "/"
    pub fn course_codes(&self) -> Vec<String> {
        self.exam_code
            .as_deref()
            .map(split_course_codes)
            .unwrap_or_default()
    }
}

/// Split a course code cell such as "CS101/CS102, MA201" into its codes
pub fn split_course_codes(raw: &str) -> Vec<String> {
    raw.split(',')
        .flat_map(|code| code.split('/'))
        .map(|part| part.trim().to_uppercase())
        .filter(|part| !part.is_empty())
        .collect()
}

// ==========================================
// ExamScheduleUpload - exam timetable extractor output
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamScheduleUpload {
    pub exam_name: String,
    pub exams_schedule: Vec<ExamScheduleRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamScheduleRow {
    #[serde(rename = "Date")]
    pub date: String, // DD/MM/YY
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Time")]
    pub end_time: String,
    #[serde(rename = "Course Code", default)]
    pub course_code: Option<String>,
    #[serde(rename = "Venue", default)]
    pub venue: String,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
}

// ==========================================
// SessionAssignment - staff bound to an exam session at a venue
// ==========================================
// Unique on (exam_id, staff_id, venue)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAssignment {
    pub assignment_id: String,
    pub exam_id: String,
    pub staff_id: String,
    pub venue: String,
    pub role: AssignmentRole,
    pub assigned_by: String,
    pub assigned_at: NaiveDateTime,
}

/// Whether an upsert created or refreshed an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

// ==========================================
// Attendance - one status per assignment
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub attendance_id: String,
    pub assignment_id: String,
    pub status: Option<AttendanceStatus>,
    pub recorded_by: String,
    pub recorded_at: NaiveDateTime,
}

// ==========================================
// Correlation output
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedReason {
    NoSession,
    InvalidDate,
    PersistenceFailed,
}

/// A detail that could not be bound to a session and needs manual entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedDetail {
    #[serde(flatten)]
    pub detail: ScheduleDetail,
    pub staff_id: String,
    pub staff_name: String,
    pub reason: UnmatchedReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    #[serde(rename = "createdOrUpdatedSessions")]
    pub created_or_updated_sessions: usize,
    #[serde(rename = "unmatchedDetails")]
    pub unmatched_details: Vec<UnmatchedDetail>,
}
