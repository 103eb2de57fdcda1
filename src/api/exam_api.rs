// ==========================================
// Exam Ops - Exam Schedule API
// ==========================================
// Stores exam timetables produced by the extractor.
// Each timetable name can be uploaded once; its rows
// become the sessions the correlator binds against.
// ==========================================

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::exam::{ExamName, ExamScheduleRow, ExamSession};
use crate::engine::normalizer::normalize_time_label;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::schedule_parser::parse_exam_schedule_upload;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::error::RepositoryError;
use crate::repository::exam_repo::ExamRepository;

/// Result of storing one exam timetable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamUploadSummary {
    pub exam_name: ExamName,
    pub sessions: usize,
}

pub struct ExamApi {
    exam_repo: Arc<ExamRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl ExamApi {
    pub fn new(exam_repo: Arc<ExamRepository>, action_log_repo: Arc<ActionLogRepository>) -> Self {
        Self {
            exam_repo,
            action_log_repo,
        }
    }

    /// Store an exam timetable `{exam_name, exams_schedule}`
    ///
    /// Times are normalized before insert so they line up with the
    /// labels the correlator looks up. A name that already exists is
    /// rejected and nothing is stored.
    pub fn upload_exam_schedule(&self, raw_json: &str, operator: &str) -> ApiResult<ExamUploadSummary> {
        let upload = parse_exam_schedule_upload(raw_json).map_err(|e| {
            warn!(error = %e, "exam schedule payload rejected");
            ApiError::UploadFailed
        })?;
        let exam_name = upload.exam_name.trim().to_string();

        if self.exam_repo.find_exam_name(&exam_name)?.is_some() {
            return Err(ApiError::DuplicateUpload(exam_name));
        }

        let sessions = upload
            .exams_schedule
            .iter()
            .enumerate()
            .map(|(i, row)| build_session(row, i + 1))
            .collect::<ApiResult<Vec<_>>>()?;

        let stored = match self.exam_repo.create_schedule(&exam_name, &sessions) {
            Ok(name) => name,
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                return Err(ApiError::DuplicateUpload(exam_name))
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            exam_name = %stored.exam_name,
            sessions = sessions.len(),
            "exam schedule stored"
        );

        let log = ActionLog::record(ActionType::UploadExamSchedule, operator).with_payload(
            serde_json::json!({
                "exam_name_id": stored.exam_name_id,
                "exam_name": stored.exam_name,
                "sessions": sessions.len(),
            }),
        );
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "failed to write action log");
        }

        Ok(ExamUploadSummary {
            exam_name: stored,
            sessions: sessions.len(),
        })
    }

    pub fn list_exam_names(&self) -> ApiResult<Vec<ExamName>> {
        Ok(self.exam_repo.list_exam_names()?)
    }

    /// Sessions of one stored timetable
    pub fn get_exam_schedule(&self, exam_name_id: &str) -> ApiResult<Vec<ExamSession>> {
        if exam_name_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("exam_name_id must not be empty".to_string()));
        }
        Ok(self.exam_repo.find_by_exam_name(exam_name_id)?)
    }
}

fn build_session(row: &ExamScheduleRow, row_number: usize) -> ApiResult<ExamSession> {
    let cleaner = DataCleaner;
    let date = cleaner
        .parse_timetable_date(&row.date, row_number)
        .map_err(|e| {
            warn!(error = %e, "exam schedule row rejected");
            ApiError::UploadFailed
        })?;

    Ok(ExamSession {
        exam_id: uuid::Uuid::new_v4().to_string(),
        exam_name_id: None,
        exam_code: cleaner.normalize_null(row.course_code.clone()),
        venue: cleaner.clean_text(&row.venue, false),
        date,
        start_time: normalize_time_label(&row.start_time),
        end_time: normalize_time_label(&row.end_time),
        year: cleaner.normalize_null(row.year.clone()),
    })
}
