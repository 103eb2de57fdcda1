// ==========================================
// Exam Ops - Session Correlator
// ==========================================
// Binds every detail of a confirmed match to an exam session
// by exact (date, start, end) slot and records the assignment.
// One bad detail never aborts the batch: it is reported back
// for manual entry with a reason.
// ==========================================

use crate::domain::exam::{
    split_course_codes, CorrelationReport, ExamSession, UnmatchedDetail, UnmatchedReason,
};
use crate::domain::schedule::{MatchResult, ScheduleDetail};
use crate::domain::types::AssignmentRole;
use crate::engine::normalizer::normalize_time_label;
use crate::importer::data_cleaner::DataCleaner;
use crate::repository::{AssignmentStore, ExamSessionStore};
use tracing::{debug, info, instrument, warn};

// ==========================================
// SessionCorrelator
// ==========================================
pub struct SessionCorrelator<'a> {
    sessions: &'a dyn ExamSessionStore,
    assignments: &'a dyn AssignmentStore,
    actor: String,
    role: AssignmentRole,
}

impl<'a> SessionCorrelator<'a> {
    pub fn new(
        sessions: &'a dyn ExamSessionStore,
        assignments: &'a dyn AssignmentStore,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            assignments,
            actor: actor.into(),
            role: AssignmentRole::Invigilator,
        }
    }

    /// Duty recorded on created assignments (default: invigilator)
    pub fn with_role(mut self, role: AssignmentRole) -> Self {
        self.role = role;
        self
    }

    /// Correlate confirmed results onto exam sessions
    ///
    /// `created_or_updated_sessions` counts successful upserts; every detail
    /// that did not produce one is in `unmatched_details`.
    #[instrument(skip_all, fields(results = results.len(), actor = %self.actor))]
    pub fn correlate(&self, results: &[MatchResult]) -> CorrelationReport {
        let mut report = CorrelationReport::default();

        for result in results {
            for detail in &result.details {
                match self.correlate_detail(result, detail) {
                    Ok(exam_id) => {
                        debug!(staff_id = %result.staff_id, %exam_id, "assignment recorded");
                        report.created_or_updated_sessions += 1;
                    }
                    Err(reason) => {
                        report.unmatched_details.push(UnmatchedDetail {
                            detail: detail.clone(),
                            staff_id: result.staff_id.clone(),
                            staff_name: result.full_name.clone(),
                            reason,
                        });
                    }
                }
            }
        }

        info!(
            upserts = report.created_or_updated_sessions,
            unmatched = report.unmatched_details.len(),
            "session correlation finished"
        );
        report
    }

    fn correlate_detail(&self, result: &MatchResult, detail: &ScheduleDetail) -> Result<String, UnmatchedReason> {
        let date = DataCleaner
            .parse_timetable_date(&detail.date, 0)
            .map_err(|_| {
                debug!(staff_id = %result.staff_id, date = %detail.date, "unparseable detail date");
                UnmatchedReason::InvalidDate
            })?;
        let start = normalize_time_label(&detail.start_time);
        let end = normalize_time_label(&detail.end_time);

        let candidates = self.sessions.find_by_slot(date, &start, &end).map_err(|e| {
            warn!(staff_id = %result.staff_id, error = %e, "session lookup failed");
            UnmatchedReason::PersistenceFailed
        })?;

        let session = pick_session(&candidates, detail.course_code.as_deref()).ok_or_else(|| {
            debug!(staff_id = %result.staff_id, %date, %start, %end, "no session for slot");
            UnmatchedReason::NoSession
        })?;

        let venue = if detail.venue.trim().is_empty() {
            session.venue.as_str()
        } else {
            detail.venue.trim()
        };

        self.assignments
            .upsert(&session.exam_id, &result.staff_id, venue, self.role, &self.actor)
            .map_err(|e| {
                warn!(
                    staff_id = %result.staff_id,
                    exam_id = %session.exam_id,
                    error = %e,
                    "assignment upsert failed"
                );
                UnmatchedReason::PersistenceFailed
            })?;

        Ok(session.exam_id.clone())
    }
}

/// Choose among sessions sharing a slot
///
/// A lone session always wins. With several, a detail carrying course codes
/// takes the first session whose codes overlap (none if no overlap); a
/// detail without codes takes the first session.
fn pick_session<'s>(sessions: &'s [ExamSession], course_code: Option<&str>) -> Option<&'s ExamSession> {
    if sessions.len() <= 1 {
        return sessions.first();
    }

    let wanted = course_code.map(split_course_codes).unwrap_or_default();
    if wanted.is_empty() {
        return sessions.first();
    }

    sessions
        .iter()
        .find(|session| session.course_codes().iter().any(|code| wanted.contains(code)))
}
