// ==========================================
// Exam Ops - Repository Traits
// ==========================================
// Data access seams used by the engine layer.
// Implemented by the SQLite repositories; tests substitute
// in-memory versions.
// ==========================================

use crate::domain::exam::{ExamSession, UpsertOutcome};
use crate::domain::staff::{NewStaff, StaffRecord};
use crate::domain::types::{AssignmentRole, StaffRole};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDate;

// ==========================================
// StaffDirectory
// ==========================================
// Implementor: StaffRepository
pub trait StaffDirectory: Send + Sync {
    /// Staff whose role is in `roles`, in insertion order
    fn list_by_roles(&self, roles: &[StaffRole]) -> RepositoryResult<Vec<StaffRecord>>;

    fn find_by_id(&self, staff_id: &str) -> RepositoryResult<Option<StaffRecord>>;

    /// Create a staff record; the directory assigns the id
    fn create(&self, new_staff: &NewStaff) -> RepositoryResult<StaffRecord>;
}

// ==========================================
// ExamSessionStore
// ==========================================
// Implementor: ExamRepository
pub trait ExamSessionStore: Send + Sync {
    /// Sessions on `date` whose normalized start/end labels equal the given ones
    fn find_by_slot(
        &self,
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
    ) -> RepositoryResult<Vec<ExamSession>>;
}

// ==========================================
// AssignmentStore
// ==========================================
// Implementor: AssignmentRepository
pub trait AssignmentStore: Send + Sync {
    /// Insert or refresh the assignment keyed by (exam_id, staff_id, venue)
    fn upsert(
        &self,
        exam_id: &str,
        staff_id: &str,
        venue: &str,
        role: AssignmentRole,
        assigned_by: &str,
    ) -> RepositoryResult<UpsertOutcome>;
}
