// ==========================================
// Exam Ops - Data Repository Layer
// ==========================================
// Red line: repositories hold no matching or correlation logic
// ==========================================
// Role: data access behind parameterized SQL
// ==========================================

pub mod action_log_repo;
pub mod assignment_repo;
pub mod error;
pub mod exam_repo;
pub mod staff_repo;
pub mod traits;

pub use action_log_repo::ActionLogRepository;
pub use assignment_repo::AssignmentRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use exam_repo::ExamRepository;
pub use staff_repo::StaffRepository;
pub use traits::{AssignmentStore, ExamSessionStore, StaffDirectory};
