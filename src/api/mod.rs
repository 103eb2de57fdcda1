// ==========================================
// Exam Ops - API Layer
// ==========================================
// Role: business entry points used by the CLI
// ==========================================

pub mod attendance_api;
pub mod error;
pub mod exam_api;
pub mod invigilator_api;
pub mod staff_api;

pub use attendance_api::AttendanceApi;
pub use error::{ApiError, ApiResult, UPLOAD_FAILED_MESSAGE};
pub use exam_api::{ExamApi, ExamUploadSummary};
pub use invigilator_api::InvigilatorApi;
pub use staff_api::StaffApi;
