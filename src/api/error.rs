// ==========================================
// Exam Ops - API Error Types
// ==========================================
// Converts lower-layer errors into messages fit for
// the operator. Extraction failures collapse into one
// generic upload-failed message.
// ==========================================

use crate::engine::error::ResolutionError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// Message shown for any extractor payload that cannot be used
pub const UPLOAD_FAILED_MESSAGE: &str = "An error occurred while uploading the schedule.";

/// API layer errors
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Uploads
    // ==========================================
    #[error("{}", UPLOAD_FAILED_MESSAGE)]
    UploadFailed,

    #[error("the exam schedule has already been uploaded: {0}")]
    DuplicateUpload(String),

    // ==========================================
    // Business rules
    // ==========================================
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("business rule violated: {0}")]
    BusinessRuleViolation(String),

    #[error("unresolved entries remain: {0}")]
    Unresolved(String),

    // ==========================================
    // Data access
    // ==========================================
    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database transaction failed: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // Import / config
    // ==========================================
    #[error("file import failed: {0}")]
    ImportError(String),

    #[error("validation failed: {0}")]
    ValidationError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    // ==========================================
    // General
    // ==========================================
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => ApiError::DatabaseTransactionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("failed to acquire database lock: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("duplicate record: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("referenced record missing: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("field {}: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// Worksheet imports keep the row-numbered detail; extractor payloads
// are mapped to UploadFailed at the call site instead.
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::MissingField { .. } | ImportError::DateFormatError { .. } => {
                ApiError::ValidationError(err.to_string())
            }
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<ResolutionError> for ApiError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::EntryOutOfRange { .. } | ResolutionError::MatchedOutOfRange { .. } => {
                ApiError::InvalidInput(err.to_string())
            }
            ResolutionError::UnknownStaff(staff_id) => {
                ApiError::NotFound(format!("staff (id={})", staff_id))
            }
            ResolutionError::Unsettled { .. } => ApiError::Unresolved(err.to_string()),
            ResolutionError::Directory(repo_err) => ApiError::from(repo_err),
        }
    }
}

/// Result alias
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_failed_is_generic() {
        assert_eq!(ApiError::UploadFailed.to_string(), UPLOAD_FAILED_MESSAGE);
    }

    #[test]
    fn test_repository_errors_are_translated() {
        let err: ApiError = RepositoryError::UniqueConstraintViolation("exam_name".to_string()).into();
        assert!(matches!(err, ApiError::BusinessRuleViolation(_)));

        let err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert!(matches!(err, ApiError::DatabaseConnectionError(_)));
    }

    #[test]
    fn test_resolution_errors_are_translated() {
        let err: ApiError = ResolutionError::Unsettled {
            resolved: 1,
            unmatched: 3,
        }
        .into();
        assert!(matches!(err, ApiError::Unresolved(_)));

        let err: ApiError = ResolutionError::UnknownStaff("s9".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg.contains("s9")));
    }

    #[test]
    fn test_worksheet_errors_keep_row_numbers() {
        let err: ApiError = ImportError::MissingField {
            row: 4,
            field: "End Time".to_string(),
        }
        .into();
        assert!(err.to_string().contains("row 4"));
    }
}
