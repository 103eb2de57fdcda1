// ==========================================
// Exam Ops - Engine Error Types
// ==========================================
// Tool: thiserror derive
// No-match is not an error; only misuse of the resolution
// queue and collaborator failures surface here
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// Manual resolution queue errors
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("unmatched entry index out of range: {index} (queue holds {len})")]
    EntryOutOfRange { index: usize, len: usize },

    #[error("matched entry index out of range: {index} (batch holds {len})")]
    MatchedOutOfRange { index: usize, len: usize },

    #[error("staff member not found in roster: staff_id={0}")]
    UnknownStaff(String),

    #[error("resolution incomplete: {resolved} of {unmatched} entries resolved")]
    Unsettled { resolved: usize, unmatched: usize },

    #[error("staff directory failure: {0}")]
    Directory(#[from] RepositoryError),
}

/// Result alias
pub type ResolutionResult<T> = Result<T, ResolutionError>;
