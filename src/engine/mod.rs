// ==========================================
// Exam Ops - Engine Layer
// ==========================================
// Name normalization, abbreviation matching, the manual
// resolution queue and session correlation.
// Red line: engines never build SQL; persistence goes
// through the repository traits.
// ==========================================

pub mod correlator;
pub mod error;
pub mod matcher;
pub mod normalizer;
pub mod resolution;
pub mod similarity;

pub use correlator::SessionCorrelator;
pub use error::{ResolutionError, ResolutionResult};
pub use matcher::{AbbreviationMatcher, MatcherConfig};
pub use normalizer::{normalize_name, normalize_time_label};
pub use resolution::{DuplicateStaff, QueueRow, ResolutionQueue};
pub use similarity::token_set_ratio;
