// ==========================================
// Exam Ops - Matching Config Reader Trait
// ==========================================
// Read-only configuration needed by the matching pipeline.
// Red line: no config writes, no matching logic
// ==========================================

use crate::domain::types::StaffRole;
use crate::engine::matcher::MatcherConfig;
use async_trait::async_trait;
use std::error::Error;

/// Result alias for config reads
pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// MatchConfigReader Trait
// ==========================================
// Implementor: ConfigManager (config_kv table)
#[async_trait]
pub trait MatchConfigReader: Send + Sync {
    /// Skip trailing single-letter tokens when picking the surname
    ///
    /// # Default
    /// - true
    async fn get_skip_initial_surname_tokens(&self) -> ConfigResult<bool>;

    /// Fuzzy fallback threshold (0-100)
    ///
    /// # Default
    /// - None (fallback disabled)
    async fn get_fuzzy_threshold(&self) -> ConfigResult<Option<u8>>;

    /// Roles whose staff form the invigilator roster
    ///
    /// # Default
    /// - the invigilators category
    async fn get_invigilator_roles(&self) -> ConfigResult<Vec<StaffRole>>;

    /// Assemble the matcher configuration from the individual keys
    async fn load_matcher_config(&self) -> ConfigResult<MatcherConfig> {
        Ok(MatcherConfig {
            skip_initial_surname_tokens: self.get_skip_initial_surname_tokens().await?,
            fuzzy_threshold: self.get_fuzzy_threshold().await?,
        })
    }
}
