// ==========================================
// Exam Ops - Configuration Layer
// ==========================================
// Storage: config_kv table
// ==========================================

pub mod config_manager;
pub mod match_config_trait;

pub use config_manager::{config_keys, ConfigManager};
pub use match_config_trait::{ConfigResult, MatchConfigReader};
