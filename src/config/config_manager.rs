// ==========================================
// Exam Ops - Config Manager
// ==========================================
// Storage: config_kv table (key-value + scope)
// Only the 'global' scope is read
// ==========================================

use crate::config::match_config_trait::{ConfigResult, MatchConfigReader};
use crate::db::open_sqlite_connection;
use crate::domain::types::{StaffCategory, StaffRole};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Wrap an existing connection; the shared PRAGMAs are re-applied (idempotent)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn.lock().map_err(|e| format!("lock failed: {}", e))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn lock(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        Ok(self.conn.lock().map_err(|e| format!("lock failed: {}", e))?)
    }

    /// Read a global config value
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.lock()?;
        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Write (insert or overwrite) a global config value
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// All global config values as a JSON object string, keys sorted
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// MatchConfigReader implementation
// ==========================================
#[async_trait]
impl MatchConfigReader for ConfigManager {
    async fn get_skip_initial_surname_tokens(&self) -> ConfigResult<bool> {
        let Some(value) = self.get_global_config_value(config_keys::SKIP_INITIAL_SURNAME_TOKENS)? else {
            return Ok(true);
        };
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => {
                warn!(
                    config_key = config_keys::SKIP_INITIAL_SURNAME_TOKENS,
                    raw_value = %value,
                    "unrecognized boolean, using default"
                );
                Ok(true)
            }
        }
    }

    async fn get_fuzzy_threshold(&self) -> ConfigResult<Option<u8>> {
        let value = self
            .get_global_config_value(config_keys::FUZZY_THRESHOLD)?
            .unwrap_or_default();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        match trimmed.parse::<u8>() {
            Ok(threshold) if threshold <= 100 => Ok(Some(threshold)),
            _ => {
                warn!(
                    config_key = config_keys::FUZZY_THRESHOLD,
                    raw_value = %value,
                    "threshold must be 0-100, fuzzy fallback disabled"
                );
                Ok(None)
            }
        }
    }

    async fn get_invigilator_roles(&self) -> ConfigResult<Vec<StaffRole>> {
        let default_roles = StaffCategory::Invigilators.roles().to_vec();
        let Some(value) = self.get_global_config_value(config_keys::INVIGILATOR_ROLES)? else {
            return Ok(default_roles);
        };

        let mut roles = Vec::new();
        for raw in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match StaffRole::parse_strict(raw) {
                Some(role) if !roles.contains(&role) => roles.push(role),
                Some(_) => {}
                None => warn!(config_key = config_keys::INVIGILATOR_ROLES, role = raw, "unknown role ignored"),
            }
        }

        if roles.is_empty() {
            Ok(default_roles)
        } else {
            Ok(roles)
        }
    }
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    pub const SKIP_INITIAL_SURNAME_TOKENS: &str = "matcher/skip_initial_surname_tokens";
    pub const FUZZY_THRESHOLD: &str = "matcher/fuzzy_threshold";
    pub const INVIGILATOR_ROLES: &str = "roster/invigilator_roles";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_without_rows() {
        let config = setup();
        let matcher = config.load_matcher_config().await.unwrap();
        assert!(matcher.skip_initial_surname_tokens);
        assert_eq!(matcher.fuzzy_threshold, None);
        assert_eq!(
            config.get_invigilator_roles().await.unwrap(),
            StaffCategory::Invigilators.roles().to_vec()
        );
    }

    #[tokio::test]
    async fn test_values_are_read_back() {
        let config = setup();
        config.set_config_value(config_keys::SKIP_INITIAL_SURNAME_TOKENS, "off").unwrap();
        config.set_config_value(config_keys::FUZZY_THRESHOLD, " 75 ").unwrap();
        config
            .set_config_value(config_keys::INVIGILATOR_ROLES, "Lecturer, librarian, Dean, Lecturer")
            .unwrap();

        let matcher = config.load_matcher_config().await.unwrap();
        assert!(!matcher.skip_initial_surname_tokens);
        assert_eq!(matcher.fuzzy_threshold, Some(75));
        assert_eq!(
            config.get_invigilator_roles().await.unwrap(),
            vec![StaffRole::Lecturer, StaffRole::Librarian]
        );
    }

    #[tokio::test]
    async fn test_bad_values_fall_back() {
        let config = setup();
        config.set_config_value(config_keys::SKIP_INITIAL_SURNAME_TOKENS, "maybe").unwrap();
        config.set_config_value(config_keys::FUZZY_THRESHOLD, "250").unwrap();
        config.set_config_value(config_keys::INVIGILATOR_ROLES, "Dean").unwrap();

        assert!(config.get_skip_initial_surname_tokens().await.unwrap());
        assert_eq!(config.get_fuzzy_threshold().await.unwrap(), None);
        assert_eq!(config.get_invigilator_roles().await.unwrap().len(), 4);
    }

    #[test]
    fn test_set_overwrites_and_snapshot_is_sorted() {
        let config = setup();
        config.set_config_value("b", "1").unwrap();
        config.set_config_value("a", "2").unwrap();
        config.set_config_value("b", "3").unwrap();

        assert_eq!(config.get_global_config_value("b").unwrap().as_deref(), Some("3"));
        assert_eq!(config.get_config_snapshot().unwrap(), r#"{"a":"2","b":"3"}"#);
    }
}
