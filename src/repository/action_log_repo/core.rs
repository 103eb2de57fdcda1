use crate::domain::action_log::ActionLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub(super) const TS_FMT: &str = "%Y-%m-%d %H:%M:%S";

const INSERT_SQL: &str = r#"
    INSERT INTO action_log (
        action_id, action_type, action_ts, actor, payload_json, detail
    ) VALUES (?, ?, ?, ?, ?, ?)
"#;

// ==========================================
// ActionLogRepository
// ==========================================
// Red line: data mapping only
pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // writes
    // ==========================================

    /// Insert one log entry, returning its action_id
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        insert_with(&conn, log)?;
        Ok(log.action_id.clone())
    }

    /// Insert several entries in one transaction
    pub fn batch_insert(&self, logs: Vec<ActionLog>) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for log in &logs {
            insert_with(&tx, log)?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }
}

fn insert_with(conn: &Connection, log: &ActionLog) -> rusqlite::Result<usize> {
    conn.execute(
        INSERT_SQL,
        params![
            log.action_id,
            log.action_type,
            log.action_ts.format(TS_FMT).to_string(),
            log.actor,
            log.payload_json.as_ref().map(|v| v.to_string()),
            log.detail,
        ],
    )
}
