// ==========================================
// Exam Ops - Exam Schedule Repository
// ==========================================
// exam_name + exam tables. Sessions are stored with
// normalized time labels; lookups compare them exactly.
// ==========================================

use crate::domain::exam::{ExamName, ExamSession};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::ExamSessionStore;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const DATE_FMT: &str = "%Y-%m-%d";

const SESSION_COLUMNS: &str =
    "exam_id, exam_name_id, exam_code, venue, exam_date, start_time, end_time, year";

// ==========================================
// ExamRepository
// ==========================================
pub struct ExamRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ExamRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // exam_name
    // ==========================================

    pub fn find_exam_name(&self, exam_name: &str) -> RepositoryResult<Option<ExamName>> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT exam_name_id, exam_name FROM exam_name WHERE exam_name = ?1",
                params![exam_name],
                |row| {
                    Ok(ExamName {
                        exam_name_id: row.get(0)?,
                        exam_name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(found)
    }

    pub fn list_exam_names(&self) -> RepositoryResult<Vec<ExamName>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT exam_name_id, exam_name FROM exam_name ORDER BY rowid")?;
        let names = stmt
            .query_map([], |row| {
                Ok(ExamName {
                    exam_name_id: row.get(0)?,
                    exam_name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Store a timetable name and its sessions in one transaction
    ///
    /// A duplicate name fails with `UniqueConstraintViolation` and stores nothing.
    /// Each session's `exam_name_id` is overwritten with the new name's id.
    pub fn create_schedule(&self, exam_name: &str, sessions: &[ExamSession]) -> RepositoryResult<ExamName> {
        let name = ExamName {
            exam_name_id: uuid::Uuid::new_v4().to_string(),
            exam_name: exam_name.trim().to_string(),
        };

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO exam_name (exam_name_id, exam_name) VALUES (?1, ?2)",
            params![name.exam_name_id, name.exam_name],
        )?;
        for session in sessions {
            insert_session(&tx, session, Some(&name.exam_name_id))?;
        }
        tx.commit()?;
        Ok(name)
    }

    // ==========================================
    // exam sessions
    // ==========================================

    pub fn insert_session(&self, session: &ExamSession) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_session(&conn, session, session.exam_name_id.as_deref())?;
        Ok(())
    }

    pub fn find_by_id(&self, exam_id: &str) -> RepositoryResult<Option<ExamSession>> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                &format!("SELECT {} FROM exam WHERE exam_id = ?1", SESSION_COLUMNS),
                params![exam_id],
                map_session,
            )
            .optional()?;
        Ok(found)
    }

    pub fn find_by_exam_name(&self, exam_name_id: &str) -> RepositoryResult<Vec<ExamSession>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM exam WHERE exam_name_id = ?1 ORDER BY exam_date, rowid",
            SESSION_COLUMNS
        ))?;
        let sessions = stmt
            .query_map(params![exam_name_id], map_session)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }

    /// Sessions with start <= date <= end, by date then store order
    pub fn list_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> RepositoryResult<Vec<ExamSession>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM exam WHERE exam_date BETWEEN ?1 AND ?2 ORDER BY exam_date, rowid",
            SESSION_COLUMNS
        ))?;
        let sessions = stmt
            .query_map(
                params![start.format(DATE_FMT).to_string(), end.format(DATE_FMT).to_string()],
                map_session,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }
}

impl ExamSessionStore for ExamRepository {
    fn find_by_slot(
        &self,
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
    ) -> RepositoryResult<Vec<ExamSession>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM exam WHERE exam_date = ?1 AND start_time = ?2 AND end_time = ?3 ORDER BY rowid",
            SESSION_COLUMNS
        ))?;
        let sessions = stmt
            .query_map(
                params![date.format(DATE_FMT).to_string(), start_time, end_time],
                map_session,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }
}

// ==========================================
// helpers
// ==========================================

fn insert_session(conn: &Connection, session: &ExamSession, exam_name_id: Option<&str>) -> rusqlite::Result<()> {
    conn.execute(
        r#"
        INSERT INTO exam (
            exam_id, exam_name_id, exam_code, venue, exam_date, start_time, end_time, year
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            session.exam_id,
            exam_name_id,
            session.exam_code,
            session.venue,
            session.date.format(DATE_FMT).to_string(),
            session.start_time,
            session.end_time,
            session.year,
        ],
    )?;
    Ok(())
}

fn map_session(row: &Row) -> rusqlite::Result<ExamSession> {
    let date_str: String = row.get(4)?;
    let date = NaiveDate::parse_from_str(&date_str, DATE_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(ExamSession {
        exam_id: row.get(0)?,
        exam_name_id: row.get(1)?,
        exam_code: row.get(2)?,
        venue: row.get(3)?,
        date,
        start_time: row.get(5)?,
        end_time: row.get(6)?,
        year: row.get(7)?,
    })
}
