// ==========================================
// Exam Ops - Session Assignment & Attendance Repository
// ==========================================
// session_assignment is keyed by (exam_id, staff_id, venue);
// re-running a correlation refreshes rows instead of duplicating.
// attendance holds at most one row per assignment.
// ==========================================

use crate::domain::exam::{Attendance, SessionAssignment, UpsertOutcome};
use crate::domain::types::{AssignmentRole, AttendanceStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::AssignmentStore;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const TS_FMT: &str = "%Y-%m-%d %H:%M:%S";

const ASSIGNMENT_COLUMNS: &str =
    "assignment_id, exam_id, staff_id, venue, role, assigned_by, assigned_at";

// ==========================================
// AssignmentRepository
// ==========================================
pub struct AssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssignmentRepository {
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

    pub fn find_by_id(&self, assignment_id: &str) -> RepositoryResult<Option<SessionAssignment>> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                &format!(
                    "SELECT {} FROM session_assignment WHERE assignment_id = ?1",
                    ASSIGNMENT_COLUMNS
                ),
                params![assignment_id],
                map_assignment,
            )
            .optional()?;
        Ok(found)
    }

    pub fn find_by_exam(&self, exam_id: &str) -> RepositoryResult<Vec<SessionAssignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM session_assignment WHERE exam_id = ?1 ORDER BY rowid",
            ASSIGNMENT_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![exam_id], map_assignment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn find_by_staff(&self, staff_id: &str) -> RepositoryResult<Vec<SessionAssignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM session_assignment WHERE staff_id = ?1 ORDER BY rowid",
            ASSIGNMENT_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![staff_id], map_assignment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM session_assignment", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ==========================================
    // attendance
    // ==========================================

    /// Record (or overwrite) the attendance status of an assignment
    ///
    /// `status = None` stores an explicit "not yet taken".
    pub fn take_attendance(
        &self,
        assignment_id: &str,
        status: Option<AttendanceStatus>,
        recorded_by: &str,
    ) -> RepositoryResult<Attendance> {
        let recorded_at = chrono::Utc::now().naive_utc();
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO attendance (attendance_id, assignment_id, status, recorded_by, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(assignment_id) DO UPDATE SET
                status = excluded.status,
                recorded_by = excluded.recorded_by,
                recorded_at = excluded.recorded_at
            "#,
            params![
                uuid::Uuid::new_v4().to_string(),
                assignment_id,
                status.map(|s| s.to_db_str()),
                recorded_by,
                recorded_at.format(TS_FMT).to_string(),
            ],
        )?;

        conn.query_row(
            "SELECT attendance_id, assignment_id, status, recorded_by, recorded_at \
             FROM attendance WHERE assignment_id = ?1",
            params![assignment_id],
            map_attendance,
        )
        .map_err(RepositoryError::from)
    }

    pub fn find_attendance(&self, assignment_id: &str) -> RepositoryResult<Option<Attendance>> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT attendance_id, assignment_id, status, recorded_by, recorded_at \
                 FROM attendance WHERE assignment_id = ?1",
                params![assignment_id],
                map_attendance,
            )
            .optional()?;
        Ok(found)
    }
}

impl AssignmentStore for AssignmentRepository {
    fn upsert(
        &self,
        exam_id: &str,
        staff_id: &str,
        venue: &str,
        role: AssignmentRole,
        assigned_by: &str,
    ) -> RepositoryResult<UpsertOutcome> {
        let assigned_at = chrono::Utc::now().naive_utc().format(TS_FMT).to_string();
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT assignment_id FROM session_assignment \
                 WHERE exam_id = ?1 AND staff_id = ?2 AND venue = ?3",
                params![exam_id, staff_id, venue],
                |row| row.get(0),
            )
            .optional()?;

        let outcome = match existing {
            Some(assignment_id) => {
                tx.execute(
                    "UPDATE session_assignment SET role = ?1, assigned_by = ?2, assigned_at = ?3 \
                     WHERE assignment_id = ?4",
                    params![role.to_db_str(), assigned_by, assigned_at, assignment_id],
                )?;
                UpsertOutcome::Updated
            }
            None => {
                tx.execute(
                    &format!(
                        "INSERT INTO session_assignment ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                        ASSIGNMENT_COLUMNS
                    ),
                    params![
                        uuid::Uuid::new_v4().to_string(),
                        exam_id,
                        staff_id,
                        venue,
                        role.to_db_str(),
                        assigned_by,
                        assigned_at,
                    ],
                )?;
                UpsertOutcome::Inserted
            }
        };

        tx.commit()?;
        Ok(outcome)
    }
}

// ==========================================
// helpers
// ==========================================

fn parse_ts(idx: usize, raw: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TS_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn map_assignment(row: &Row) -> rusqlite::Result<SessionAssignment> {
    let role: String = row.get(4)?;
    let assigned_at: String = row.get(6)?;
    Ok(SessionAssignment {
        assignment_id: row.get(0)?,
        exam_id: row.get(1)?,
        staff_id: row.get(2)?,
        venue: row.get(3)?,
        role: AssignmentRole::from_db_str(&role),
        assigned_by: row.get(5)?,
        assigned_at: parse_ts(6, &assigned_at)?,
    })
}

fn map_attendance(row: &Row) -> rusqlite::Result<Attendance> {
    let status: Option<String> = row.get(2)?;
    let recorded_at: String = row.get(4)?;
    Ok(Attendance {
        attendance_id: row.get(0)?,
        assignment_id: row.get(1)?,
        status: status.as_deref().and_then(AttendanceStatus::from_db_str),
        recorded_by: row.get(3)?,
        recorded_at: parse_ts(4, &recorded_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Arc<Mutex<Connection>>, AssignmentRepository) {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO staff (staff_id, staff_name, staff_role) VALUES ('s1', 'John Smith', 'Lecturer');
            INSERT INTO staff (staff_id, staff_name, staff_role) VALUES ('s2', 'Ama Ofori', 'Lecturer');
            INSERT INTO exam (exam_id, venue, exam_date, start_time, end_time)
                VALUES ('e1', 'SMA', '2024-03-05', '9:00am', '12:00pm');
            "#,
        )
        .unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let repo = AssignmentRepository::from_connection(conn.clone());
        (conn, repo)
    }

    #[test]
    fn test_upsert_is_idempotent_per_key() {
        let (_conn, repo) = setup();

        let first = repo.upsert("e1", "s1", "SMA", AssignmentRole::Invigilator, "admin").unwrap();
        let second = repo.upsert("e1", "s1", "SMA", AssignmentRole::Invigilator, "clerk").unwrap();
        assert_eq!(first, UpsertOutcome::Inserted);
        assert_eq!(second, UpsertOutcome::Updated);

        let rows = repo.find_by_exam("e1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].assigned_by, "clerk");
    }

    #[test]
    fn test_venue_is_part_of_the_key() {
        let (_conn, repo) = setup();
        repo.upsert("e1", "s1", "SMA", AssignmentRole::Invigilator, "admin").unwrap();
        repo.upsert("e1", "s1", "PG BLOCK A", AssignmentRole::Invigilator, "admin").unwrap();
        repo.upsert("e1", "s2", "SMA", AssignmentRole::Invigilator, "admin").unwrap();

        assert_eq!(repo.count().unwrap(), 3);
        assert_eq!(repo.find_by_staff("s1").unwrap().len(), 2);
    }

    #[test]
    fn test_upsert_unknown_exam_is_foreign_key_error() {
        let (_conn, repo) = setup();
        let err = repo
            .upsert("missing", "s1", "SMA", AssignmentRole::Invigilator, "admin")
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
    }

    #[test]
    fn test_take_attendance_overwrites() {
        let (_conn, repo) = setup();
        repo.upsert("e1", "s1", "SMA", AssignmentRole::Invigilator, "admin").unwrap();
        let assignment_id = repo.find_by_exam("e1").unwrap()[0].assignment_id.clone();

        assert!(repo.find_attendance(&assignment_id).unwrap().is_none());

        let first = repo
            .take_attendance(&assignment_id, Some(AttendanceStatus::Late), "chief")
            .unwrap();
        let second = repo
            .take_attendance(&assignment_id, Some(AttendanceStatus::Present), "chief")
            .unwrap();

        assert_eq!(first.attendance_id, second.attendance_id);
        assert_eq!(second.status, Some(AttendanceStatus::Present));

        let cleared = repo.take_attendance(&assignment_id, None, "chief").unwrap();
        assert_eq!(cleared.status, None);
    }
}
