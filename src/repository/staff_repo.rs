// ==========================================
// Exam Ops - Staff Directory Repository
// ==========================================
// Red line: data mapping only, no matching logic
// ==========================================

use crate::domain::exam::UpsertOutcome;
use crate::domain::staff::{NewStaff, StaffDirectoryEntry, StaffRecord, StaffSyncSummary};
use crate::domain::types::StaffRole;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::StaffDirectory;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use tracing::debug;

// ==========================================
// StaffRepository
// ==========================================
pub struct StaffRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StaffRepository {
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

    /// All staff in insertion order
    pub fn list_all(&self) -> RepositoryResult<Vec<StaffRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT staff_id, staff_name, staff_role, department FROM staff ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// First staff record carrying exactly this name
    pub fn find_by_name(&self, staff_name: &str) -> RepositoryResult<Option<StaffRecord>> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT staff_id, staff_name, staff_role, department FROM staff \
                 WHERE staff_name = ?1 ORDER BY rowid LIMIT 1",
                params![staff_name.trim()],
                map_row,
            )
            .optional()?;
        Ok(found)
    }

    /// Insert or update one directory listing row, keyed by name
    ///
    /// An existing record keeps its id and gets the listing's role and department.
    pub fn upsert_by_name(&self, entry: &StaffDirectoryEntry) -> RepositoryResult<(StaffRecord, UpsertOutcome)> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let result = upsert_entry(&tx, entry)?;
        tx.commit()?;
        Ok(result)
    }

    /// Sync a whole directory listing in one transaction
    ///
    /// Rows with a blank name are skipped.
    pub fn sync_directory(&self, entries: &[StaffDirectoryEntry]) -> RepositoryResult<StaffSyncSummary> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut summary = StaffSyncSummary::default();
        for entry in entries {
            if entry.name.trim().is_empty() {
                debug!(position = %entry.position, "skipping directory row without a name");
                continue;
            }
            match upsert_entry(&tx, entry)?.1 {
                UpsertOutcome::Inserted => summary.created += 1,
                UpsertOutcome::Updated => summary.updated += 1,
            }
        }

        tx.commit()?;
        Ok(summary)
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM staff", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl StaffDirectory for StaffRepository {
    fn list_by_roles(&self, roles: &[StaffRole]) -> RepositoryResult<Vec<StaffRecord>> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; roles.len()].join(", ");
        let sql = format!(
            "SELECT staff_id, staff_name, staff_role, department FROM staff \
             WHERE staff_role IN ({}) ORDER BY rowid",
            placeholders
        );

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(roles.iter().map(|r| r.to_db_str())), map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn find_by_id(&self, staff_id: &str) -> RepositoryResult<Option<StaffRecord>> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT staff_id, staff_name, staff_role, department FROM staff WHERE staff_id = ?1",
                params![staff_id],
                map_row,
            )
            .optional()?;
        Ok(found)
    }

    fn create(&self, new_staff: &NewStaff) -> RepositoryResult<StaffRecord> {
        let name = new_staff.staff_name.trim();
        if name.is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "staff_name".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        let record = StaffRecord {
            staff_id: uuid::Uuid::new_v4().to_string(),
            staff_name: name.to_string(),
            staff_role: new_staff.staff_role,
            department: new_staff.department.clone(),
        };

        let conn = self.get_conn()?;
        insert_record(&conn, &record)?;
        Ok(record)
    }
}

// ==========================================
// helpers
// ==========================================

fn map_row(row: &Row) -> rusqlite::Result<StaffRecord> {
    let role: String = row.get(2)?;
    Ok(StaffRecord {
        staff_id: row.get(0)?,
        staff_name: row.get(1)?,
        staff_role: StaffRole::from_db_str(&role),
        department: row.get(3)?,
    })
}

fn insert_record(conn: &Connection, record: &StaffRecord) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO staff (staff_id, staff_name, staff_role, department) VALUES (?1, ?2, ?3, ?4)",
        params![
            record.staff_id,
            record.staff_name,
            record.staff_role.to_db_str(),
            record.department,
        ],
    )?;
    Ok(())
}

fn upsert_entry(conn: &Connection, entry: &StaffDirectoryEntry) -> RepositoryResult<(StaffRecord, UpsertOutcome)> {
    let name = entry.name.trim();
    let role = StaffRole::from_db_str(&entry.position);
    let department = entry
        .department
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let existing: Option<String> = conn
        .query_row(
            "SELECT staff_id FROM staff WHERE staff_name = ?1 ORDER BY rowid LIMIT 1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;

    let record = StaffRecord {
        staff_id: existing
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        staff_name: name.to_string(),
        staff_role: role,
        department,
    };

    match existing {
        Some(_) => {
            conn.execute(
                "UPDATE staff SET staff_role = ?1, department = ?2, updated_at = datetime('now') \
                 WHERE staff_id = ?3",
                params![record.staff_role.to_db_str(), record.department, record.staff_id],
            )?;
            Ok((record, UpsertOutcome::Updated))
        }
        None => {
            insert_record(conn, &record)?;
            Ok((record, UpsertOutcome::Inserted))
        }
    }
}
