// ==========================================
// Exam Ops - Command Line
// ==========================================
// Database: EXAM_OPS_DB_PATH or the user data directory
// Operator recorded in the action log: EXAM_OPS_OPERATOR (default "cli")
// ==========================================

use clap::{Parser, Subcommand};
use exam_ops::domain::{AssignmentRole, AttendanceStatus};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "exam-ops", version)]
#[command(about = "Invigilator timetable matching and exam session correlation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log as JSON lines (also enabled by EXAM_OPS_LOG_JSON)
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Create the database and apply the schema
    InitDb,

    /// Sync the staff directory from a JSON export
    SyncStaff {
        /// Staff directory JSON
        path: PathBuf,
    },

    /// Upload an exam timetable
    UploadExams {
        /// Exam schedule JSON
        path: PathBuf,
    },

    /// Match an extracted invigilator timetable against the roster
    Match {
        /// Extractor JSON
        path: PathBuf,
    },

    /// Match a timetable and write the result as a review worksheet
    ExportWorksheet {
        /// Extractor JSON
        input: PathBuf,

        /// Worksheet to write (.csv)
        out: PathBuf,
    },

    /// Correlate a reviewed worksheet onto exam sessions
    Correlate {
        /// Worksheet (.csv / .xlsx)
        worksheet: PathBuf,

        /// Duty recorded on the assignments
        #[arg(long, default_value = "invigilator", value_parser = parse_role)]
        role: AssignmentRole,
    },

    /// Record attendance for an assignment
    Attendance {
        assignment_id: String,

        /// present / absent / late / none
        #[arg(value_parser = parse_status)]
        status: StatusArg,
    },

    /// Print the configuration snapshot
    ConfigGet,

    /// Set a configuration value
    ConfigSet { key: String, value: String },
}

/// Attendance status argument; "none" clears the status
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusArg(pub Option<AttendanceStatus>);

fn parse_status(value: &str) -> Result<StatusArg, String> {
    if value.trim().eq_ignore_ascii_case("none") {
        return Ok(StatusArg(None));
    }
    AttendanceStatus::from_db_str(value)
        .map(|status| StatusArg(Some(status)))
        .ok_or_else(|| format!("unknown attendance status: {}", value))
}

fn parse_role(value: &str) -> Result<AssignmentRole, String> {
    let wanted = value.trim().replace('-', "_");
    [
        AssignmentRole::Invigilator,
        AssignmentRole::Security,
        AssignmentRole::Nurse,
        AssignmentRole::ItSupport,
        AssignmentRole::Administrative,
    ]
    .into_iter()
    .find(|role| role.to_db_str().eq_ignore_ascii_case(&wanted))
    .ok_or_else(|| format!("unknown assignment role: {}", value))
}
