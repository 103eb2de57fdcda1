// ==========================================
// Exam Ops - CLI Entry
// ==========================================
// exam-ops <command> [args]; see `exam-ops --help`
// ==========================================

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use exam_ops::app::{get_default_db_path, AppState};
use exam_ops::logging;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.json_logs || std::env::var("EXAM_OPS_LOG_JSON").is_ok() {
        logging::init_json();
    } else {
        logging::init();
    }

    let operator = std::env::var("EXAM_OPS_OPERATOR").unwrap_or_else(|_| "cli".to_string());
    let db_path = get_default_db_path();
    tracing::info!(version = exam_ops::VERSION, db_path = %db_path, command = ?cli.command, "{}", exam_ops::APP_NAME);

    let state = AppState::new(db_path)?;

    match cli.command {
        Command::InitDb => {
            println!("database ready: {}", state.db_path);
        }
        Command::SyncStaff { path } => {
            let raw = std::fs::read_to_string(path)?;
            let summary = state.staff_api.sync_staff_directory(&raw, &operator)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::UploadExams { path } => {
            let raw = std::fs::read_to_string(path)?;
            let summary = state.exam_api.upload_exam_schedule(&raw, &operator)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Match { path } => {
            let raw = std::fs::read_to_string(path)?;
            let outcome = state
                .invigilator_api
                .match_extracted_schedule(&raw, &operator)
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::ExportWorksheet { input, out } => {
            let raw = std::fs::read_to_string(input)?;
            let outcome = state
                .invigilator_api
                .match_extracted_schedule(&raw, &operator)
                .await?;
            let rows = state.invigilator_api.export_worksheet(&outcome.matched, &out)?;
            println!("{} rows written to {}", rows, out.display());
            for entry in &outcome.unmatched {
                eprintln!("unmatched: {}", entry.abbreviated_name);
            }
        }
        Command::Correlate { worksheet, role } => {
            let results = state.invigilator_api.import_worksheet(worksheet)?;
            let report = state
                .invigilator_api
                .correlate_confirmed_as(&results, role, &operator);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Attendance { assignment_id, status } => {
            let attendance = state
                .attendance_api
                .take_attendance(&assignment_id, status.0, &operator)?;
            println!("{}", serde_json::to_string_pretty(&attendance)?);
        }
        Command::ConfigGet => {
            let snapshot = state
                .config_manager
                .get_config_snapshot()
                .map_err(|e| e.to_string())?;
            println!("{}", snapshot);
        }
        Command::ConfigSet { key, value } => {
            state
                .config_manager
                .set_config_value(&key, &value)
                .map_err(|e| e.to_string())?;
            println!("{} = {}", key, value);
        }
    }

    Ok(())
}
