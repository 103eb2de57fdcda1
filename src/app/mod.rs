// ==========================================
// Exam Ops - Application Layer
// ==========================================
// Role: assemble the shared state used by the CLI
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState};
