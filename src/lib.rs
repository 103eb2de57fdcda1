// ==========================================
// Exam Ops - Core Library
// ==========================================
// Invigilator timetable matching and exam session
// correlation over SQLite
// Stack: Rust + SQLite + tokio
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Engine layer - matching, resolution, correlation
pub mod engine;

// Import layer - extractor payloads and worksheets
pub mod importer;

// Configuration layer
pub mod config;

// Database infrastructure (connection setup / schema)
pub mod db;

// Logging
pub mod logging;

// API layer - business entry points
pub mod api;

// Application layer - shared state
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    ActionLog, ActionType, CorrelationReport, ExamSession, ExtractedEntry, MatchOutcome,
    MatchResult, ScheduleDetail, StaffRecord,
};

pub use engine::{AbbreviationMatcher, MatcherConfig, ResolutionQueue, SessionCorrelator};

pub use api::{ApiError, AttendanceApi, ExamApi, InvigilatorApi, StaffApi};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Exam Ops";
