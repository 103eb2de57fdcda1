// ==========================================
// Exam Ops - Import Error Types
// ==========================================
// Tool: thiserror derive
// Covers extractor JSON, worksheet CSV/XLSX and date parsing
// ==========================================

use thiserror::Error;

/// Import errors
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== Files =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (expected .xlsx/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("failed to read file: {0}")]
    FileReadError(String),

    #[error("failed to parse Excel file: {0}")]
    ExcelParseError(String),

    #[error("failed to parse CSV: {0}")]
    CsvParseError(String),

    #[error("failed to write CSV: {0}")]
    CsvWriteError(String),

    // ===== Extractor payload =====
    #[error("malformed extractor output: {0}")]
    JsonParseError(String),

    #[error("unexpected payload shape (item {index}): {message}")]
    PayloadShapeError { index: usize, message: String },

    // ===== Field values =====
    #[error("missing required field (row {row}): {field}")]
    MissingField { row: usize, field: String },

    #[error("bad date (row {row}, field {field}): expected DD/MM/YY, got {value:?}")]
    DateFormatError {
        row: usize,
        field: String,
        value: String,
    },

    // ===== General =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;
