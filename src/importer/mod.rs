// ==========================================
// Exam Ops - Import Layer
// ==========================================
// Role: turn external payloads into domain values
// Supports: extractor JSON, worksheet CSV / Excel
// ==========================================

pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod schedule_parser;
pub mod worksheet;

pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};
pub use schedule_parser::{parse_exam_schedule_upload, parse_extracted_schedule, parse_staff_directory};
pub use worksheet::{export_worksheet, import_worksheet, write_worksheet};
