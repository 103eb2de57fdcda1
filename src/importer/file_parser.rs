// ==========================================
// Exam Ops - File Parser
// ==========================================
// Reads tabular worksheets into header-keyed rows
// Supports: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// One non-blank data row
///
/// `row_number` is the 1-based sheet row (the header is row 1), so error
/// messages point at the line a user sees in a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub row_number: usize,
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    /// Trimmed value of a column; missing columns read as ""
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>>;
}

fn check_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn push_row(records: &mut Vec<RawRecord>, row_number: usize, fields: HashMap<String, String>) {
    // fully blank rows are skipped
    if fields.values().all(|v| v.is_empty()) {
        return;
    }
    records.push(RawRecord { row_number, fields });
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        check_exists(file_path)?;

        if let Some(ext) = file_path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(ext.to_string_lossy().to_string()));
            }
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // rows may be shorter than the header
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let fields: HashMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.clone(), value.trim().to_string()))
                .collect();
            push_row(&mut records, row_idx + 2, fields);
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser
// ==========================================
// First worksheet only
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        check_exists(file_path)?;

        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("workbook has no sheets".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("worksheet has no header row".to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(cell_text)
            .collect();

        let mut records = Vec::new();
        for (row_idx, data_row) in rows.enumerate() {
            let fields: HashMap<String, String> = headers
                .iter()
                .zip(data_row.iter())
                .map(|(header, cell)| (header.clone(), cell_text(cell)))
                .collect();
            push_row(&mut records, row_idx + 2, fields);
        }

        Ok(records)
    }
}

/// Trimmed display text of a cell
///
/// Date-formatted cells are stored as serial numbers; they are rendered as
/// timetable dates (dd/mm/yy) so they read the same as a CSV worksheet.
fn cell_text(cell: &Data) -> String {
    let text = match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(date) => DataCleaner.format_timetable_date(date),
            None => cell.to_string(),
        },
        _ => cell.to_string(),
    };
    text.trim().to_string()
}

// ==========================================
// UniversalFileParser - picks a parser by extension
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRecord>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
