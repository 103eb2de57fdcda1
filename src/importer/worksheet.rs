// ==========================================
// Exam Ops - Confirmed Schedule Worksheet
// ==========================================
// Columns: Staff ID | Abbreviated Name | Full Name | Date |
//          Start Time | End Time | Course Code | Venue
// The first row of each staff member carries the staff
// columns; continuation rows leave them blank.
// ==========================================

use crate::domain::schedule::{MatchResult, ScheduleDetail};
use crate::domain::types::MatchSource;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const COL_STAFF_ID: &str = "Staff ID";
pub const COL_ABBREVIATED_NAME: &str = "Abbreviated Name";
pub const COL_FULL_NAME: &str = "Full Name";
pub const COL_DATE: &str = "Date";
pub const COL_START_TIME: &str = "Start Time";
pub const COL_END_TIME: &str = "End Time";
pub const COL_COURSE_CODE: &str = "Course Code";
pub const COL_VENUE: &str = "Venue";

pub const HEADERS: [&str; 8] = [
    COL_STAFF_ID,
    COL_ABBREVIATED_NAME,
    COL_FULL_NAME,
    COL_DATE,
    COL_START_TIME,
    COL_END_TIME,
    COL_COURSE_CODE,
    COL_VENUE,
];

// ==========================================
// export
// ==========================================

/// Write confirmed results as worksheet CSV
pub fn write_worksheet<W: Write>(results: &[MatchResult], writer: W) -> ImportResult<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADERS).map_err(write_err)?;

    let mut rows = 0;
    for result in results {
        if result.details.is_empty() {
            csv.write_record([
                result.staff_id.as_str(),
                result.abbreviated_name.as_str(),
                result.full_name.as_str(),
                "",
                "",
                "",
                "",
                "",
            ])
            .map_err(write_err)?;
            rows += 1;
            continue;
        }

        for (i, detail) in result.details.iter().enumerate() {
            let (staff_id, abbreviated, full) = if i == 0 {
                (
                    result.staff_id.as_str(),
                    result.abbreviated_name.as_str(),
                    result.full_name.as_str(),
                )
            } else {
                ("", "", "")
            };
            csv.write_record([
                staff_id,
                abbreviated,
                full,
                detail.date.as_str(),
                detail.start_time.as_str(),
                detail.end_time.as_str(),
                detail.course_code.as_deref().unwrap_or(""),
                detail.venue.as_str(),
            ])
            .map_err(write_err)?;
            rows += 1;
        }
    }

    csv.flush()?;
    Ok(rows)
}

/// Export confirmed results to a CSV file, returning the number of data rows
pub fn export_worksheet<P: AsRef<Path>>(results: &[MatchResult], path: P) -> ImportResult<usize> {
    let file = File::create(path.as_ref())?;
    let rows = write_worksheet(results, file)?;
    info!(path = %path.as_ref().display(), staff = results.len(), rows, "worksheet exported");
    Ok(rows)
}

fn write_err(err: csv::Error) -> ImportError {
    ImportError::CsvWriteError(err.to_string())
}

// ==========================================
// import
// ==========================================

/// Read a worksheet (CSV or XLSX) back into match results
///
/// Imported rows count as human-reviewed, so every result is `Manual`.
pub fn import_worksheet<P: AsRef<Path>>(path: P) -> ImportResult<Vec<MatchResult>> {
    let records = UniversalFileParser.parse(path.as_ref())?;
    let results = records_to_results(&records)?;
    info!(path = %path.as_ref().display(), staff = results.len(), "worksheet imported");
    Ok(results)
}

/// Fold worksheet rows into results, attaching continuation rows to the staff row above
pub fn records_to_results(records: &[RawRecord]) -> ImportResult<Vec<MatchResult>> {
    let cleaner = DataCleaner;
    let mut results: Vec<MatchResult> = Vec::new();

    for record in records {
        let staff_id = record.get(COL_STAFF_ID);
        if !staff_id.is_empty() {
            let full_name = required(record, COL_FULL_NAME)?;
            results.push(MatchResult {
                staff_id: staff_id.to_string(),
                full_name,
                abbreviated_name: record.get(COL_ABBREVIATED_NAME).to_string(),
                details: Vec::new(),
                source: MatchSource::Manual,
            });
            if detail_is_blank(record) {
                continue;
            }
        }

        let current = results.last_mut().ok_or_else(|| ImportError::MissingField {
            row: record.row_number,
            field: COL_STAFF_ID.to_string(),
        })?;
        current.details.push(parse_detail(&cleaner, record)?);
    }

    Ok(results)
}

fn detail_is_blank(record: &RawRecord) -> bool {
    [COL_DATE, COL_START_TIME, COL_END_TIME, COL_COURSE_CODE, COL_VENUE]
        .iter()
        .all(|col| record.get(col).is_empty())
}

fn required(record: &RawRecord, column: &str) -> ImportResult<String> {
    let value = record.get(column);
    if value.is_empty() {
        return Err(ImportError::MissingField {
            row: record.row_number,
            field: column.to_string(),
        });
    }
    Ok(value.to_string())
}

fn parse_detail(cleaner: &DataCleaner, record: &RawRecord) -> ImportResult<ScheduleDetail> {
    let date = required(record, COL_DATE)?;
    cleaner.parse_timetable_date(&date, record.row_number)?;

    let mut detail = ScheduleDetail::new(
        date,
        required(record, COL_START_TIME)?,
        required(record, COL_END_TIME)?,
        record.get(COL_VENUE),
    );
    detail.course_code = cleaner.normalize_null(Some(record.get(COL_COURSE_CODE).to_string()));
    Ok(detail)
}
