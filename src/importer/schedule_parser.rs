// ==========================================
// Exam Ops - Extractor Payload Parser
// ==========================================
// JSON produced by the PDF timetable extractors.
// Invigilator timetables arrive either grouped
//   [{"Invigilator": "J. Smith", "Details": [{...}, ...]}]
// or flat, one row per session
//   [{"Invigilator": "J. Smith", "Date": ..., "Start Time": ...}]
// Both become ExtractedEntry lists grouped by name in
// first-appearance order.
// ==========================================

use crate::domain::exam::ExamScheduleUpload;
use crate::domain::schedule::{ExtractedEntry, ScheduleDetail};
use crate::domain::staff::StaffDirectoryEntry;
use crate::importer::error::{ImportError, ImportResult};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use tracing::debug;

const NAME_KEY: &str = "Invigilator";
const DETAILS_KEY: &str = "Details";

/// Parse invigilator timetable JSON (grouped or flat) into extracted entries
pub fn parse_extracted_schedule(raw: &str) -> ImportResult<Vec<ExtractedEntry>> {
    let payload: JsonValue = serde_json::from_str(raw)?;
    let items = payload.as_array().ok_or_else(|| ImportError::PayloadShapeError {
        index: 0,
        message: "expected a JSON array".to_string(),
    })?;

    let mut entries: Vec<ExtractedEntry> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, item) in items.iter().enumerate() {
        let object = item.as_object().ok_or_else(|| ImportError::PayloadShapeError {
            index,
            message: "expected an object".to_string(),
        })?;

        let name = object
            .get(NAME_KEY)
            .and_then(JsonValue::as_str)
            .map(str::trim)
            .ok_or_else(|| ImportError::PayloadShapeError {
                index,
                message: format!("missing string field {:?}", NAME_KEY),
            })?
            .to_string();

        let details = match object.get(DETAILS_KEY) {
            Some(JsonValue::Array(rows)) => rows
                .iter()
                .map(|row| parse_detail(row.clone(), index))
                .collect::<ImportResult<Vec<_>>>()?,
            Some(_) => {
                return Err(ImportError::PayloadShapeError {
                    index,
                    message: format!("{:?} must be an array", DETAILS_KEY),
                })
            }
            None => vec![parse_flat_row(object, index)?],
        };

        match positions.get(&name) {
            Some(&pos) => entries[pos].details.extend(details),
            None => {
                positions.insert(name.clone(), entries.len());
                entries.push(ExtractedEntry::new(name, details));
            }
        }
    }

    debug!(items = items.len(), entries = entries.len(), "parsed extracted schedule");
    Ok(entries)
}

fn parse_flat_row(object: &Map<String, JsonValue>, index: usize) -> ImportResult<ScheduleDetail> {
    let mut row = object.clone();
    row.remove(NAME_KEY);
    parse_detail(JsonValue::Object(row), index)
}

fn parse_detail(value: JsonValue, index: usize) -> ImportResult<ScheduleDetail> {
    serde_json::from_value(value).map_err(|e| ImportError::PayloadShapeError {
        index,
        message: e.to_string(),
    })
}

/// Parse the exam timetable extractor output `{exam_name, exams_schedule}`
pub fn parse_exam_schedule_upload(raw: &str) -> ImportResult<ExamScheduleUpload> {
    let upload: ExamScheduleUpload = serde_json::from_str(raw)?;
    if upload.exam_name.trim().is_empty() {
        return Err(ImportError::MissingField {
            row: 0,
            field: "exam_name".to_string(),
        });
    }
    Ok(upload)
}

/// Parse a staff directory listing `[{Name, Position, Department}]`
pub fn parse_staff_directory(raw: &str) -> ImportResult<Vec<StaffDirectoryEntry>> {
    Ok(serde_json::from_str(raw)?)
}
