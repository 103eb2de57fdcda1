// ==========================================
// Exam Ops - Invigilator Schedule Domain Model
// ==========================================
// Extracted timetable entries, match results and
// the unmatched queue payload
// ==========================================

use crate::domain::types::MatchSource;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

// ==========================================
// ScheduleDetail - one timetable row for an invigilator
// ==========================================
// Field names follow the PDF extractor output.
// Unknown columns are kept verbatim in `extra` so details survive
// matching and resolution unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDetail {
    #[serde(rename = "Date")]
    pub date: String, // DD/MM/YY
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Time")]
    pub end_time: String,
    #[serde(rename = "Venue", default)]
    pub venue: String,
    #[serde(rename = "Course Code", default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

impl ScheduleDetail {
    pub fn new(
        date: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        venue: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            venue: venue.into(),
            course_code: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_course_code(mut self, code: impl Into<String>) -> Self {
        self.course_code = Some(code.into());
        self
    }
}

// ==========================================
// ExtractedEntry - one abbreviated invigilator name and its sessions
// ==========================================
// Transient; consumed once by the matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntry {
    pub abbreviated_name: String,
    pub details: Vec<ScheduleDetail>,
}

impl ExtractedEntry {
    pub fn new(abbreviated_name: impl Into<String>, details: Vec<ScheduleDetail>) -> Self {
        Self {
            abbreviated_name: abbreviated_name.into(),
            details,
        }
    }
}

// ==========================================
// MatchResult - an extracted entry bound to a staff record
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub staff_id: String,
    pub full_name: String,
    pub abbreviated_name: String,
    pub details: Vec<ScheduleDetail>,
    #[serde(default)]
    pub source: MatchSource,
}

// ==========================================
// UnmatchedEntry - awaiting manual resolution
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedEntry {
    pub abbreviated_name: String,
    pub details: Vec<ScheduleDetail>,
}

impl From<ExtractedEntry> for UnmatchedEntry {
    fn from(entry: ExtractedEntry) -> Self {
        Self {
            abbreviated_name: entry.abbreviated_name,
            details: entry.details,
        }
    }
}

// ==========================================
// MatchOutcome - matcher output handed to the resolution UI
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    #[serde(rename = "matchedData")]
    pub matched: Vec<MatchResult>,
    #[serde(rename = "unmatchedData")]
    pub unmatched: Vec<UnmatchedEntry>,
}

impl MatchOutcome {
    /// Number of entries accounted for in either list
    pub fn total(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_keeps_unknown_columns() {
        let raw = r#"{"Date":"05/03/24","Start Time":"9:00am","End Time":"12:00pm","Venue":"PG BLOCK A","Year":"3"}"#;
        let detail: ScheduleDetail = serde_json::from_str(raw).unwrap();
        assert_eq!(detail.date, "05/03/24");
        assert_eq!(detail.course_code, None);
        assert_eq!(detail.extra.get("Year"), Some(&JsonValue::from("3")));

        let back = serde_json::to_value(&detail).unwrap();
        assert_eq!(back["Year"], "3");
        assert_eq!(back["Start Time"], "9:00am");
    }

    #[test]
    fn test_outcome_uses_camel_case_keys() {
        let outcome = MatchOutcome::default();
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("matchedData").is_some());
        assert!(json.get("unmatchedData").is_some());
    }
}
