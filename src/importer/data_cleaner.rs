// ==========================================
// Exam Ops - Data Cleaner
// ==========================================
// TRIM / NULL normalization and timetable date parsing
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use chrono::NaiveDate;

pub struct DataCleaner;

impl DataCleaner {
    pub fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    /// Blank strings become None
    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// Parse a timetable date "DD/MM/YY" (always 20YY)
    ///
    /// Four-digit years are taken as written. Never locale dependent.
    pub fn parse_timetable_date(&self, value: &str, row: usize) -> ImportResult<NaiveDate> {
        let bad = || ImportError::DateFormatError {
            row,
            field: "Date".to_string(),
            value: value.to_string(),
        };

        let parts: Vec<&str> = value.trim().split('/').map(str::trim).collect();
        let [day, month, year] = parts.as_slice() else {
            return Err(bad());
        };

        let day: u32 = day.parse().map_err(|_| bad())?;
        let month: u32 = month.parse().map_err(|_| bad())?;
        let year: i32 = match year.len() {
            2 => 2000 + year.parse::<i32>().map_err(|_| bad())?,
            4 => year.parse().map_err(|_| bad())?,
            _ => return Err(bad()),
        };

        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad)
    }

    /// Inverse of `parse_timetable_date` for exports
    pub fn format_timetable_date(&self, date: NaiveDate) -> String {
        date.format("%d/%m/%y").to_string()
    }
}
