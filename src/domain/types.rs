// ==========================================
// Exam Ops - Domain Types
// ==========================================
// Staff roles, roster categories, assignment roles,
// attendance states and match provenance
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Staff Role
// ==========================================
// Stored as the display string (e.g. "Part-Time Lecturer")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StaffRole {
    #[serde(rename = "Lecturer")]
    Lecturer,
    #[serde(rename = "Part-Time Lecturer")]
    PartTimeLecturer,
    #[serde(rename = "PhD Student")]
    PhdStudent,
    #[serde(rename = "Librarian")]
    Librarian,
    #[serde(rename = "Security")]
    Security,
    #[serde(rename = "Nurse")]
    Nurse,
    #[serde(rename = "Ambulance")]
    Ambulance,
    #[serde(rename = "IT Support")]
    ItSupport,
    #[serde(rename = "Administrative")]
    Administrative,
    #[serde(rename = "Other")]
    Other,
}

impl StaffRole {
    pub const ALL: [StaffRole; 10] = [
        StaffRole::Lecturer,
        StaffRole::PartTimeLecturer,
        StaffRole::PhdStudent,
        StaffRole::Librarian,
        StaffRole::Security,
        StaffRole::Nurse,
        StaffRole::Ambulance,
        StaffRole::ItSupport,
        StaffRole::Administrative,
        StaffRole::Other,
    ];

    /// Database / display representation
    pub fn to_db_str(&self) -> &'static str {
        match self {
            StaffRole::Lecturer => "Lecturer",
            StaffRole::PartTimeLecturer => "Part-Time Lecturer",
            StaffRole::PhdStudent => "PhD Student",
            StaffRole::Librarian => "Librarian",
            StaffRole::Security => "Security",
            StaffRole::Nurse => "Nurse",
            StaffRole::Ambulance => "Ambulance",
            StaffRole::ItSupport => "IT Support",
            StaffRole::Administrative => "Administrative",
            StaffRole::Other => "Other",
        }
    }

    /// Parse a stored role; matching is case-insensitive, unknown roles map to `Other`
    pub fn from_db_str(value: &str) -> Self {
        let wanted = value.trim();
        StaffRole::ALL
            .iter()
            .copied()
            .find(|role| role.to_db_str().eq_ignore_ascii_case(wanted))
            .unwrap_or(StaffRole::Other)
    }

    /// Strict parse used for configuration values
    pub fn parse_strict(value: &str) -> Option<Self> {
        let wanted = value.trim();
        StaffRole::ALL
            .iter()
            .copied()
            .find(|role| role.to_db_str().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Staff Category
// ==========================================
// Roster tabs; each category filters the directory by a role set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StaffCategory {
    Invigilators,
    Security,
    Nurses,
    ItSupport,
    Administrative,
}

impl StaffCategory {
    /// Roles included in this category
    pub fn roles(&self) -> &'static [StaffRole] {
        match self {
            StaffCategory::Invigilators => &[
                StaffRole::Lecturer,
                StaffRole::PartTimeLecturer,
                StaffRole::PhdStudent,
                StaffRole::Other,
            ],
            StaffCategory::Security => &[StaffRole::Security],
            StaffCategory::Nurses => &[StaffRole::Nurse],
            StaffCategory::ItSupport => &[StaffRole::ItSupport],
            StaffCategory::Administrative => &[StaffRole::Administrative, StaffRole::Other],
        }
    }

    /// Parse the category id used by callers ("invigilators", "itSupport", ...)
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim() {
            "invigilators" => Some(StaffCategory::Invigilators),
            "security" => Some(StaffCategory::Security),
            "nurses" => Some(StaffCategory::Nurses),
            "itSupport" => Some(StaffCategory::ItSupport),
            "administrative" => Some(StaffCategory::Administrative),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            StaffCategory::Invigilators => "invigilators",
            StaffCategory::Security => "security",
            StaffCategory::Nurses => "nurses",
            StaffCategory::ItSupport => "itSupport",
            StaffCategory::Administrative => "administrative",
        }
    }
}

impl fmt::Display for StaffCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

// ==========================================
// Assignment Role
// ==========================================
// Which duty a staff member holds in an exam session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentRole {
    Invigilator,
    Security,
    Nurse,
    ItSupport,
    Administrative,
}

impl AssignmentRole {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AssignmentRole::Invigilator => "INVIGILATOR",
            AssignmentRole::Security => "SECURITY",
            AssignmentRole::Nurse => "NURSE",
            AssignmentRole::ItSupport => "IT_SUPPORT",
            AssignmentRole::Administrative => "ADMINISTRATIVE",
        }
    }

    pub fn from_db_str(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "SECURITY" => AssignmentRole::Security,
            "NURSE" => AssignmentRole::Nurse,
            "IT_SUPPORT" => AssignmentRole::ItSupport,
            "ADMINISTRATIVE" => AssignmentRole::Administrative,
            _ => AssignmentRole::Invigilator,
        }
    }
}

impl fmt::Display for AssignmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Attendance Status
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "PRESENT",
            AttendanceStatus::Absent => "ABSENT",
            AttendanceStatus::Late => "LATE",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "PRESENT" => Some(AttendanceStatus::Present),
            "ABSENT" => Some(AttendanceStatus::Absent),
            "LATE" => Some(AttendanceStatus::Late),
            _ => None,
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Match Source
// ==========================================
// How a MatchResult was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    #[default]
    Surname,
    Fuzzy,
    Manual,
}
