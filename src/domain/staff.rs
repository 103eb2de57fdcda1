// ==========================================
// Exam Ops - Staff Domain Model
// ==========================================
// Staff directory records consumed by the matcher
// and created during manual resolution
// ==========================================

use crate::domain::types::StaffRole;
use serde::{Deserialize, Serialize};

// ==========================================
// StaffRecord - staff directory row
// ==========================================
// staff_name is the full canonical name; read-only input to the matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub staff_id: String,
    pub staff_name: String,
    pub staff_role: StaffRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

// ==========================================
// NewStaff - attributes for a staff member not yet in the directory
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStaff {
    pub staff_name: String,
    pub staff_role: StaffRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl NewStaff {
    pub fn new(staff_name: impl Into<String>, staff_role: StaffRole) -> Self {
        Self {
            staff_name: staff_name.into(),
            staff_role,
            department: None,
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }
}

// ==========================================
// StaffDirectoryEntry - row of an external staff listing
// ==========================================
// Field names follow the directory scraper output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffDirectoryEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Department", default)]
    pub department: Option<String>,
}

/// Outcome of syncing an external staff listing into the directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSyncSummary {
    pub created: usize,
    pub updated: usize,
}
