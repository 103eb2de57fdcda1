// ==========================================
// Exam Ops - Manual Resolution Queue
// ==========================================
// Holds entries the matcher could not place and the human
// choices made for them.
// Settled only when every unmatched entry has a resolution;
// duplicate staff usage is flagged, never rejected.
// ==========================================

use crate::domain::schedule::{MatchOutcome, MatchResult, UnmatchedEntry};
use crate::domain::staff::{NewStaff, StaffRecord};
use crate::domain::types::MatchSource;
use crate::engine::error::{ResolutionError, ResolutionResult};
use crate::repository::StaffDirectory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Position of a row in the batch under review
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "list", content = "index", rename_all = "snake_case")]
pub enum QueueRow {
    Matched(usize),
    Unmatched(usize),
}

/// A staff member bound to more than one row of the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateStaff {
    pub staff_id: String,
    pub rows: Vec<QueueRow>,
}

// ==========================================
// ResolutionQueue
// ==========================================
#[derive(Debug, Clone)]
pub struct ResolutionQueue {
    matched: Vec<MatchResult>,
    unmatched: Vec<UnmatchedEntry>,
    selections: Vec<Option<MatchResult>>,
    roster: Vec<StaffRecord>,
}

impl ResolutionQueue {
    /// Open a queue over a matcher outcome and the roster offered to the reviewer
    pub fn new(outcome: MatchOutcome, roster: Vec<StaffRecord>) -> Self {
        let selections = vec![None; outcome.unmatched.len()];
        Self {
            matched: outcome.matched,
            unmatched: outcome.unmatched,
            selections,
            roster,
        }
    }

    pub fn matched(&self) -> &[MatchResult] {
        &self.matched
    }

    pub fn unmatched(&self) -> &[UnmatchedEntry] {
        &self.unmatched
    }

    pub fn roster(&self) -> &[StaffRecord] {
        &self.roster
    }

    /// Pending resolution for an unmatched entry, if any
    pub fn selection(&self, entry_index: usize) -> Option<&MatchResult> {
        self.selections.get(entry_index).and_then(Option::as_ref)
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched.len()
    }

    pub fn resolved_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    /// True once every unmatched entry has been resolved
    pub fn is_settled(&self) -> bool {
        self.resolved_count() == self.unmatched_count()
    }

    /// Assign an existing staff member to an unmatched entry
    ///
    /// Replaces any earlier choice for the same entry. The entry's details
    /// are carried over unchanged.
    pub fn resolve(&mut self, entry_index: usize, staff_id: &str) -> ResolutionResult<MatchResult> {
        let entry = self
            .unmatched
            .get(entry_index)
            .ok_or(ResolutionError::EntryOutOfRange {
                index: entry_index,
                len: self.unmatched.len(),
            })?;
        let staff = self.find_staff(staff_id)?;

        let result = MatchResult {
            staff_id: staff.staff_id.clone(),
            full_name: staff.staff_name.clone(),
            abbreviated_name: entry.abbreviated_name.clone(),
            details: entry.details.clone(),
            source: MatchSource::Manual,
        };
        self.selections[entry_index] = Some(result.clone());

        if self.is_duplicate(staff_id) {
            warn!(staff_id, entry_index, "staff member already used in this batch");
        }
        Ok(result)
    }

    /// Create a staff record through the directory, then resolve the entry to it
    pub fn create_staff_and_resolve(
        &mut self,
        entry_index: usize,
        new_staff: &NewStaff,
        directory: &dyn StaffDirectory,
    ) -> ResolutionResult<MatchResult> {
        if entry_index >= self.unmatched.len() {
            return Err(ResolutionError::EntryOutOfRange {
                index: entry_index,
                len: self.unmatched.len(),
            });
        }

        let created = directory.create(new_staff)?;
        info!(staff_id = %created.staff_id, staff_name = %created.staff_name, "staff created during resolution");
        let staff_id = created.staff_id.clone();
        self.roster.push(created);
        self.resolve(entry_index, &staff_id)
    }

    /// Override the staff member of an automatically matched row
    pub fn reassign(&mut self, matched_index: usize, staff_id: &str) -> ResolutionResult<MatchResult> {
        let len = self.matched.len();
        if matched_index >= len {
            return Err(ResolutionError::MatchedOutOfRange {
                index: matched_index,
                len,
            });
        }
        let staff = self.find_staff(staff_id)?.clone();

        let row = &mut self.matched[matched_index];
        row.staff_id = staff.staff_id;
        row.full_name = staff.staff_name;
        row.source = MatchSource::Manual;
        let result = row.clone();

        if self.is_duplicate(staff_id) {
            warn!(staff_id, matched_index, "staff member already used in this batch");
        }
        Ok(result)
    }

    /// Withdraw the pending resolution of an entry
    pub fn clear(&mut self, entry_index: usize) -> ResolutionResult<Option<MatchResult>> {
        let len = self.selections.len();
        self.selections
            .get_mut(entry_index)
            .map(Option::take)
            .ok_or(ResolutionError::EntryOutOfRange {
                index: entry_index,
                len,
            })
    }

    /// Staff members bound to more than one row, ordered by staff id
    pub fn duplicates(&self) -> Vec<DuplicateStaff> {
        let mut usage: BTreeMap<&str, Vec<QueueRow>> = BTreeMap::new();
        for (index, row) in self.matched.iter().enumerate() {
            usage.entry(&row.staff_id).or_default().push(QueueRow::Matched(index));
        }
        for (index, selection) in self.selections.iter().enumerate() {
            if let Some(row) = selection {
                usage.entry(&row.staff_id).or_default().push(QueueRow::Unmatched(index));
            }
        }

        usage
            .into_iter()
            .filter(|(_, rows)| rows.len() > 1)
            .map(|(staff_id, rows)| DuplicateStaff {
                staff_id: staff_id.to_string(),
                rows,
            })
            .collect()
    }

    /// Whether a staff member is used by more than one row
    pub fn is_duplicate(&self, staff_id: &str) -> bool {
        let uses = self
            .matched
            .iter()
            .chain(self.selections.iter().flatten())
            .filter(|row| row.staff_id == staff_id)
            .count();
        uses > 1
    }

    /// Close the queue: automatic matches followed by the human resolutions
    ///
    /// Fails while any unmatched entry is still open. Duplicates do not
    /// block confirmation; callers surface `duplicates()` beforehand.
    pub fn confirm(self) -> ResolutionResult<Vec<MatchResult>> {
        if !self.is_settled() {
            return Err(ResolutionError::Unsettled {
                resolved: self.resolved_count(),
                unmatched: self.unmatched_count(),
            });
        }

        let duplicates = self.duplicates().len();
        if duplicates > 0 {
            warn!(duplicates, "confirming batch with duplicate staff usage");
        }

        let mut confirmed = self.matched;
        confirmed.extend(self.selections.into_iter().flatten());
        Ok(confirmed)
    }

    fn find_staff(&self, staff_id: &str) -> ResolutionResult<&StaffRecord> {
        self.roster
            .iter()
            .find(|staff| staff.staff_id == staff_id)
            .ok_or_else(|| ResolutionError::UnknownStaff(staff_id.to_string()))
    }
}
