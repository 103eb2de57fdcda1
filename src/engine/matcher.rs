// ==========================================
// Exam Ops - Abbreviation Matcher
// ==========================================
// Binds abbreviated timetable names ("J. Smith") to full
// staff directory names.
// Heuristic by construction: anything it cannot place goes
// to the manual resolution queue, never to an error.
// ==========================================

use crate::domain::schedule::{ExtractedEntry, MatchOutcome, MatchResult, UnmatchedEntry};
use crate::domain::staff::StaffRecord;
use crate::domain::types::MatchSource;
use crate::engine::normalizer::{initials, normalize_name, surname_token};
use crate::engine::similarity::token_set_ratio;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info, instrument};

// ==========================================
// MatcherConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Skip trailing single-letter tokens when picking the surname ("Smith J.")
    pub skip_initial_surname_tokens: bool,
    /// Token-set similarity a fallback match must exceed (0-100); None disables the fallback
    pub fuzzy_threshold: Option<u8>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            skip_initial_surname_tokens: true,
            fuzzy_threshold: None,
        }
    }
}

// Roster row with its normalized forms computed once per batch
struct RosterCandidate<'a> {
    record: &'a StaffRecord,
    normalized: String,
    initials: BTreeSet<char>,
}

impl<'a> RosterCandidate<'a> {
    fn new(record: &'a StaffRecord) -> Self {
        let normalized = normalize_name(&record.staff_name);
        let initials = initials(&normalized);
        Self {
            record,
            normalized,
            initials,
        }
    }

    // Bidirectional substring test against any token of the full name
    fn shares_surname(&self, surname: &str) -> bool {
        self.normalized
            .split_whitespace()
            .any(|token| token.contains(surname) || surname.contains(token))
    }
}

// ==========================================
// AbbreviationMatcher
// ==========================================
pub struct AbbreviationMatcher {
    config: MatcherConfig,
}

impl AbbreviationMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Match extracted entries against the staff roster
    ///
    /// Every entry lands in exactly one of `matched` / `unmatched`, in input
    /// order. Ties go to the first qualifying staff member in roster order.
    /// The fuzzy fallback runs after the surname pass and only considers
    /// staff no other entry has claimed.
    #[instrument(skip_all, fields(entries = entries.len(), roster = roster.len()))]
    pub fn match_entries(&self, entries: &[ExtractedEntry], roster: &[StaffRecord]) -> MatchOutcome {
        let candidates: Vec<RosterCandidate<'_>> = roster.iter().map(RosterCandidate::new).collect();

        let mut slots: Vec<Option<(&StaffRecord, MatchSource)>> = entries
            .iter()
            .map(|entry| {
                self.surname_match(entry, &candidates)
                    .map(|record| (record, MatchSource::Surname))
            })
            .collect();

        if let Some(threshold) = self.config.fuzzy_threshold {
            let mut claimed: HashSet<&str> = slots
                .iter()
                .flatten()
                .map(|&(record, _)| record.staff_id.as_str())
                .collect();
            for (entry, slot) in entries.iter().zip(slots.iter_mut()) {
                if slot.is_some() {
                    continue;
                }
                if let Some(record) = fuzzy_match(entry, &candidates, &claimed, threshold) {
                    claimed.insert(record.staff_id.as_str());
                    *slot = Some((record, MatchSource::Fuzzy));
                }
            }
        }

        let mut outcome = MatchOutcome::default();
        for (entry, slot) in entries.iter().zip(slots) {
            match slot {
                Some((record, source)) => {
                    debug!(
                        abbreviated_name = %entry.abbreviated_name,
                        staff_id = %record.staff_id,
                        ?source,
                        "matched"
                    );
                    outcome.matched.push(MatchResult {
                        staff_id: record.staff_id.clone(),
                        full_name: record.staff_name.clone(),
                        abbreviated_name: entry.abbreviated_name.clone(),
                        details: entry.details.clone(),
                        source,
                    });
                }
                None => {
                    debug!(abbreviated_name = %entry.abbreviated_name, "no confident match");
                    outcome.unmatched.push(UnmatchedEntry::from(entry.clone()));
                }
            }
        }

        info!(
            matched = outcome.matched.len(),
            unmatched = outcome.unmatched.len(),
            "abbreviation matching finished"
        );
        outcome
    }

    fn surname_match<'a>(
        &self,
        entry: &ExtractedEntry,
        candidates: &[RosterCandidate<'a>],
    ) -> Option<&'a StaffRecord> {
        let normalized = normalize_name(&entry.abbreviated_name);
        let surname = surname_token(&normalized, self.config.skip_initial_surname_tokens);

        // An empty surname would be a substring of every name
        if surname.is_empty() {
            return None;
        }
        let first_letter = normalized.chars().next()?;
        candidates
            .iter()
            .filter(|c| c.shares_surname(surname))
            .find(|c| c.initials.contains(&first_letter))
            .map(|c| c.record)
    }
}

fn fuzzy_match<'a>(
    entry: &ExtractedEntry,
    candidates: &[RosterCandidate<'a>],
    claimed: &HashSet<&str>,
    threshold: u8,
) -> Option<&'a StaffRecord> {
    if normalize_name(&entry.abbreviated_name).is_empty() {
        return None;
    }
    candidates
        .iter()
        .filter(|c| !claimed.contains(c.record.staff_id.as_str()))
        .find(|c| token_set_ratio(&c.record.staff_name, &entry.abbreviated_name) > threshold)
        .map(|c| c.record)
}

impl Default for AbbreviationMatcher {
    fn default() -> Self {
        Self::new(MatcherConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::ScheduleDetail;
    use crate::domain::types::StaffRole;

    fn staff(id: &str, name: &str) -> StaffRecord {
        StaffRecord {
            staff_id: id.to_string(),
            staff_name: name.to_string(),
            staff_role: StaffRole::Lecturer,
            department: None,
        }
    }

    fn entry(name: &str) -> ExtractedEntry {
        ExtractedEntry::new(
            name,
            vec![ScheduleDetail::new("05/03/24", "9:00am", "12:00pm", "SMA")],
        )
    }

    #[test]
    fn test_initial_and_surname_match() {
        let roster = vec![staff("s1", "John Smith")];
        let outcome = AbbreviationMatcher::default().match_entries(&[entry("J. Smith")], &roster);

        assert_eq!(outcome.matched.len(), 1);
        assert!(outcome.unmatched.is_empty());
        let result = &outcome.matched[0];
        assert_eq!(result.staff_id, "s1");
        assert_eq!(result.full_name, "John Smith");
        assert_eq!(result.abbreviated_name, "J. Smith");
        assert_eq!(result.source, MatchSource::Surname);
    }

    #[test]
    fn test_unknown_surname_is_unmatched() {
        let roster = vec![staff("s1", "Alice Brown")];
        let outcome = AbbreviationMatcher::default().match_entries(&[entry("X. Zephyr")], &roster);

        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched.len(), 1);
        assert_eq!(outcome.unmatched[0].abbreviated_name, "X. Zephyr");
    }

    #[test]
    fn test_truncated_and_expanded_surnames() {
        let roster = vec![staff("s1", "Kofi Asamoah-Gyadu"), staff("s2", "Ama Ofori")];
        let outcome = AbbreviationMatcher::default()
            .match_entries(&[entry("K. Asamoah"), entry("A. Oforiwaa")], &roster);

        assert_eq!(outcome.matched.len(), 2);
        assert_eq!(outcome.matched[0].staff_id, "s1");
        assert_eq!(outcome.matched[1].staff_id, "s2");
    }

    #[test]
    fn test_initials_disambiguate_shared_surname() {
        let roster = vec![staff("s1", "Mary Mensah"), staff("s2", "Kwame Mensah")];
        let outcome = AbbreviationMatcher::default().match_entries(&[entry("K. Mensah")], &roster);

        assert_eq!(outcome.matched[0].staff_id, "s2");
    }

    #[test]
    fn test_first_qualifying_candidate_wins() {
        let roster = vec![staff("s1", "Kwame Mensah"), staff("s2", "Kojo Mensah")];
        let outcome = AbbreviationMatcher::default().match_entries(&[entry("K. Mensah")], &roster);

        assert_eq!(outcome.matched[0].staff_id, "s1");
    }

    #[test]
    fn test_trailing_initial_is_skipped_for_surname() {
        let roster = vec![staff("s1", "John Smith")];
        let matcher = AbbreviationMatcher::default();
        let outcome = matcher.match_entries(&[entry("Smith J.")], &roster);

        // "smith" keys the candidate set; the name starts with 's', an initial of "John Smith"
        assert_eq!(outcome.matched.len(), 1);
    }

    #[test]
    fn test_empty_roster_leaves_everything_unmatched() {
        let entries = vec![entry("J. Smith"), entry("A. Brown")];
        let outcome = AbbreviationMatcher::default().match_entries(&entries, &[]);

        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched.len(), 2);
    }

    #[test]
    fn test_empty_abbreviation_is_unmatched() {
        let roster = vec![staff("s1", "John Smith")];
        let outcome = AbbreviationMatcher::default().match_entries(&[entry(""), entry(" .. ")], &roster);

        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched.len(), 2);
    }

    #[test]
    fn test_every_entry_lands_exactly_once() {
        let roster = vec![
            staff("s1", "John Smith"),
            staff("s2", "Alice Brown"),
            staff("s3", "Kwame Mensah"),
        ];
        let entries = vec![
            entry("J. Smith"),
            entry("X. Zephyr"),
            entry("A. Brown"),
            entry(""),
            entry("K. Mensah"),
            entry("Q. Brown"),
        ];
        let outcome = AbbreviationMatcher::default().match_entries(&entries, &roster);

        assert_eq!(outcome.total(), entries.len());
        let mut seen: Vec<&str> = outcome
            .matched
            .iter()
            .map(|m| m.abbreviated_name.as_str())
            .chain(outcome.unmatched.iter().map(|u| u.abbreviated_name.as_str()))
            .collect();
        seen.sort();
        let mut expected: Vec<&str> = entries.iter().map(|e| e.abbreviated_name.as_str()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_details_are_carried_verbatim() {
        let roster = vec![staff("s1", "John Smith")];
        let original = entry("J. Smith");
        let outcome = AbbreviationMatcher::default().match_entries(std::slice::from_ref(&original), &roster);

        assert_eq!(outcome.matched[0].details, original.details);
    }

    #[test]
    fn test_fuzzy_fallback_only_when_enabled() {
        // no initial of "Ama Serwaa Boateng" is 'x'; surname path fails
        let roster = vec![staff("s1", "Ama Serwaa Boateng")];
        let entries = vec![entry("Xx Ama Boateng")];

        let strict = AbbreviationMatcher::default().match_entries(&entries, &roster);
        assert_eq!(strict.unmatched.len(), 1);

        let lenient = AbbreviationMatcher::new(MatcherConfig {
            fuzzy_threshold: Some(70),
            ..MatcherConfig::default()
        })
        .match_entries(&entries, &roster);
        assert_eq!(lenient.matched.len(), 1);
        assert_eq!(lenient.matched[0].source, MatchSource::Fuzzy);
    }

    #[test]
    fn test_fuzzy_fallback_skips_staff_claimed_by_surname() {
        let roster = vec![staff("s1", "Ama Serwaa Boateng"), staff("s2", "Ama Boateng")];
        let entries = vec![entry("A. S. Boateng"), entry("Xx Ama Boateng")];

        let outcome = AbbreviationMatcher::new(MatcherConfig {
            fuzzy_threshold: Some(70),
            ..MatcherConfig::default()
        })
        .match_entries(&entries, &roster);

        assert_eq!(outcome.matched.len(), 2);
        assert_eq!(outcome.matched[0].abbreviated_name, "A. S. Boateng");
        assert_eq!(outcome.matched[0].staff_id, "s1");
        assert_eq!(outcome.matched[0].source, MatchSource::Surname);
        assert_eq!(outcome.matched[1].staff_id, "s2");
        assert_eq!(outcome.matched[1].source, MatchSource::Fuzzy);
    }

    #[test]
    fn test_fuzzy_fallback_does_not_reuse_its_own_matches() {
        let roster = vec![staff("s1", "Ama Serwaa Boateng")];
        let entries = vec![entry("Xx Ama Boateng"), entry("Yy Ama Boateng")];

        let outcome = AbbreviationMatcher::new(MatcherConfig {
            fuzzy_threshold: Some(70),
            ..MatcherConfig::default()
        })
        .match_entries(&entries, &roster);

        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].abbreviated_name, "Xx Ama Boateng");
        assert_eq!(outcome.unmatched.len(), 1);
        assert_eq!(outcome.unmatched[0].abbreviated_name, "Yy Ama Boateng");
    }
}
