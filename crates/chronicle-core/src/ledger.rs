//! Possession ledger: per-session cache of last-known quality levels.
//!
//! Outcome messages often report only a new total ("new total 211") or no
//! number at all; the ledger keeps the previous state so the interpreter can
//! derive the signed change. Ledger state is ephemeral and scoped to one
//! recording session — the caller owns the session object and its lifecycle.

use std::collections::HashMap;

use crate::snapshot::PossessionSnapshot;

/// Category whose progress points cap at 70 instead of 50.
const BASIC_ABILITY_CATEGORY: &str = "BasicAbility";

/// Last-known state of one quality within a recording session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PossessionState {
    pub name: String,
    pub category: String,
    pub level: i64,
    pub progress_percentage: i64,
    pub cap: Option<i64>,
}

impl PossessionState {
    /// Progress points for "pyramid" qualities: each level contributes its
    /// own value up to the per-category cap, plus the fractional progress
    /// toward the next level.
    pub fn cp(&self) -> i64 {
        let cp_cap = if self.category == BASIC_ABILITY_CATEGORY {
            70
        } else {
            50
        };
        let mut total: i64 = (1..=self.level).map(|level| level.min(cp_cap)).sum();
        total += ((self.progress_percentage * (self.level + 1).min(cp_cap)) as f64 / 100.0).round()
            as i64;
        total
    }
}

impl From<&PossessionSnapshot> for PossessionState {
    fn from(snapshot: &PossessionSnapshot) -> Self {
        Self {
            name: snapshot.name.clone(),
            category: snapshot.category.clone(),
            level: snapshot.level,
            progress_percentage: snapshot.progress_as_percentage,
            cap: snapshot.cap,
        }
    }
}

/// Mutable per-session recording state.
///
/// Not idempotent: updating a possession replaces the "old" state the next
/// delta is computed from, so each outcome message must be processed exactly
/// once per occurrence.
#[derive(Debug, Default)]
pub struct RecordingSession {
    possessions: HashMap<i64, PossessionState>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last-known state for a quality, if tracked this session.
    pub fn possession(&self, quality_id: i64) -> Option<&PossessionState> {
        self.possessions.get(&quality_id)
    }

    /// Replace one possession's state, returning the new state.
    pub fn update_possession(&mut self, snapshot: &PossessionSnapshot) -> PossessionState {
        let new_state = PossessionState::from(snapshot);
        self.possessions.insert(snapshot.id, new_state.clone());
        new_state
    }

    /// Replace the whole ledger from a full possessions snapshot.
    pub fn replace_possessions<'a>(
        &mut self,
        snapshots: impl IntoIterator<Item = &'a PossessionSnapshot>,
    ) {
        self.possessions.clear();
        for snapshot in snapshots {
            self.update_possession(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(category: &str, level: i64, progress: i64) -> PossessionState {
        PossessionState {
            name: "Test".into(),
            category: category.into(),
            level,
            progress_percentage: progress,
            cap: None,
        }
    }

    #[test]
    fn test_cp_standard_category() {
        // level 2 at 50%: 1 + 2 + round(50 * 3 / 100) = 3 + 2 = 5
        assert_eq!(state("Story", 2, 50).cp(), 5);
    }

    #[test]
    fn test_cp_no_progress() {
        assert_eq!(state("Story", 3, 0).cp(), 6);
    }

    #[test]
    fn test_cp_caps_at_50_outside_basic_abilities() {
        // Levels past the cap each contribute exactly the cap.
        let below = state("Story", 50, 0).cp();
        let above = state("Story", 51, 0).cp();
        assert_eq!(above - below, 50);
    }

    #[test]
    fn test_cp_basic_ability_caps_at_70() {
        let below = state("BasicAbility", 70, 0).cp();
        let above = state("BasicAbility", 71, 0).cp();
        assert_eq!(above - below, 70);
    }

    #[test]
    fn test_replace_possessions_drops_untracked() {
        let mut session = RecordingSession::new();
        let first = PossessionSnapshot {
            id: 1,
            name: "Shadowy".into(),
            category: "BasicAbility".into(),
            nature: "Status".into(),
            level: 10,
            progress_as_percentage: 0,
            cap: None,
        };
        session.update_possession(&first);

        let second = PossessionSnapshot { id: 2, ..first.clone() };
        session.replace_possessions([&second]);
        assert!(session.possession(1).is_none());
        assert!(session.possession(2).is_some());
    }
}
