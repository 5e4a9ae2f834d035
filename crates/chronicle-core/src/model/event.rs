//! Story event observations.

use chrono::{DateTime, Utc};
use chronicle_db::queries::observations::EventObservationRow;
use serde::Serialize;

use crate::merge::{assign_present, list_matches, scalar_matches, MergeableObservation};
use crate::model::{parse_timestamp, Requirement};

/// A timestamped snapshot of a story event's narrative fields.
#[derive(Debug, Clone, Serialize)]
pub struct EventObservation {
    #[serde(skip)]
    pub row_id: Option<i64>,
    pub last_modified: DateTime<Utc>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub teaser: Option<String>,
    pub requirements: Option<Vec<Requirement>>,
}

/// Candidate fields for a story event observation.
#[derive(Debug, Clone, Default)]
pub struct EventObservationFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub teaser: Option<String>,
    pub requirements: Option<Vec<Requirement>>,
}

impl EventObservation {
    pub fn from_row(row: &EventObservationRow, requirements: Vec<Requirement>) -> Self {
        Self {
            row_id: Some(row.id),
            last_modified: parse_timestamp(&row.last_modified),
            name: row.name.clone(),
            description: row.description.clone(),
            teaser: row.teaser.clone(),
            requirements: Some(requirements),
        }
    }
}

impl MergeableObservation for EventObservation {
    type Fields = EventObservationFields;

    fn matches(&self, candidate: &Self::Fields) -> bool {
        scalar_matches(&self.name, &candidate.name)
            && scalar_matches(&self.description, &candidate.description)
            && scalar_matches(&self.teaser, &candidate.teaser)
            && list_matches(&self.requirements, &candidate.requirements)
    }

    fn apply(&mut self, candidate: Self::Fields, now: DateTime<Utc>) {
        assign_present(&mut self.name, candidate.name);
        assign_present(&mut self.description, candidate.description);
        assign_present(&mut self.teaser, candidate.teaser);
        assign_present(&mut self.requirements, candidate.requirements);
        self.last_modified = now;
    }

    fn from_fields(candidate: Self::Fields, now: DateTime<Utc>) -> Self {
        Self {
            row_id: None,
            last_modified: now,
            name: candidate.name,
            description: candidate.description,
            teaser: candidate.teaser,
            requirements: candidate.requirements,
        }
    }
}
