//! Choice observations.

use chrono::{DateTime, Utc};
use chronicle_db::queries::observations::ChoiceObservationRow;
use serde::Serialize;

use crate::merge::{assign_present, list_matches, scalar_matches, MergeableObservation};
use crate::model::{parse_timestamp, Challenge, Requirement};

/// A timestamped snapshot of a choice's narrative fields.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceObservation {
    #[serde(skip)]
    pub row_id: Option<i64>,
    pub last_modified: DateTime<Utc>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub currency_cost: Option<i64>,
    pub challenges: Option<Vec<Challenge>>,
    pub requirements: Option<Vec<Requirement>>,
}

/// Candidate fields for a choice observation.
#[derive(Debug, Clone, Default)]
pub struct ChoiceObservationFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub currency_cost: Option<i64>,
    pub challenges: Option<Vec<Challenge>>,
    pub requirements: Option<Vec<Requirement>>,
}

impl ChoiceObservation {
    pub fn from_row(
        row: &ChoiceObservationRow,
        challenges: Vec<Challenge>,
        requirements: Vec<Requirement>,
    ) -> Self {
        Self {
            row_id: Some(row.id),
            last_modified: parse_timestamp(&row.last_modified),
            name: row.name.clone(),
            description: row.description.clone(),
            currency_cost: row.currency_cost,
            challenges: Some(challenges),
            requirements: Some(requirements),
        }
    }
}

impl MergeableObservation for ChoiceObservation {
    type Fields = ChoiceObservationFields;

    fn matches(&self, candidate: &Self::Fields) -> bool {
        scalar_matches(&self.name, &candidate.name)
            && scalar_matches(&self.description, &candidate.description)
            && scalar_matches(&self.currency_cost, &candidate.currency_cost)
            && list_matches(&self.challenges, &candidate.challenges)
            && list_matches(&self.requirements, &candidate.requirements)
    }

    fn apply(&mut self, candidate: Self::Fields, now: DateTime<Utc>) {
        assign_present(&mut self.name, candidate.name);
        assign_present(&mut self.description, candidate.description);
        assign_present(&mut self.currency_cost, candidate.currency_cost);
        assign_present(&mut self.challenges, candidate.challenges);
        assign_present(&mut self.requirements, candidate.requirements);
        self.last_modified = now;
    }

    fn from_fields(candidate: Self::Fields, now: DateTime<Utc>) -> Self {
        Self {
            row_id: None,
            last_modified: now,
            name: candidate.name,
            description: candidate.description,
            currency_cost: candidate.currency_cost,
            challenges: candidate.challenges,
            requirements: candidate.requirements,
        }
    }
}
