//! Skill challenges attached to choice observations.

use chronicle_db::queries::observations::ChallengeRow;
use serde::Serialize;

use crate::merge::CanonicalEq;

/// A dice/skill check gating one choice's outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Challenge {
    #[serde(skip)]
    pub row_id: Option<i64>,
    pub upstream_id: i64,
    pub category: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub target: i64,
    pub nature: String,
    pub kind: String,
}

impl Challenge {
    pub fn from_row(row: &ChallengeRow) -> Self {
        Self {
            row_id: Some(row.id),
            upstream_id: row.upstream_id,
            category: row.category.clone(),
            name: row.name.clone(),
            description: row.description.clone(),
            image: row.image.clone(),
            target: row.target,
            nature: row.nature.clone(),
            kind: row.kind.clone(),
        }
    }

    pub fn to_row(&self, observation_id: i64) -> ChallengeRow {
        ChallengeRow {
            id: self.row_id.unwrap_or_default(),
            observation_id,
            position: 0,
            upstream_id: self.upstream_id,
            category: self.category.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            target: self.target,
            nature: self.nature.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl CanonicalEq for Challenge {
    fn canonical_eq(&self, other: &Self) -> bool {
        self.upstream_id == other.upstream_id
            && self.category == other.category
            && self.name == other.name
            && self.description == other.description
            && self.image == other.image
            && self.target == other.target
            && self.nature == other.nature
            && self.kind == other.kind
    }
}
