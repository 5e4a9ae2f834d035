//! Interpreted quality requirements.

use chronicle_db::queries::observations::RequirementRow;
use serde::Serialize;

use crate::merge::CanonicalEq;

/// The structured constraint a requirement tooltip encodes.
///
/// Exactly one shape applies per requirement. `Unrecognized` is the fallback
/// when no pattern family matched; it preserves the normalized tooltip text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequirementConstraint {
    AtLeast(i64),
    AtMost(i64),
    Between { min: i64, max: i64 },
    OneOf(Vec<String>),
    Unrecognized(String),
}

impl RequirementConstraint {
    /// Split into the nullable storage columns
    /// (min, max, values JSON, fallback text).
    pub fn to_columns(&self) -> (Option<i64>, Option<i64>, Option<String>, Option<String>) {
        match self {
            Self::AtLeast(min) => (Some(*min), None, None, None),
            Self::AtMost(max) => (None, Some(*max), None, None),
            Self::Between { min, max } => (Some(*min), Some(*max), None, None),
            Self::OneOf(values) => (None, None, serde_json::to_string(values).ok(), None),
            Self::Unrecognized(text) => (None, None, None, Some(text.clone())),
        }
    }

    /// Rebuild from the storage columns.
    pub fn from_columns(
        min: Option<i64>,
        max: Option<i64>,
        values: Option<&str>,
        fallback: Option<&str>,
    ) -> Self {
        if let Some(values) = values {
            return Self::OneOf(serde_json::from_str(values).unwrap_or_default());
        }
        if let Some(fallback) = fallback {
            return Self::Unrecognized(fallback.to_string());
        }
        match (min, max) {
            (Some(min), Some(max)) => Self::Between { min, max },
            (Some(min), None) => Self::AtLeast(min),
            (None, Some(max)) => Self::AtMost(max),
            (None, None) => Self::Unrecognized(String::new()),
        }
    }
}

/// One unlock/block condition referencing exactly one quality.
#[derive(Debug, Clone, Serialize)]
pub struct Requirement {
    /// Storage row id; `None` until persisted.
    #[serde(skip)]
    pub row_id: Option<i64>,
    pub upstream_id: i64,
    pub quality_id: i64,
    pub is_cost: bool,
    pub image: Option<String>,
    pub constraint: RequirementConstraint,
}

impl Requirement {
    pub fn from_row(row: &RequirementRow) -> Self {
        Self {
            row_id: Some(row.id),
            upstream_id: row.upstream_id,
            quality_id: row.quality_id,
            is_cost: row.is_cost,
            image: row.image.clone(),
            constraint: RequirementConstraint::from_columns(
                row.min_quantity,
                row.max_quantity,
                row.required_values.as_deref(),
                row.fallback_text.as_deref(),
            ),
        }
    }

    pub fn to_row(&self, observation_id: i64) -> RequirementRow {
        let (min_quantity, max_quantity, required_values, fallback_text) =
            self.constraint.to_columns();
        RequirementRow {
            id: self.row_id.unwrap_or_default(),
            observation_id,
            position: 0,
            upstream_id: self.upstream_id,
            quality_id: self.quality_id,
            is_cost: self.is_cost,
            image: self.image.clone(),
            min_quantity,
            max_quantity,
            required_values,
            fallback_text,
        }
    }
}

impl CanonicalEq for Requirement {
    fn canonical_eq(&self, other: &Self) -> bool {
        self.upstream_id == other.upstream_id
            && self.quality_id == other.quality_id
            && self.is_cost == other.is_cost
            && self.image == other.image
            && self.constraint == other.constraint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_round_trip() {
        for constraint in [
            RequirementConstraint::AtLeast(5),
            RequirementConstraint::AtMost(0),
            RequirementConstraint::Between { min: 2, max: 2 },
            RequirementConstraint::OneOf(vec!["the Fire".into(), "the Gleam".into()]),
            RequirementConstraint::Unrecognized("strange text".into()),
        ] {
            let (min, max, values, fallback) = constraint.to_columns();
            let rebuilt = RequirementConstraint::from_columns(
                min,
                max,
                values.as_deref(),
                fallback.as_deref(),
            );
            assert_eq!(rebuilt, constraint);
        }
    }

    #[test]
    fn test_canonical_eq_ignores_row_id() {
        let a = Requirement {
            row_id: Some(1),
            upstream_id: 10,
            quality_id: 3,
            is_cost: false,
            image: None,
            constraint: RequirementConstraint::AtLeast(1),
        };
        let mut b = a.clone();
        b.row_id = None;
        assert!(a.canonical_eq(&b));
    }
}
