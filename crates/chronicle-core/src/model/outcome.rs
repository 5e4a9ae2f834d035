//! Outcome observations and their typed messages.

use chrono::{DateTime, Utc};
use chronicle_db::queries::outcomes::{OutcomeMessageRow, OutcomeObservationRow};
use serde::Serialize;

use crate::merge::{assign_present, list_matches, scalar_matches, MergeableObservation};
use crate::model::parse_timestamp;

/// The fixed enumeration of game outcome message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageKind {
    ActionsRefreshed,
    AreaChange,
    DifficultyRollSuccess,
    DifficultyRollFailure,
    OutfitChangeability,
    LivingStoryStarted,
    MapShouldUpdate,
    PyramidQualityChange,
    QualityCap,
    QualityExplicitlySet,
    SecondChanceResult,
    SettingChange,
    StandardQualityChange,
}

impl MessageKind {
    /// The upstream wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActionsRefreshed => "ActionsRefreshedMessage",
            Self::AreaChange => "AreaChangeMessage",
            Self::DifficultyRollSuccess => "DifficultyRollSuccessMessage",
            Self::DifficultyRollFailure => "DifficultyRollFailureMessage",
            Self::OutfitChangeability => "OutfitChangeabilityMessage",
            Self::LivingStoryStarted => "LivingStoryStartedMessage",
            Self::MapShouldUpdate => "MapShouldUpdateMessage",
            Self::PyramidQualityChange => "PyramidQualityChangeMessage",
            Self::QualityCap => "QualityCapMessage",
            Self::QualityExplicitlySet => "QualityExplicitlySetMessage",
            Self::SecondChanceResult => "SecondChanceResultMessage",
            Self::SettingChange => "SettingChangeMessage",
            Self::StandardQualityChange => "StandardQualityChangeMessage",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ActionsRefreshedMessage" => Some(Self::ActionsRefreshed),
            "AreaChangeMessage" => Some(Self::AreaChange),
            "DifficultyRollSuccessMessage" => Some(Self::DifficultyRollSuccess),
            "DifficultyRollFailureMessage" => Some(Self::DifficultyRollFailure),
            "OutfitChangeabilityMessage" => Some(Self::OutfitChangeability),
            "LivingStoryStartedMessage" => Some(Self::LivingStoryStarted),
            "MapShouldUpdateMessage" => Some(Self::MapShouldUpdate),
            "PyramidQualityChangeMessage" => Some(Self::PyramidQualityChange),
            "QualityCapMessage" => Some(Self::QualityCap),
            "QualityExplicitlySetMessage" => Some(Self::QualityExplicitlySet),
            "SecondChanceResultMessage" => Some(Self::SecondChanceResult),
            "SettingChangeMessage" => Some(Self::SettingChange),
            "StandardQualityChangeMessage" => Some(Self::StandardQualityChange),
            _ => None,
        }
    }
}

/// One typed message within an outcome, with its verified numeric change.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeMessage {
    #[serde(skip)]
    pub row_id: Option<i64>,
    pub kind: MessageKind,
    pub text: String,
    pub image: Option<String>,
    pub quality_id: Option<i64>,
    pub change: Option<i64>,
}

impl OutcomeMessage {
    pub fn from_row(row: &OutcomeMessageRow) -> Option<Self> {
        Some(Self {
            row_id: Some(row.id),
            kind: MessageKind::from_str(&row.kind)?,
            text: row.text.clone(),
            image: row.image.clone(),
            quality_id: row.quality_id,
            change: row.change,
        })
    }

    pub fn to_row(&self, observation_id: i64) -> OutcomeMessageRow {
        OutcomeMessageRow {
            id: self.row_id.unwrap_or_default(),
            observation_id,
            position: 0,
            kind: self.kind.as_str().to_string(),
            text: self.text.clone(),
            image: self.image.clone(),
            quality_id: self.quality_id,
            change: self.change,
        }
    }
}

impl crate::merge::CanonicalEq for OutcomeMessage {
    fn canonical_eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.text == other.text
            && self.image == other.image
            && self.quality_id == other.quality_id
            && self.change == other.change
    }
}

/// A timestamped snapshot of one resolution of a choice.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeObservation {
    #[serde(skip)]
    pub row_id: Option<i64>,
    pub last_modified: DateTime<Utc>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_success: Option<bool>,
    pub messages: Option<Vec<OutcomeMessage>>,
    pub redirect_event_id: Option<i64>,
    pub redirect_location_id: Option<i64>,
    pub redirect_setting_id: Option<i64>,
    pub redirect_choice_id: Option<i64>,
}

/// Candidate fields for an outcome observation.
#[derive(Debug, Clone, Default)]
pub struct OutcomeObservationFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_success: Option<bool>,
    pub messages: Option<Vec<OutcomeMessage>>,
    pub redirect_event_id: Option<i64>,
    pub redirect_location_id: Option<i64>,
    pub redirect_setting_id: Option<i64>,
    pub redirect_choice_id: Option<i64>,
}

impl OutcomeObservation {
    pub fn from_row(row: &OutcomeObservationRow, messages: Vec<OutcomeMessage>) -> Self {
        Self {
            row_id: Some(row.id),
            last_modified: parse_timestamp(&row.last_modified),
            name: row.name.clone(),
            description: row.description.clone(),
            image: row.image.clone(),
            is_success: row.is_success,
            messages: Some(messages),
            redirect_event_id: row.redirect_event_id,
            redirect_location_id: row.redirect_location_id,
            redirect_setting_id: row.redirect_setting_id,
            redirect_choice_id: row.redirect_choice_id,
        }
    }

    pub fn to_row(&self, choice_id: i64) -> OutcomeObservationRow {
        OutcomeObservationRow {
            id: self.row_id.unwrap_or_default(),
            choice_id,
            last_modified: self.last_modified.to_rfc3339(),
            name: self.name.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            is_success: self.is_success,
            redirect_event_id: self.redirect_event_id,
            redirect_location_id: self.redirect_location_id,
            redirect_setting_id: self.redirect_setting_id,
            redirect_choice_id: self.redirect_choice_id,
        }
    }
}

impl MergeableObservation for OutcomeObservation {
    type Fields = OutcomeObservationFields;

    fn matches(&self, candidate: &Self::Fields) -> bool {
        scalar_matches(&self.name, &candidate.name)
            && scalar_matches(&self.description, &candidate.description)
            && scalar_matches(&self.image, &candidate.image)
            && scalar_matches(&self.is_success, &candidate.is_success)
            && list_matches(&self.messages, &candidate.messages)
            && scalar_matches(&self.redirect_event_id, &candidate.redirect_event_id)
            && scalar_matches(&self.redirect_location_id, &candidate.redirect_location_id)
            && scalar_matches(&self.redirect_setting_id, &candidate.redirect_setting_id)
            && scalar_matches(&self.redirect_choice_id, &candidate.redirect_choice_id)
    }

    fn apply(&mut self, candidate: Self::Fields, now: DateTime<Utc>) {
        assign_present(&mut self.name, candidate.name);
        assign_present(&mut self.description, candidate.description);
        assign_present(&mut self.image, candidate.image);
        assign_present(&mut self.is_success, candidate.is_success);
        assign_present(&mut self.messages, candidate.messages);
        assign_present(&mut self.redirect_event_id, candidate.redirect_event_id);
        assign_present(&mut self.redirect_location_id, candidate.redirect_location_id);
        assign_present(&mut self.redirect_setting_id, candidate.redirect_setting_id);
        assign_present(&mut self.redirect_choice_id, candidate.redirect_choice_id);
        self.last_modified = now;
    }

    fn from_fields(candidate: Self::Fields, now: DateTime<Utc>) -> Self {
        Self {
            row_id: None,
            last_modified: now,
            name: candidate.name,
            description: candidate.description,
            image: candidate.image,
            is_success: candidate.is_success,
            messages: candidate.messages,
            redirect_event_id: candidate.redirect_event_id,
            redirect_location_id: candidate.redirect_location_id,
            redirect_setting_id: candidate.redirect_setting_id,
            redirect_choice_id: candidate.redirect_choice_id,
        }
    }
}
