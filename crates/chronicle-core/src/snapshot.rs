//! Wire payloads submitted by the recording client.
//!
//! These mirror the game's own JSON structures, so field names follow the
//! game's camelCase convention rather than ours.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSnapshot {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingSnapshot {
    pub id: i64,
    pub name: Option<String>,
    #[serde(default)]
    pub can_change_outfit: bool,
    #[serde(default)]
    pub can_travel: bool,
    #[serde(default)]
    pub is_infinite_draw: bool,
    pub items_usable_here: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    pub id: i64,
    pub name: String,
    pub teaser: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub distribution: Option<String>,
    pub frequency: Option<String>,
    pub urgency: Option<String>,
    pub image: Option<String>,
    pub can_go_back: Option<bool>,
    #[serde(default)]
    pub quality_requirements: Vec<RequirementSnapshot>,
    pub child_branches: Option<Vec<ChoiceSnapshot>>,
}

/// An opportunity card as drawn from the deck. Cards wrap a story event and
/// add deck metadata of their own.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSnapshot {
    pub event_id: i64,
    pub name: String,
    pub teaser: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub stickiness: Option<String>,
    #[serde(default)]
    pub is_autofire: bool,
    #[serde(default)]
    pub quality_requirements: Vec<RequirementSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceSnapshot {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub action_cost: Option<i64>,
    pub currency_cost: Option<i64>,
    pub button_text: Option<String>,
    #[serde(default)]
    pub ordering: i64,
    #[serde(default)]
    pub challenges: Vec<ChallengeSnapshot>,
    #[serde(default)]
    pub quality_requirements: Vec<RequirementSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSnapshot {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub target_number: Option<i64>,
    pub nature: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementSnapshot {
    pub id: i64,
    pub quality_id: i64,
    pub quality_name: Option<String>,
    pub category: Option<String>,
    pub nature: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub is_cost: bool,
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PossessionSnapshot {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub nature: String,
    #[serde(default)]
    pub level: i64,
    #[serde(default)]
    pub progress_as_percentage: i64,
    pub cap: Option<i64>,
}

/// The event block carried by an outcome payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeEventSnapshot {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// The "end storylet" block of an outcome submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeSnapshot {
    pub event: OutcomeEventSnapshot,
    pub root_event_id: Option<i64>,
    pub can_go_again: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeMessageSnapshot {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: Option<String>,
    pub image: Option<String>,
    pub possession: Option<PossessionSnapshot>,
    pub area: Option<LocationSnapshot>,
    pub setting: Option<SettingSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_snapshot_parses_game_json() {
        let payload = r#"{
            "id": 311,
            "name": "A Dusty Bookshop",
            "teaser": "Shelves upon shelves.",
            "canGoBack": true,
            "qualityRequirements": [
                {"id": 9, "qualityId": 421, "qualityName": "Curiosity",
                 "isCost": false, "tooltip": "You need Curiosity 2"}
            ],
            "childBranches": [
                {"id": 12, "name": "Browse", "ordering": 2,
                 "challenges": [
                    {"id": 3, "name": "Watchful", "targetNumber": 80,
                     "nature": "Status", "type": "Challenge"}
                 ]}
            ]
        }"#;
        let event: EventSnapshot = serde_json::from_str(payload).unwrap();
        assert_eq!(event.id, 311);
        assert_eq!(event.can_go_back, Some(true));
        assert_eq!(event.quality_requirements[0].quality_id, 421);
        let branches = event.child_branches.unwrap();
        assert_eq!(branches[0].challenges[0].target_number, Some(80));
        assert_eq!(branches[0].challenges[0].kind.as_deref(), Some("Challenge"));
    }

    #[test]
    fn test_outcome_snapshot_parses() {
        let payload = r#"{
            "event": {"id": 9000, "name": "A Find", "image": "magnifier"},
            "rootEventId": 311,
            "canGoAgain": true
        }"#;
        let outcome: OutcomeSnapshot = serde_json::from_str(payload).unwrap();
        assert_eq!(outcome.event.id, 9000);
        assert_eq!(outcome.root_event_id, Some(311));

        let message = r#"{
            "type": "StandardQualityChangeMessage",
            "message": "You've gained 2 x Clue.",
            "possession": {"id": 77, "name": "Clue", "category": "Mysteries",
                           "nature": "Thing", "level": 6,
                           "progressAsPercentage": 0}
        }"#;
        let message: OutcomeMessageSnapshot = serde_json::from_str(message).unwrap();
        assert_eq!(message.possession.unwrap().level, 6);
    }

    #[test]
    fn test_missing_optional_collections_default_empty() {
        let payload = r#"{"id": 5, "name": "Bare"}"#;
        let event: EventSnapshot = serde_json::from_str(payload).unwrap();
        assert!(event.quality_requirements.is_empty());
        assert!(event.child_branches.is_none());
    }
}
