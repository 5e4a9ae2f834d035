//! Turns free-text game strings into structured data.
//!
//! Requirement tooltips become [`RequirementConstraint`]s and outcome message
//! text becomes verified numeric changes. Interpretation never fails a
//! submission: unrecognized tooltips are stored verbatim and unparseable
//! messages keep the ledger-derived change.

use tracing::{error, warn};

use crate::ledger::RecordingSession;
use crate::model::{MessageKind, RequirementConstraint};
use crate::patterns::{self, match_any};
use crate::snapshot::OutcomeMessageSnapshot;
use crate::text;

/// Classify a requirement tooltip into a constraint. Families are tried from
/// most restrictive phrasing to least; the first family to match wins.
pub fn interpret_requirement(tooltip: &str) -> RequirementConstraint {
    if match_any(&patterns::TOOLTIPS_NONE, tooltip).is_some() {
        RequirementConstraint::AtMost(0)
    } else if match_any(&patterns::TOOLTIPS_AT_LEAST_ONE, tooltip).is_some() {
        RequirementConstraint::AtLeast(1)
    } else if let Some(caps) = match_any(&patterns::TOOLTIPS_MINIMUM, tooltip) {
        match patterns::capture_i64(&caps, "quantity_min") {
            Some(min) => RequirementConstraint::AtLeast(min),
            None => RequirementConstraint::Unrecognized(text::normalize(tooltip)),
        }
    } else if let Some(caps) = match_any(&patterns::TOOLTIPS_MAXIMUM, tooltip) {
        match patterns::capture_i64(&caps, "quantity_max") {
            Some(max) => RequirementConstraint::AtMost(max),
            None => RequirementConstraint::Unrecognized(text::normalize(tooltip)),
        }
    } else if let Some(caps) = match_any(&patterns::TOOLTIPS_EXACTLY, tooltip) {
        match patterns::capture_i64(&caps, "quantity") {
            Some(quantity) => RequirementConstraint::Between {
                min: quantity,
                max: quantity,
            },
            None => RequirementConstraint::Unrecognized(text::normalize(tooltip)),
        }
    } else if let Some(caps) = match_any(&patterns::TOOLTIPS_RANGE, tooltip) {
        match (
            patterns::capture_i64(&caps, "quantity_min"),
            patterns::capture_i64(&caps, "quantity_max"),
        ) {
            (Some(min), Some(max)) => RequirementConstraint::Between { min, max },
            _ => RequirementConstraint::Unrecognized(text::normalize(tooltip)),
        }
    } else if let Some(caps) = match_any(&patterns::TOOLTIPS_WORDY, tooltip) {
        RequirementConstraint::OneOf(patterns::wordy_values(&caps["requirements"]))
    } else {
        error!(tooltip, "unknown requirement tooltip");
        RequirementConstraint::Unrecognized(text::normalize(tooltip))
    }
}

/// An outcome message with its kind resolved and change verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretedMessage {
    pub kind: MessageKind,
    pub text: String,
    pub change: Option<i64>,
}

/// Interpret one outcome message against the session's possession ledger.
///
/// Updates the ledger as a side effect, so call exactly once per message
/// occurrence. Returns `None` for messages with no text or an unrecognized
/// kind; both are skipped rather than failing the submission.
pub fn interpret_message(
    session: &mut RecordingSession,
    snapshot: &OutcomeMessageSnapshot,
) -> Option<InterpretedMessage> {
    let raw = snapshot.message.as_deref()?;
    let kind = match MessageKind::from_str(&snapshot.kind) {
        Some(kind) => kind,
        None => {
            warn!(kind = %snapshot.kind, "skipping outcome message of unknown kind");
            return None;
        }
    };

    let mut message_text = raw.trim().to_string();
    let mut derived_change = None;
    let mut quality_name = None;

    if let Some(possession) = &snapshot.possession {
        let old_state = session.possession(possession.id).cloned();
        let new_state = session.update_possession(possession);
        quality_name = Some(new_state.name.clone());

        derived_change = match kind {
            MessageKind::StandardQualityChange => Some(match &old_state {
                Some(old) => new_state.level - old.level,
                None => new_state.level,
            }),
            MessageKind::QualityExplicitlySet => Some(new_state.level),
            MessageKind::PyramidQualityChange => Some(match &old_state {
                Some(old) => new_state.cp() - old.cp(),
                None => new_state.cp(),
            }),
            _ => None,
        };
    }

    // Verify the change against the message text where the phrasing allows,
    // and rewrite noisy phrasings into their canonical forms.
    let mut parsed_change = None;
    match kind {
        MessageKind::StandardQualityChange => {
            if let Some(caps) = match_any(&patterns::QUALITY_GAIN, &message_text) {
                if let Some(quantity) = patterns::capture_i64(&caps, "quantity") {
                    let quality = caps["quality"].to_string();
                    parsed_change = Some(quantity);
                    message_text = format!("You've gained {quantity} x {quality}.");
                }
            } else if let Some(caps) = match_any(&patterns::QUALITY_LOSS, &message_text) {
                if let Some(quantity) = patterns::capture_i64(&caps, "quantity") {
                    let quality = caps["quality"].to_string();
                    parsed_change = Some(-quantity);
                    message_text = format!("You've lost {quantity} x {quality}.");
                }
            } else {
                warn!(text = %message_text, "unexpected quality change message");
            }
        }
        MessageKind::QualityExplicitlySet => {
            if match_any(&patterns::QUALITY_SET_ZERO, &message_text).is_some() {
                parsed_change = Some(0);
            } else if let Some(caps) = match_any(&patterns::QUALITY_SET_TO, &message_text) {
                parsed_change = patterns::capture_i64(&caps, "quantity");
            }
        }
        MessageKind::PyramidQualityChange => {
            if let (Some(change), Some(name)) = (derived_change, &quality_name) {
                let direction = if change > 0 {
                    "increasing..."
                } else {
                    "decreasing..."
                };
                let signed = if change > 0 {
                    format!("+{change}")
                } else {
                    change.to_string()
                };
                message_text = format!("{name} is {direction} ({signed})");
            }
        }
        MessageKind::DifficultyRollSuccess | MessageKind::DifficultyRollFailure => {
            message_text =
                message_text.replace(" (Simple challenges mean you don't learn so much.)", "");
        }
        _ => {}
    }

    let mut change = derived_change;
    if let Some(parsed) = parsed_change {
        if change != Some(parsed) {
            if change.is_some() {
                warn!(
                    derived = ?change,
                    parsed,
                    "ledger-derived change disagrees with message text, using parsed"
                );
            }
            change = Some(parsed);
        }
    }

    Some(InterpretedMessage {
        kind,
        text: text::normalize(&message_text),
        change,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::PossessionSnapshot;

    fn possession(id: i64, name: &str, level: i64) -> PossessionSnapshot {
        PossessionSnapshot {
            id,
            name: name.to_string(),
            category: "Story".to_string(),
            nature: "Status".to_string(),
            level,
            progress_as_percentage: 0,
            cap: None,
        }
    }

    fn message(kind: &str, body: &str, possession: Option<PossessionSnapshot>) -> OutcomeMessageSnapshot {
        OutcomeMessageSnapshot {
            kind: kind.to_string(),
            message: Some(body.to_string()),
            image: None,
            possession,
            area: None,
            setting: None,
        }
    }

    #[test]
    fn test_requirement_constraint_shapes() {
        assert_eq!(
            interpret_requirement(
                "You unlocked this by having no <span class='quality-name'>Scandal</span>"
            ),
            RequirementConstraint::AtMost(0)
        );
        assert_eq!(
            interpret_requirement("You need a <span class='quality-name'>Clue</span>"),
            RequirementConstraint::AtLeast(1)
        );
        assert_eq!(
            interpret_requirement("You need 5 <span class='quality-name'>Shadowy</span>"),
            RequirementConstraint::AtLeast(5)
        );
        assert_eq!(
            interpret_requirement("You need <span class='quality-name'>Fate</span> exactly 2"),
            RequirementConstraint::Between { min: 2, max: 2 }
        );
        assert_eq!(
            interpret_requirement(
                "You need <span class='quality-name'>The Airs of London</span> 1-50"
            ),
            RequirementConstraint::Between { min: 1, max: 50 }
        );
    }

    #[test]
    fn test_requirement_wordy_values() {
        let constraint = interpret_requirement(
            "Unlocked when <span class='quality-name'>Destiny</span> is:\
             <ul class='wordy-list'><li>the Fire</li><li><em>the Gleam</em></li></ul>",
        );
        assert_eq!(
            constraint,
            RequirementConstraint::OneOf(vec!["the Fire".into(), "the Gleam".into()])
        );
    }

    #[test]
    fn test_requirement_fallback_never_fails() {
        let constraint = interpret_requirement("Some phrasing nobody has seen before");
        assert_eq!(
            constraint,
            RequirementConstraint::Unrecognized("Some phrasing nobody has seen before".into())
        );
    }

    #[test]
    fn test_standard_change_derived_from_ledger() {
        let mut session = RecordingSession::new();
        session.update_possession(&possession(7, "Clue", 4));

        let interpreted = interpret_message(
            &mut session,
            &message(
                "StandardQualityChangeMessage",
                "You've gained 2 x Clue.",
                Some(possession(7, "Clue", 6)),
            ),
        )
        .unwrap();
        assert_eq!(interpreted.kind, MessageKind::StandardQualityChange);
        assert_eq!(interpreted.change, Some(2));
        assert_eq!(interpreted.text, "You've gained 2 x Clue.");
        // The ledger now reflects the new level.
        assert_eq!(session.possession(7).unwrap().level, 6);
    }

    #[test]
    fn test_parsed_change_wins_over_stale_ledger() {
        let mut session = RecordingSession::new();
        // Ledger thinks the level is 1; the game says we gained 3 onto 4.
        session.update_possession(&possession(7, "Rostygold", 1));

        let interpreted = interpret_message(
            &mut session,
            &message(
                "StandardQualityChangeMessage",
                "You've gained 3 x Rostygold (new total 211).",
                Some(possession(7, "Rostygold", 211)),
            ),
        )
        .unwrap();
        assert_eq!(interpreted.change, Some(3));
        // Noisy "new total" phrasing is rewritten to the canonical form.
        assert_eq!(interpreted.text, "You've gained 3 x Rostygold.");
    }

    #[test]
    fn test_loss_is_negative() {
        let mut session = RecordingSession::new();
        let interpreted = interpret_message(
            &mut session,
            &message(
                "StandardQualityChangeMessage",
                "You've lost 1 x Rostygold (new total 208).",
                None,
            ),
        )
        .unwrap();
        assert_eq!(interpreted.change, Some(-1));
        assert_eq!(interpreted.text, "You've lost 1 x Rostygold.");
    }

    #[test]
    fn test_pyramid_change_composed_from_cp() {
        let mut session = RecordingSession::new();
        session.update_possession(&possession(3, "Watchful", 2));

        let mut next = possession(3, "Watchful", 2);
        next.progress_as_percentage = 50;
        let interpreted = interpret_message(
            &mut session,
            &message(
                "PyramidQualityChangeMessage",
                "Watchful is dropping... or rising...",
                Some(next),
            ),
        )
        .unwrap();
        // cp went from 3 to 5.
        assert_eq!(interpreted.change, Some(2));
        assert_eq!(interpreted.text, "Watchful is increasing... (+2)");
    }

    #[test]
    fn test_explicit_set_to_zero() {
        let mut session = RecordingSession::new();
        let interpreted = interpret_message(
            &mut session,
            &message(
                "QualityExplicitlySetMessage",
                "Your 'Nightmares' Quality has gone!",
                None,
            ),
        )
        .unwrap();
        assert_eq!(interpreted.change, Some(0));
    }

    #[test]
    fn test_roll_messages_strip_simple_challenge_note() {
        let mut session = RecordingSession::new();
        let interpreted = interpret_message(
            &mut session,
            &message(
                "DifficultyRollSuccessMessage",
                "You succeeded! (Simple challenges mean you don't learn so much.)",
                None,
            ),
        )
        .unwrap();
        assert_eq!(interpreted.text, "You succeeded!");
    }

    #[test]
    fn test_unknown_kind_skipped() {
        let mut session = RecordingSession::new();
        assert!(interpret_message(
            &mut session,
            &message("BrandNewMessage", "Something novel.", None),
        )
        .is_none());
    }

    #[test]
    fn test_textless_message_skipped() {
        let mut session = RecordingSession::new();
        let mut snapshot = message("MapShouldUpdateMessage", "", None);
        snapshot.message = None;
        assert!(interpret_message(&mut session, &snapshot).is_none());
    }
}
