//! Snapshot recorder: folds incoming game snapshots into the store.
//!
//! Every public function runs against a caller-supplied connection so a
//! whole submission can share one transaction. Scalars overlay the stored
//! entity (absent fields never erase known values); narrative fields flow
//! through the observation merge engine instead.

use chrono::Utc;
use chronicle_db::queries::{
    choices, events, locations, observations, ordering, outcomes, qualities, settings,
};
use rusqlite::Connection;
use tracing::debug;

use crate::error::ChronicleResult;
use crate::images::{ImageCache, ImageKind};
use crate::interpret;
use crate::ledger::RecordingSession;
use crate::merge::merge_or_append;
use crate::model::{
    Challenge, ChoiceObservation, ChoiceObservationFields, EventObservation,
    EventObservationFields, MessageKind, OutcomeMessage, OutcomeObservation,
    OutcomeObservationFields, Requirement,
};
use crate::snapshot::{
    CardSnapshot, ChallengeSnapshot, ChoiceSnapshot, EventSnapshot, LocationSnapshot,
    OutcomeEventSnapshot, OutcomeMessageSnapshot, RequirementSnapshot, SettingSnapshot,
};
use crate::text;

/// What came out of recording an outcome submission.
#[derive(Debug, Clone)]
pub struct RecordedOutcome {
    pub observation_id: i64,
    pub new_location_id: Option<i64>,
    pub new_setting_id: Option<i64>,
}

/// Record a location snapshot, optionally linking it to a setting.
pub fn record_location(
    conn: &Connection,
    images: &dyn ImageCache,
    snapshot: &LocationSnapshot,
    setting_id: Option<i64>,
) -> ChronicleResult<i64> {
    let mut row = locations::get_or_create(conn, snapshot.id)?;
    row.name = Some(snapshot.name.clone());
    if snapshot.description.is_some() {
        row.description = text::normalize_opt(snapshot.description.as_deref());
    }
    if let Some(image) = images.cache_or_get(ImageKind::Header, snapshot.image.as_deref()) {
        row.image = Some(image);
    }
    if snapshot.kind.is_some() {
        row.kind = snapshot.kind.clone();
    }
    locations::save_scalars(conn, &row)?;
    if let Some(setting_id) = setting_id {
        settings::get_or_create(conn, setting_id)?;
        locations::link_setting(conn, snapshot.id, setting_id)?;
    }
    Ok(snapshot.id)
}

/// Record a setting snapshot, optionally linking it to a location.
pub fn record_setting(
    conn: &Connection,
    snapshot: &SettingSnapshot,
    location_id: Option<i64>,
) -> ChronicleResult<i64> {
    let mut row = settings::get_or_create(conn, snapshot.id)?;
    if snapshot.name.is_some() {
        row.name = snapshot.name.clone();
    }
    row.can_change_outfit = Some(snapshot.can_change_outfit);
    row.can_travel = Some(snapshot.can_travel);
    row.is_infinite_draw = Some(snapshot.is_infinite_draw);
    if snapshot.items_usable_here.is_some() {
        row.items_usable_here = snapshot.items_usable_here;
    }
    settings::save_scalars(conn, &row)?;
    if let Some(location_id) = location_id {
        locations::get_or_create(conn, location_id)?;
        locations::link_setting(conn, location_id, snapshot.id)?;
    }
    Ok(snapshot.id)
}

/// Record a viewed story event with its choices, linked into the location
/// and setting it was seen in.
pub fn record_event(
    conn: &Connection,
    images: &dyn ImageCache,
    location_id: i64,
    setting_id: i64,
    snapshot: &EventSnapshot,
) -> ChronicleResult<i64> {
    let mut row = events::get_or_create(conn, snapshot.id)?;
    if snapshot.can_go_back.is_some() {
        row.can_go_back = snapshot.can_go_back;
    }
    if snapshot.category.is_some() {
        row.category = snapshot.category.clone();
    }
    if snapshot.distribution.is_some() {
        row.distribution = snapshot.distribution.clone();
    }
    if snapshot.frequency.is_some() {
        row.frequency = snapshot.frequency.clone();
    }
    if snapshot.urgency.is_some() {
        row.urgency = snapshot.urgency.clone();
    }
    if let Some(image) = images.cache_or_get(ImageKind::Icon, snapshot.image.as_deref()) {
        row.image = Some(image);
    }
    events::save_scalars(conn, &row)?;

    let candidate = EventObservationFields {
        name: Some(snapshot.name.clone()),
        description: text::normalize_opt(snapshot.description.as_deref()),
        teaser: text::normalize_opt(snapshot.teaser.as_deref()),
        requirements: Some(record_requirements(
            conn,
            images,
            &snapshot.quality_requirements,
        )?),
    };
    let mut history = load_event_history(conn, snapshot.id)?;
    let settled = merge_or_append(&mut history, candidate, Utc::now());
    persist_event_observation(conn, snapshot.id, &mut history[settled])?;

    if let Some(choices) = &snapshot.child_branches {
        for choice in choices {
            let choice_id = record_choice(conn, images, choice)?;
            choices::attach_to_event(conn, choice_id, snapshot.id)?;
        }
    }

    locations::get_or_create(conn, location_id)?;
    locations::link_event(conn, location_id, snapshot.id)?;
    settings::get_or_create(conn, setting_id)?;
    settings::link_event(conn, setting_id, snapshot.id)?;
    Ok(snapshot.id)
}

/// Record an opportunity card. Cards are story events flagged as drawn from
/// the deck, carrying deck metadata instead of the viewed-event scalars.
pub fn record_opportunity(
    conn: &Connection,
    images: &dyn ImageCache,
    location_id: i64,
    setting_id: i64,
    snapshot: &CardSnapshot,
) -> ChronicleResult<i64> {
    let mut row = events::get_or_create(conn, snapshot.event_id)?;
    if snapshot.category.is_some() {
        row.category = snapshot.category.clone();
    }
    if let Some(image) = images.cache_or_get(ImageKind::Icon, snapshot.image.as_deref()) {
        row.image = Some(image);
    }
    row.is_card = true;
    row.is_autofire = snapshot.is_autofire;
    if snapshot.stickiness.is_some() {
        row.stickiness = snapshot.stickiness.clone();
    }
    events::save_scalars(conn, &row)?;

    let candidate = EventObservationFields {
        name: Some(snapshot.name.clone()),
        description: None,
        teaser: text::normalize_opt(snapshot.teaser.as_deref()),
        requirements: Some(record_requirements(
            conn,
            images,
            &snapshot.quality_requirements,
        )?),
    };
    let mut history = load_event_history(conn, snapshot.event_id)?;
    let settled = merge_or_append(&mut history, candidate, Utc::now());
    persist_event_observation(conn, snapshot.event_id, &mut history[settled])?;

    locations::get_or_create(conn, location_id)?;
    locations::link_event(conn, location_id, snapshot.event_id)?;
    settings::get_or_create(conn, setting_id)?;
    settings::link_event(conn, setting_id, snapshot.event_id)?;
    Ok(snapshot.event_id)
}

/// Record a hand of opportunity cards.
pub fn record_opportunities(
    conn: &Connection,
    images: &dyn ImageCache,
    location_id: i64,
    setting_id: i64,
    snapshots: &[CardSnapshot],
) -> ChronicleResult<Vec<i64>> {
    snapshots
        .iter()
        .map(|snapshot| record_opportunity(conn, images, location_id, setting_id, snapshot))
        .collect()
}

/// Record the story events listed at the top level of a location.
///
/// The listing carries the only ordering signal we ever get, and only for
/// the events on screen together, so each adjacent pair becomes a stored
/// before/after fact for later order reconstruction.
pub fn record_location_events(
    conn: &Connection,
    images: &dyn ImageCache,
    location_id: i64,
    setting_id: i64,
    snapshots: &[EventSnapshot],
) -> ChronicleResult<Vec<i64>> {
    let mut ids = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        let id = record_event(conn, images, location_id, setting_id, snapshot)?;
        events::set_top_level(conn, id)?;
        ids.push(id);
    }
    for pair in ids.windows(2) {
        ordering::record_before(conn, pair[0], pair[1])?;
    }
    Ok(ids)
}

/// Record one choice of a story event.
pub fn record_choice(
    conn: &Connection,
    images: &dyn ImageCache,
    snapshot: &ChoiceSnapshot,
) -> ChronicleResult<i64> {
    let mut row = choices::get_or_create(conn, snapshot.id)?;
    if let Some(action_cost) = snapshot.action_cost {
        row.action_cost = action_cost;
    }
    if let Some(button_text) = &snapshot.button_text {
        row.button_text = button_text.clone();
    }
    if let Some(image) = images.cache_or_get(ImageKind::Icon, snapshot.image.as_deref()) {
        row.image = Some(image);
    }
    row.ordering = snapshot.ordering;
    choices::save_scalars(conn, &row)?;

    let candidate = ChoiceObservationFields {
        name: snapshot.name.clone(),
        description: text::normalize_opt(snapshot.description.as_deref()),
        currency_cost: snapshot.currency_cost,
        challenges: Some(
            snapshot
                .challenges
                .iter()
                .map(|challenge| record_challenge(images, challenge))
                .collect(),
        ),
        requirements: Some(record_requirements(
            conn,
            images,
            &snapshot.quality_requirements,
        )?),
    };
    let mut history = load_choice_history(conn, snapshot.id)?;
    let settled = merge_or_append(&mut history, candidate, Utc::now());
    persist_choice_observation(conn, snapshot.id, &mut history[settled])?;
    Ok(snapshot.id)
}

/// Record the resolution of a choice: interpret its messages against the
/// session ledger, follow any redirects, and merge the resulting outcome
/// observation into the choice's history.
///
/// Returns `Ok(None)` when the choice has never been recorded; an outcome
/// for an unknown choice carries no usable context and is dropped rather
/// than failing the submission.
#[allow(clippy::too_many_arguments)]
pub fn record_outcome(
    conn: &Connection,
    images: &dyn ImageCache,
    session: &mut RecordingSession,
    choice_id: i64,
    end_event: Option<&OutcomeEventSnapshot>,
    messages: &[OutcomeMessageSnapshot],
    redirect: Option<&EventSnapshot>,
    location_id: i64,
    setting_id: i64,
) -> ChronicleResult<Option<RecordedOutcome>> {
    let Some(choice_row) = choices::get(conn, choice_id)? else {
        debug!(choice_id, "outcome for unrecorded choice, skipping");
        return Ok(None);
    };

    let mut redirect_location = None;
    let mut redirect_setting = None;
    let mut outcome_messages = Vec::new();
    for message in messages {
        let Some(interpreted) = interpret::interpret_message(session, message) else {
            continue;
        };
        let quality_id = match &message.possession {
            Some(possession) => {
                qualities::upsert(
                    conn,
                    possession.id,
                    &possession.name,
                    &possession.category,
                    &possession.nature,
                )?;
                Some(possession.id)
            }
            None => None,
        };
        outcome_messages.push(OutcomeMessage {
            row_id: None,
            kind: interpreted.kind,
            text: interpreted.text,
            image: images.cache_or_get(ImageKind::IconSmall, message.image.as_deref()),
            quality_id,
            change: interpreted.change,
        });
        if let Some(area) = &message.area {
            redirect_location = Some(record_location(conn, images, area, None)?);
        } else if let Some(setting) = &message.setting {
            redirect_setting = Some(record_setting(conn, setting, None)?);
        }
    }

    // A move to a new location and/or setting links the two together; a move
    // to only one of them links it with the position the player already held.
    match (redirect_location, redirect_setting) {
        (Some(location), Some(setting)) => {
            locations::link_setting(conn, location, setting)?;
        }
        (Some(location), None) => {
            settings::get_or_create(conn, setting_id)?;
            locations::link_setting(conn, location, setting_id)?;
        }
        (None, Some(setting)) => {
            locations::get_or_create(conn, location_id)?;
            locations::link_setting(conn, location_id, setting)?;
        }
        (None, None) => {}
    }

    let is_success = !outcome_messages
        .iter()
        .any(|message| message.kind == MessageKind::DifficultyRollFailure);

    let redirect_event_id = match redirect {
        Some(redirect) => Some(record_event(
            conn,
            images,
            redirect_location.unwrap_or(location_id),
            redirect_setting.unwrap_or(setting_id),
            redirect,
        )?),
        None => None,
    };

    let image = end_event
        .and_then(|event| images.cache_or_get(ImageKind::Icon, event.image.as_deref()))
        .or(choice_row.image);
    let candidate = OutcomeObservationFields {
        name: end_event.map(|event| event.name.clone()),
        description: end_event
            .and_then(|event| text::normalize_opt(event.description.as_deref())),
        image,
        is_success: Some(is_success),
        messages: Some(outcome_messages),
        redirect_event_id,
        redirect_location_id: redirect_location,
        redirect_setting_id: redirect_setting,
        redirect_choice_id: None,
    };
    let mut history = load_outcome_history(conn, choice_id)?;
    let settled = merge_or_append(&mut history, candidate, Utc::now());
    let observation_id = persist_outcome_observation(conn, choice_id, &mut history[settled])?;
    Ok(Some(RecordedOutcome {
        observation_id,
        new_location_id: redirect_location,
        new_setting_id: redirect_setting,
    }))
}

/// Interpret and intern a snapshot's quality requirements.
fn record_requirements(
    conn: &Connection,
    images: &dyn ImageCache,
    snapshots: &[RequirementSnapshot],
) -> ChronicleResult<Vec<Requirement>> {
    let mut requirements = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        qualities::upsert(
            conn,
            snapshot.quality_id,
            snapshot.quality_name.as_deref().unwrap_or_default(),
            snapshot.category.as_deref().unwrap_or_default(),
            snapshot.nature.as_deref().unwrap_or_default(),
        )?;
        requirements.push(Requirement {
            row_id: None,
            upstream_id: snapshot.id,
            quality_id: snapshot.quality_id,
            is_cost: snapshot.is_cost,
            image: images.cache_or_get(ImageKind::IconSmall, snapshot.image.as_deref()),
            constraint: interpret::interpret_requirement(
                snapshot.tooltip.as_deref().unwrap_or_default(),
            ),
        });
    }
    Ok(requirements)
}

fn record_challenge(images: &dyn ImageCache, snapshot: &ChallengeSnapshot) -> Challenge {
    Challenge {
        row_id: None,
        upstream_id: snapshot.id,
        category: snapshot.category.clone().unwrap_or_default(),
        name: snapshot.name.clone(),
        description: text::normalize_opt(snapshot.description.as_deref()).unwrap_or_default(),
        image: images.cache_or_get(ImageKind::IconSmall, snapshot.image.as_deref()),
        target: snapshot.target_number.unwrap_or_default(),
        nature: snapshot.nature.clone().unwrap_or_default(),
        kind: snapshot.kind.clone().unwrap_or_default(),
    }
}

/// Load a story event's observation history with interpreted requirements.
pub fn load_event_history(
    conn: &Connection,
    event_id: i64,
) -> ChronicleResult<Vec<EventObservation>> {
    let rows = observations::list_event_observations(conn, event_id)?;
    let mut history = Vec::with_capacity(rows.len());
    for row in rows {
        let requirements =
            observations::list_requirements(conn, observations::OWNER_EVENT, row.id)?
                .iter()
                .map(Requirement::from_row)
                .collect();
        history.push(EventObservation::from_row(&row, requirements));
    }
    Ok(history)
}

/// Load a choice's observation history with challenges and requirements.
pub fn load_choice_history(
    conn: &Connection,
    choice_id: i64,
) -> ChronicleResult<Vec<ChoiceObservation>> {
    let rows = observations::list_choice_observations(conn, choice_id)?;
    let mut history = Vec::with_capacity(rows.len());
    for row in rows {
        let challenges = observations::list_challenges(conn, row.id)?
            .iter()
            .map(Challenge::from_row)
            .collect();
        let requirements =
            observations::list_requirements(conn, observations::OWNER_CHOICE, row.id)?
                .iter()
                .map(Requirement::from_row)
                .collect();
        history.push(ChoiceObservation::from_row(&row, challenges, requirements));
    }
    Ok(history)
}

/// Load a choice's outcome observation history with messages.
pub fn load_outcome_history(
    conn: &Connection,
    choice_id: i64,
) -> ChronicleResult<Vec<OutcomeObservation>> {
    let rows = outcomes::list_for_choice(conn, choice_id)?;
    let mut history = Vec::with_capacity(rows.len());
    for row in rows {
        let messages = outcomes::list_messages(conn, row.id)?
            .iter()
            .filter_map(OutcomeMessage::from_row)
            .collect();
        history.push(OutcomeObservation::from_row(&row, messages));
    }
    Ok(history)
}

fn persist_event_observation(
    conn: &Connection,
    event_id: i64,
    observation: &mut EventObservation,
) -> ChronicleResult<()> {
    let last_modified = observation.last_modified.to_rfc3339();
    let id = match observation.row_id {
        Some(id) => {
            observations::update_event_observation(
                conn,
                id,
                &last_modified,
                observation.name.as_deref(),
                observation.description.as_deref(),
                observation.teaser.as_deref(),
            )?;
            id
        }
        None => {
            let id = observations::insert_event_observation(
                conn,
                event_id,
                &last_modified,
                observation.name.as_deref(),
                observation.description.as_deref(),
                observation.teaser.as_deref(),
            )?;
            observation.row_id = Some(id);
            id
        }
    };
    if let Some(requirements) = &observation.requirements {
        let rows: Vec<_> = requirements.iter().map(|req| req.to_row(id)).collect();
        observations::replace_requirements(conn, observations::OWNER_EVENT, id, &rows)?;
    }
    Ok(())
}

fn persist_choice_observation(
    conn: &Connection,
    choice_id: i64,
    observation: &mut ChoiceObservation,
) -> ChronicleResult<()> {
    let last_modified = observation.last_modified.to_rfc3339();
    let id = match observation.row_id {
        Some(id) => {
            observations::update_choice_observation(
                conn,
                id,
                &last_modified,
                observation.name.as_deref(),
                observation.description.as_deref(),
                observation.currency_cost,
            )?;
            id
        }
        None => {
            let id = observations::insert_choice_observation(
                conn,
                choice_id,
                &last_modified,
                observation.name.as_deref(),
                observation.description.as_deref(),
                observation.currency_cost,
            )?;
            observation.row_id = Some(id);
            id
        }
    };
    if let Some(challenges) = &observation.challenges {
        let rows: Vec<_> = challenges
            .iter()
            .map(|challenge| challenge.to_row(id))
            .collect();
        observations::replace_challenges(conn, id, &rows)?;
    }
    if let Some(requirements) = &observation.requirements {
        let rows: Vec<_> = requirements.iter().map(|req| req.to_row(id)).collect();
        observations::replace_requirements(conn, observations::OWNER_CHOICE, id, &rows)?;
    }
    Ok(())
}

fn persist_outcome_observation(
    conn: &Connection,
    choice_id: i64,
    observation: &mut OutcomeObservation,
) -> ChronicleResult<i64> {
    let id = match observation.row_id {
        Some(id) => {
            outcomes::update(conn, &observation.to_row(choice_id))?;
            id
        }
        None => {
            let id = outcomes::insert(conn, &observation.to_row(choice_id))?;
            observation.row_id = Some(id);
            id
        }
    };
    if let Some(messages) = &observation.messages {
        let rows: Vec<_> = messages.iter().map(|message| message.to_row(id)).collect();
        outcomes::replace_messages(conn, id, &rows)?;
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::NullImageCache;
    use chronicle_db::DbPool;

    fn requirement(id: i64, quality_id: i64, tooltip: &str) -> RequirementSnapshot {
        RequirementSnapshot {
            id,
            quality_id,
            quality_name: Some("Shadowy".into()),
            category: Some("BasicAbility".into()),
            nature: Some("Status".into()),
            image: Some("shadowy".into()),
            is_cost: false,
            tooltip: Some(tooltip.into()),
        }
    }

    fn event(id: i64, name: &str) -> EventSnapshot {
        EventSnapshot {
            id,
            name: name.into(),
            teaser: Some("A teaser.".into()),
            description: Some("A description.".into()),
            category: Some("Unspecialised".into()),
            distribution: None,
            frequency: None,
            urgency: None,
            image: Some("book".into()),
            can_go_back: Some(true),
            quality_requirements: vec![requirement(
                1,
                42,
                "You need 5 <span class='quality-name'>Shadowy</span>",
            )],
            child_branches: None,
        }
    }

    fn choice(id: i64, name: &str) -> ChoiceSnapshot {
        ChoiceSnapshot {
            id,
            name: Some(name.into()),
            description: Some("Do the thing.".into()),
            image: Some("hand".into()),
            action_cost: Some(1),
            currency_cost: None,
            button_text: Some("Go".into()),
            ordering: 0,
            challenges: vec![],
            quality_requirements: vec![],
        }
    }

    #[test]
    fn test_record_event_is_idempotent() {
        let pool = DbPool::in_memory().unwrap();
        let images = NullImageCache;
        pool.with_tx::<_, crate::ChronicleError>(|tx| {
            record_event(tx, &images, 10, 20, &event(1, "The Shuttered Shop"))?;
            record_event(tx, &images, 10, 20, &event(1, "The Shuttered Shop"))?;
            let history = load_event_history(tx, 1)?;
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].name.as_deref(), Some("The Shuttered Shop"));
            let requirements = history[0].requirements.as_ref().unwrap();
            assert_eq!(requirements.len(), 1);
            assert_eq!(requirements[0].image.as_deref(), Some("/icons_small/shadowy.png"));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_changed_event_text_appends_new_observation() {
        let pool = DbPool::in_memory().unwrap();
        let images = NullImageCache;
        pool.with_tx::<_, crate::ChronicleError>(|tx| {
            record_event(tx, &images, 10, 20, &event(1, "Before the Fire"))?;
            record_event(tx, &images, 10, 20, &event(1, "After the Fire"))?;
            let history = load_event_history(tx, 1)?;
            assert_eq!(history.len(), 2);
            // Newest first.
            assert_eq!(history[0].name.as_deref(), Some("After the Fire"));
            assert_eq!(history[1].name.as_deref(), Some("Before the Fire"));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_record_event_records_choices() {
        let pool = DbPool::in_memory().unwrap();
        let images = NullImageCache;
        pool.with_tx::<_, crate::ChronicleError>(|tx| {
            let mut snapshot = event(1, "A Crossroads");
            snapshot.child_branches = Some(vec![choice(100, "Left"), choice(101, "Right")]);
            record_event(tx, &images, 10, 20, &snapshot)?;
            let mut ids = events::choice_ids(tx, 1)?;
            ids.sort_unstable();
            assert_eq!(ids, vec![100, 101]);
            let history = load_choice_history(tx, 100)?;
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].name.as_deref(), Some("Left"));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_record_location_events_stores_order_pairs() {
        let pool = DbPool::in_memory().unwrap();
        let images = NullImageCache;
        pool.with_tx::<_, crate::ChronicleError>(|tx| {
            let snapshots = vec![event(1, "First"), event(2, "Second"), event(3, "Third")];
            let ids = record_location_events(tx, &images, 10, 20, &snapshots)?;
            assert_eq!(ids, vec![1, 2, 3]);
            let mut pairs = ordering::pairs_among(tx, &ids)?;
            pairs.sort_unstable();
            assert_eq!(pairs, vec![(1, 2), (2, 3)]);
            for id in ids {
                assert!(events::get(tx, id)?.unwrap().is_top_level);
            }
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_reversed_listing_flips_order_pair() {
        let pool = DbPool::in_memory().unwrap();
        let images = NullImageCache;
        pool.with_tx::<_, crate::ChronicleError>(|tx| {
            record_location_events(tx, &images, 10, 20, &[event(1, "A"), event(2, "B")])?;
            record_location_events(tx, &images, 10, 20, &[event(2, "B"), event(1, "A")])?;
            let pairs = ordering::pairs_among(tx, &[1, 2])?;
            assert_eq!(pairs, vec![(2, 1)]);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_record_opportunity_flags_card() {
        let pool = DbPool::in_memory().unwrap();
        let images = NullImageCache;
        pool.with_tx::<_, crate::ChronicleError>(|tx| {
            let card = CardSnapshot {
                event_id: 7,
                name: "An Unsigned Letter".into(),
                teaser: Some("Who sent it?".into()),
                category: Some("Unspecialised".into()),
                image: Some("letter".into()),
                stickiness: Some("Discardable".into()),
                is_autofire: false,
                quality_requirements: vec![],
            };
            record_opportunity(tx, &images, 10, 20, &card)?;
            let row = events::get(tx, 7)?.unwrap();
            assert!(row.is_card);
            assert!(!row.is_autofire);
            assert_eq!(row.stickiness.as_deref(), Some("Discardable"));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_outcome_for_unknown_choice_is_dropped() {
        let pool = DbPool::in_memory().unwrap();
        let images = NullImageCache;
        let mut session = RecordingSession::new();
        let recorded = pool
            .with_tx::<_, crate::ChronicleError>(|tx| {
                record_outcome(tx, &images, &mut session, 999, None, &[], None, 10, 20)
            })
            .unwrap();
        assert!(recorded.is_none());
    }

    #[test]
    fn test_record_outcome_interprets_messages() {
        let pool = DbPool::in_memory().unwrap();
        let images = NullImageCache;
        let mut session = RecordingSession::new();
        pool.with_tx::<_, crate::ChronicleError>(|tx| {
            let mut snapshot = event(1, "A Crossroads");
            snapshot.child_branches = Some(vec![choice(100, "Left")]);
            record_event(tx, &images, 10, 20, &snapshot)?;

            let messages = vec![OutcomeMessageSnapshot {
                kind: "StandardQualityChangeMessage".into(),
                message: Some("You've gained 2 x Clue.".into()),
                image: Some("clue".into()),
                possession: Some(crate::snapshot::PossessionSnapshot {
                    id: 77,
                    name: "Clue".into(),
                    category: "Mysteries".into(),
                    nature: "Thing".into(),
                    level: 2,
                    progress_as_percentage: 0,
                    cap: None,
                }),
                area: None,
                setting: None,
            }];
            let end_event = OutcomeEventSnapshot {
                id: 5000,
                name: "A Find".into(),
                description: Some("You found something.".into()),
                image: Some("magnifier".into()),
            };
            let recorded = record_outcome(
                tx,
                &images,
                &mut session,
                100,
                Some(&end_event),
                &messages,
                None,
                10,
                20,
            )?
            .unwrap();
            assert!(recorded.new_location_id.is_none());

            let history = load_outcome_history(tx, 100)?;
            assert_eq!(history.len(), 1);
            let observation = &history[0];
            assert_eq!(observation.row_id, Some(recorded.observation_id));
            assert_eq!(observation.is_success, Some(true));
            let messages = observation.messages.as_ref().unwrap();
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].change, Some(2));
            assert_eq!(messages[0].quality_id, Some(77));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_outcome_redirect_records_new_location() {
        let pool = DbPool::in_memory().unwrap();
        let images = NullImageCache;
        let mut session = RecordingSession::new();
        pool.with_tx::<_, crate::ChronicleError>(|tx| {
            let mut snapshot = event(1, "Departures");
            snapshot.child_branches = Some(vec![choice(100, "Leave")]);
            record_event(tx, &images, 10, 20, &snapshot)?;

            let messages = vec![OutcomeMessageSnapshot {
                kind: "AreaChangeMessage".into(),
                message: Some("You are elsewhere now.".into()),
                image: None,
                possession: None,
                area: Some(LocationSnapshot {
                    id: 30,
                    name: "The Docks".into(),
                    description: None,
                    image: None,
                    kind: None,
                }),
                setting: None,
            }];
            let recorded = record_outcome(
                tx, &images, &mut session, 100, None, &messages, None, 10, 20,
            )?
            .unwrap();
            assert_eq!(recorded.new_location_id, Some(30));
            // The new location is linked with the setting the player held.
            assert!(locations::setting_ids(tx, 30)?.contains(&20));
            let history = load_outcome_history(tx, 100)?;
            assert_eq!(history[0].redirect_location_id, Some(30));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_outcome_failure_marks_unsuccessful() {
        let pool = DbPool::in_memory().unwrap();
        let images = NullImageCache;
        let mut session = RecordingSession::new();
        pool.with_tx::<_, crate::ChronicleError>(|tx| {
            let mut snapshot = event(1, "A Gamble");
            snapshot.child_branches = Some(vec![choice(100, "Risk it")]);
            record_event(tx, &images, 10, 20, &snapshot)?;

            let messages = vec![OutcomeMessageSnapshot {
                kind: "DifficultyRollFailureMessage".into(),
                message: Some("You failed!".into()),
                image: None,
                possession: None,
                area: None,
                setting: None,
            }];
            let recorded = record_outcome(
                tx, &images, &mut session, 100, None, &messages, None, 10, 20,
            )?
            .unwrap();
            let observation = outcomes::get(tx, recorded.observation_id)?.unwrap();
            assert_eq!(observation.is_success, Some(false));
            Ok(())
        })
        .unwrap();
    }
}
