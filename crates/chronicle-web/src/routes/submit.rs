//! Submission route handlers.
//!
//! The recording userscript posts game snapshots here. Envelopes carry the
//! submitter's API key and position; payload bodies are the game's own JSON
//! shapes (see `chronicle_core::snapshot`). Recording work is synchronous
//! sqlite, so every handler runs it on a blocking thread.

use axum::{extract::State, http::StatusCode, Json};
use chronicle_core::recorder;
use chronicle_core::snapshot::{
    CardSnapshot, EventSnapshot, LocationSnapshot, OutcomeMessageSnapshot, OutcomeSnapshot,
    PossessionSnapshot, SettingSnapshot,
};
use chronicle_db::queries::{outcomes, users};
use serde::{Deserialize, Serialize};

use crate::auth::authorize;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeSubmitResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub outcome_observation_id: Option<i64>,
    pub new_location_id: Option<i64>,
    pub new_setting_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PossessionsRequest {
    pub api_key: String,
    pub possessions: Vec<PossessionCategoryGroup>,
}

/// The game reports possessions grouped by display category.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PossessionCategoryGroup {
    pub possessions: Vec<PossessionSnapshot>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    pub api_key: String,
    pub location: LocationSnapshot,
    pub setting_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingRequest {
    pub api_key: String,
    pub setting: SettingSnapshot,
    pub location_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunitiesRequest {
    pub api_key: String,
    pub location_id: i64,
    pub setting_id: i64,
    pub display_cards: Vec<CardSnapshot>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListRequest {
    pub api_key: String,
    pub location_id: i64,
    pub setting_id: i64,
    pub events: Vec<EventSnapshot>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventViewRequest {
    pub api_key: String,
    pub location_id: i64,
    pub setting_id: i64,
    pub event: EventSnapshot,
    /// Outcome observation id to back-link when this view was reached by
    /// following an outcome redirect.
    pub is_linking_from_outcome_observation: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRequest {
    pub api_key: String,
    pub location_id: i64,
    pub setting_id: i64,
    pub choice_id: i64,
    pub end_event: Option<OutcomeSnapshot>,
    pub messages: Option<Vec<OutcomeMessageSnapshot>>,
    pub redirect: Option<EventSnapshot>,
    pub is_linking_from_outcome_observation: Option<i64>,
}

type HandlerResult<T> = Result<Json<T>, (StatusCode, String)>;

async fn run_blocking<T: Send + 'static>(
    f: impl FnOnce() -> chronicle_core::ChronicleResult<T> + Send + 'static,
) -> Result<T, (StatusCode, String)> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

fn require_user(
    state: &AppState,
    api_key: &str,
) -> chronicle_core::ChronicleResult<Option<users::UserRow>> {
    Ok(authorize(&state.db, api_key)?)
}

/// Replace the submitter's possession ledger from a full possessions page.
pub async fn possessions(
    State(state): State<AppState>,
    Json(req): Json<PossessionsRequest>,
) -> HandlerResult<SubmitResponse> {
    let response = run_blocking(move || {
        let Some(user) = require_user(&state, &req.api_key)? else {
            return Ok(SubmitResponse::failure("Invalid API key"));
        };
        state.with_session(user.id, |session| {
            session.replace_possessions(
                req.possessions
                    .iter()
                    .flat_map(|group| group.possessions.iter()),
            );
        });
        Ok(SubmitResponse::ok())
    })
    .await?;
    Ok(Json(response))
}

pub async fn location(
    State(state): State<AppState>,
    Json(req): Json<LocationRequest>,
) -> HandlerResult<SubmitResponse> {
    let response = run_blocking(move || {
        if require_user(&state, &req.api_key)?.is_none() {
            return Ok(SubmitResponse::failure("Invalid API key"));
        }
        state.db.with_tx(|tx| {
            recorder::record_location(tx, state.images.as_ref(), &req.location, req.setting_id)
        })?;
        Ok(SubmitResponse::ok())
    })
    .await?;
    Ok(Json(response))
}

pub async fn setting(
    State(state): State<AppState>,
    Json(req): Json<SettingRequest>,
) -> HandlerResult<SubmitResponse> {
    let response = run_blocking(move || {
        if require_user(&state, &req.api_key)?.is_none() {
            return Ok(SubmitResponse::failure("Invalid API key"));
        }
        state
            .db
            .with_tx(|tx| recorder::record_setting(tx, &req.setting, req.location_id))?;
        Ok(SubmitResponse::ok())
    })
    .await?;
    Ok(Json(response))
}

pub async fn opportunities(
    State(state): State<AppState>,
    Json(req): Json<OpportunitiesRequest>,
) -> HandlerResult<SubmitResponse> {
    let response = run_blocking(move || {
        if require_user(&state, &req.api_key)?.is_none() {
            return Ok(SubmitResponse::failure("Invalid API key"));
        }
        state.db.with_tx(|tx| {
            recorder::record_opportunities(
                tx,
                state.images.as_ref(),
                req.location_id,
                req.setting_id,
                &req.display_cards,
            )
        })?;
        Ok(SubmitResponse::ok())
    })
    .await?;
    Ok(Json(response))
}

/// Record the story events listed together at a location's top level.
pub async fn event_list(
    State(state): State<AppState>,
    Json(req): Json<EventListRequest>,
) -> HandlerResult<SubmitResponse> {
    let response = run_blocking(move || {
        if require_user(&state, &req.api_key)?.is_none() {
            return Ok(SubmitResponse::failure("Invalid API key"));
        }
        state.db.with_tx(|tx| {
            recorder::record_location_events(
                tx,
                state.images.as_ref(),
                req.location_id,
                req.setting_id,
                &req.events,
            )
        })?;
        Ok(SubmitResponse::ok())
    })
    .await?;
    Ok(Json(response))
}

/// Record a viewed story event, back-linking a pending outcome redirect.
pub async fn event_view(
    State(state): State<AppState>,
    Json(req): Json<EventViewRequest>,
) -> HandlerResult<SubmitResponse> {
    let response = run_blocking(move || {
        if require_user(&state, &req.api_key)?.is_none() {
            return Ok(SubmitResponse::failure("Invalid API key"));
        }
        state.db.with_tx(|tx| {
            let event_id = recorder::record_event(
                tx,
                state.images.as_ref(),
                req.location_id,
                req.setting_id,
                &req.event,
            )?;
            if let Some(observation_id) = req.is_linking_from_outcome_observation {
                if outcomes::get(tx, observation_id)?.is_some() {
                    outcomes::set_redirect_event(tx, observation_id, event_id)?;
                }
            }
            Ok::<_, chronicle_core::ChronicleError>(())
        })?;
        Ok(SubmitResponse::ok())
    })
    .await?;
    Ok(Json(response))
}

/// Record a choice's outcome and report where it moved the player.
pub async fn event_outcome(
    State(state): State<AppState>,
    Json(req): Json<OutcomeRequest>,
) -> HandlerResult<OutcomeSubmitResponse> {
    let response = run_blocking(move || {
        let Some(user) = require_user(&state, &req.api_key)? else {
            return Ok(OutcomeSubmitResponse {
                success: false,
                error: Some("Invalid API key".to_string()),
                outcome_observation_id: None,
                new_location_id: None,
                new_setting_id: None,
            });
        };
        let recorded = state.with_session(user.id, |session| {
            state.db.with_tx(|tx| {
                let recorded = recorder::record_outcome(
                    tx,
                    state.images.as_ref(),
                    session,
                    req.choice_id,
                    req.end_event.as_ref().map(|outcome| &outcome.event),
                    req.messages.as_deref().unwrap_or_default(),
                    req.redirect.as_ref(),
                    req.location_id,
                    req.setting_id,
                )?;
                if let Some(recorded) = &recorded {
                    if let Some(observation_id) = req.is_linking_from_outcome_observation {
                        if outcomes::get(tx, observation_id)?.is_some() {
                            outcomes::set_redirect_choice(tx, observation_id, req.choice_id)?;
                        }
                    }
                    users::set_current_position(
                        tx,
                        user.id,
                        recorded.new_location_id,
                        recorded.new_setting_id,
                    )?;
                }
                Ok::<_, chronicle_core::ChronicleError>(recorded)
            })
        })?;
        Ok(match recorded {
            Some(recorded) => OutcomeSubmitResponse {
                success: true,
                error: None,
                outcome_observation_id: Some(recorded.observation_id),
                new_location_id: recorded.new_location_id,
                new_setting_id: recorded.new_setting_id,
            },
            None => OutcomeSubmitResponse {
                success: false,
                error: Some("Choice has not been recorded".to_string()),
                outcome_observation_id: None,
                new_location_id: None,
                new_setting_id: None,
            },
        })
    })
    .await?;
    Ok(Json(response))
}
