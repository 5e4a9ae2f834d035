//! Read-side location view.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chronicle_core::model::EventObservation;
use chronicle_core::{ordering, recorder};
use chronicle_db::queries::{events, locations, ordering as ordering_queries, settings};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub settings: Vec<SettingView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingView {
    pub id: i64,
    pub name: Option<String>,
    pub events: Vec<EventView>,
    pub opportunities: Vec<EventView>,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: i64,
    pub image: Option<String>,
    pub is_autofire: bool,
    /// Newest observation first.
    pub observations: Vec<EventObservation>,
}

/// Everything recorded about a location: its settings, the top-level story
/// events in reconstructed display order, and its opportunity cards.
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LocationView>, (StatusCode, String)> {
    let view = tokio::task::spawn_blocking(move || build_location_view(&state, id))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("No location {id}")))?;
    Ok(Json(view))
}

fn build_location_view(
    state: &AppState,
    id: i64,
) -> chronicle_core::ChronicleResult<Option<LocationView>> {
    state.db.with_tx(|tx| {
        let Some(location) = locations::get(tx, id)? else {
            return Ok(None);
        };

        let event_ids = locations::event_ids(tx, id)?;
        let pairs = ordering_queries::pairs_among(tx, &event_ids)?;
        let display_order = ordering::reconstruct_order(&event_ids, &pairs);

        let mut setting_views = Vec::new();
        for setting_id in locations::setting_ids(tx, id)? {
            let setting = settings::get_or_create(tx, setting_id)?;
            setting_views.push(SettingView {
                id: setting.id,
                name: setting.name,
                events: Vec::new(),
                opportunities: Vec::new(),
            });
        }

        for event_id in &display_order {
            let Some(row) = events::get(tx, *event_id)? else {
                continue;
            };
            if !row.is_top_level && !row.is_card {
                continue;
            }
            let view = EventView {
                id: row.id,
                image: row.image.clone(),
                is_autofire: row.is_autofire,
                observations: recorder::load_event_history(tx, row.id)?,
            };
            let setting_ids = settings::ids_for_event(tx, row.id)?;
            let mut placed = false;
            for setting_view in setting_views.iter_mut() {
                if !setting_ids.contains(&setting_view.id) {
                    continue;
                }
                if row.is_card {
                    setting_view.opportunities.push(view.clone());
                } else {
                    setting_view.events.push(view.clone());
                }
                placed = true;
            }
            if !placed {
                warn!(event_id = row.id, location_id = id, "event has no valid setting here");
            }
        }

        Ok(Some(LocationView {
            id: location.id,
            name: location.name,
            description: location.description,
            image: location.image,
            settings: setting_views,
        }))
    })
}
