//! Outcome observation queries.

use rusqlite::{params, Connection, OptionalExtension};

use crate::pool::DbResult;

/// Outcome observation row.
#[derive(Debug, Clone)]
pub struct OutcomeObservationRow {
    pub id: i64,
    pub choice_id: i64,
    pub last_modified: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_success: Option<bool>,
    pub redirect_event_id: Option<i64>,
    pub redirect_location_id: Option<i64>,
    pub redirect_setting_id: Option<i64>,
    pub redirect_choice_id: Option<i64>,
}

/// Typed outcome message row.
#[derive(Debug, Clone)]
pub struct OutcomeMessageRow {
    pub id: i64,
    pub observation_id: i64,
    pub position: i64,
    pub kind: String,
    pub text: String,
    pub image: Option<String>,
    pub quality_id: Option<i64>,
    pub change: Option<i64>,
}

const COLUMNS: &str = "id, choice_id, last_modified, name, description, image, is_success, \
     redirect_event_id, redirect_location_id, redirect_setting_id, redirect_choice_id";

/// Get a single outcome observation by row id.
pub fn get(conn: &Connection, id: i64) -> DbResult<Option<OutcomeObservationRow>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM outcome_observations WHERE id = ?1"),
        params![id],
        row_to_outcome,
    )
    .optional()
    .map_err(Into::into)
}

/// List a choice's outcome observations, newest first.
pub fn list_for_choice(conn: &Connection, choice_id: i64) -> DbResult<Vec<OutcomeObservationRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM outcome_observations WHERE choice_id = ?1
         ORDER BY last_modified DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![choice_id], row_to_outcome)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Insert a new outcome observation, returning its row id.
pub fn insert(conn: &Connection, row: &OutcomeObservationRow) -> DbResult<i64> {
    conn.execute(
        "INSERT INTO outcome_observations
         (choice_id, last_modified, name, description, image, is_success,
          redirect_event_id, redirect_location_id, redirect_setting_id, redirect_choice_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            row.choice_id,
            row.last_modified,
            row.name,
            row.description,
            row.image,
            row.is_success,
            row.redirect_event_id,
            row.redirect_location_id,
            row.redirect_setting_id,
            row.redirect_choice_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Refresh an existing outcome observation in place.
pub fn update(conn: &Connection, row: &OutcomeObservationRow) -> DbResult<()> {
    conn.execute(
        "UPDATE outcome_observations
         SET last_modified = ?2, name = ?3, description = ?4, image = ?5,
             is_success = ?6, redirect_event_id = ?7, redirect_location_id = ?8,
             redirect_setting_id = ?9, redirect_choice_id = ?10
         WHERE id = ?1",
        params![
            row.id,
            row.last_modified,
            row.name,
            row.description,
            row.image,
            row.is_success,
            row.redirect_event_id,
            row.redirect_location_id,
            row.redirect_setting_id,
            row.redirect_choice_id
        ],
    )?;
    Ok(())
}

/// Point a previously recorded outcome at the story event it redirected to.
pub fn set_redirect_event(conn: &Connection, id: i64, event_id: i64) -> DbResult<()> {
    conn.execute(
        "UPDATE outcome_observations SET redirect_event_id = ?2 WHERE id = ?1",
        params![id, event_id],
    )?;
    Ok(())
}

/// Point a previously recorded outcome at the choice it redirected to.
///
/// Recorded but not interpreted further; see DESIGN.md.
pub fn set_redirect_choice(conn: &Connection, id: i64, choice_id: i64) -> DbResult<()> {
    conn.execute(
        "UPDATE outcome_observations SET redirect_choice_id = ?2 WHERE id = ?1",
        params![id, choice_id],
    )?;
    Ok(())
}

/// List an outcome observation's messages in recorded order.
pub fn list_messages(conn: &Connection, observation_id: i64) -> DbResult<Vec<OutcomeMessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, observation_id, position, kind, text, image, quality_id, change
         FROM outcome_messages WHERE observation_id = ?1
         ORDER BY position",
    )?;
    let rows = stmt.query_map(params![observation_id], |row| {
        Ok(OutcomeMessageRow {
            id: row.get(0)?,
            observation_id: row.get(1)?,
            position: row.get(2)?,
            kind: row.get(3)?,
            text: row.get(4)?,
            image: row.get(5)?,
            quality_id: row.get(6)?,
            change: row.get(7)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Replace an outcome observation's messages wholesale.
pub fn replace_messages(
    conn: &Connection,
    observation_id: i64,
    messages: &[OutcomeMessageRow],
) -> DbResult<()> {
    conn.execute(
        "DELETE FROM outcome_messages WHERE observation_id = ?1",
        params![observation_id],
    )?;
    for (position, message) in messages.iter().enumerate() {
        conn.execute(
            "INSERT INTO outcome_messages
             (observation_id, position, kind, text, image, quality_id, change)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                observation_id,
                position as i64,
                message.kind,
                message.text,
                message.image,
                message.quality_id,
                message.change
            ],
        )?;
    }
    Ok(())
}

fn row_to_outcome(row: &rusqlite::Row<'_>) -> rusqlite::Result<OutcomeObservationRow> {
    Ok(OutcomeObservationRow {
        id: row.get(0)?,
        choice_id: row.get(1)?,
        last_modified: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        image: row.get(5)?,
        is_success: row.get(6)?,
        redirect_event_id: row.get(7)?,
        redirect_location_id: row.get(8)?,
        redirect_setting_id: row.get(9)?,
        redirect_choice_id: row.get(10)?,
    })
}
