//! Choice queries.

use rusqlite::{params, Connection, OptionalExtension};

use crate::pool::DbResult;

/// Choice row.
#[derive(Debug, Clone)]
pub struct ChoiceRow {
    pub id: i64,
    pub event_id: Option<i64>,
    pub action_cost: i64,
    pub button_text: String,
    pub image: Option<String>,
    pub ordering: i64,
}

const COLUMNS: &str = "id, event_id, action_cost, button_text, image, ordering";

/// Get a choice by upstream id.
pub fn get(conn: &Connection, id: i64) -> DbResult<Option<ChoiceRow>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM choices WHERE id = ?1"),
        params![id],
        row_to_choice,
    )
    .optional()
    .map_err(Into::into)
}

/// Get a choice by upstream id, creating an empty record if absent.
pub fn get_or_create(conn: &Connection, id: i64) -> DbResult<ChoiceRow> {
    conn.execute("INSERT OR IGNORE INTO choices (id) VALUES (?1)", params![id])?;
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM choices WHERE id = ?1"),
        params![id],
        row_to_choice,
    )
    .map_err(Into::into)
}

/// Overwrite a choice's scalar fields.
pub fn save_scalars(conn: &Connection, row: &ChoiceRow) -> DbResult<()> {
    conn.execute(
        "UPDATE choices SET event_id = ?2, action_cost = ?3, button_text = ?4,
         image = ?5, ordering = ?6
         WHERE id = ?1",
        params![
            row.id,
            row.event_id,
            row.action_cost,
            row.button_text,
            row.image,
            row.ordering
        ],
    )?;
    Ok(())
}

/// Attach a choice to its owning story event.
pub fn attach_to_event(conn: &Connection, choice_id: i64, event_id: i64) -> DbResult<()> {
    conn.execute(
        "UPDATE choices SET event_id = ?2 WHERE id = ?1",
        params![choice_id, event_id],
    )?;
    Ok(())
}

fn row_to_choice(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChoiceRow> {
    Ok(ChoiceRow {
        id: row.get(0)?,
        event_id: row.get(1)?,
        action_cost: row.get(2)?,
        button_text: row.get(3)?,
        image: row.get(4)?,
        ordering: row.get(5)?,
    })
}
