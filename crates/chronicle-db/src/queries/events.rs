//! Story event queries.

use rusqlite::{params, Connection, OptionalExtension};

use crate::pool::DbResult;

/// Story event row ("current state" scalar fields, last writer wins).
#[derive(Debug, Clone)]
pub struct EventRow {
    pub id: i64,
    pub can_go_back: Option<bool>,
    pub category: Option<String>,
    pub distribution: Option<String>,
    pub frequency: Option<String>,
    pub stickiness: Option<String>,
    pub urgency: Option<String>,
    pub image: Option<String>,
    pub is_autofire: bool,
    pub is_card: bool,
    pub is_top_level: bool,
}

const COLUMNS: &str = "id, can_go_back, category, distribution, frequency, stickiness, \
     urgency, image, is_autofire, is_card, is_top_level";

/// Get a story event by upstream id.
pub fn get(conn: &Connection, id: i64) -> DbResult<Option<EventRow>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM events WHERE id = ?1"),
        params![id],
        row_to_event,
    )
    .optional()
    .map_err(Into::into)
}

/// Get a story event by upstream id, creating an empty record if absent.
pub fn get_or_create(conn: &Connection, id: i64) -> DbResult<EventRow> {
    conn.execute("INSERT OR IGNORE INTO events (id) VALUES (?1)", params![id])?;
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM events WHERE id = ?1"),
        params![id],
        row_to_event,
    )
    .map_err(Into::into)
}

/// Overwrite a story event's scalar fields.
pub fn save_scalars(conn: &Connection, row: &EventRow) -> DbResult<()> {
    conn.execute(
        "UPDATE events SET can_go_back = ?2, category = ?3, distribution = ?4,
         frequency = ?5, stickiness = ?6, urgency = ?7, image = ?8,
         is_autofire = ?9, is_card = ?10, is_top_level = ?11
         WHERE id = ?1",
        params![
            row.id,
            row.can_go_back,
            row.category,
            row.distribution,
            row.frequency,
            row.stickiness,
            row.urgency,
            row.image,
            row.is_autofire,
            row.is_card,
            row.is_top_level
        ],
    )?;
    Ok(())
}

/// Flag a story event as part of a location's top-level listing.
pub fn set_top_level(conn: &Connection, id: i64) -> DbResult<()> {
    conn.execute(
        "UPDATE events SET is_top_level = 1 WHERE id = ?1",
        params![id],
    )?;
    Ok(())
}

/// Ids of choices belonging to a story event, highest ordering first.
pub fn choice_ids(conn: &Connection, event_id: i64) -> DbResult<Vec<i64>> {
    let mut stmt =
        conn.prepare("SELECT id FROM choices WHERE event_id = ?1 ORDER BY ordering DESC")?;
    let rows = stmt.query_map(params![event_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn row_to_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        can_go_back: row.get(1)?,
        category: row.get(2)?,
        distribution: row.get(3)?,
        frequency: row.get(4)?,
        stickiness: row.get(5)?,
        urgency: row.get(6)?,
        image: row.get(7)?,
        is_autofire: row.get(8)?,
        is_card: row.get(9)?,
        is_top_level: row.get(10)?,
    })
}
