//! Location queries.

use rusqlite::{params, Connection, OptionalExtension};

use crate::pool::DbResult;

/// Location row ("current state" scalar fields, last writer wins).
#[derive(Debug, Clone)]
pub struct LocationRow {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub kind: Option<String>,
}

/// Get a location by upstream id.
pub fn get(conn: &Connection, id: i64) -> DbResult<Option<LocationRow>> {
    conn.query_row(
        "SELECT id, name, description, image, kind FROM locations WHERE id = ?1",
        params![id],
        row_to_location,
    )
    .optional()
    .map_err(Into::into)
}

/// Get a location by upstream id, creating an empty record if absent.
pub fn get_or_create(conn: &Connection, id: i64) -> DbResult<LocationRow> {
    conn.execute(
        "INSERT OR IGNORE INTO locations (id) VALUES (?1)",
        params![id],
    )?;
    conn.query_row(
        "SELECT id, name, description, image, kind FROM locations WHERE id = ?1",
        params![id],
        row_to_location,
    )
    .map_err(Into::into)
}

/// Overwrite a location's scalar fields.
pub fn save_scalars(conn: &Connection, row: &LocationRow) -> DbResult<()> {
    conn.execute(
        "UPDATE locations SET name = ?2, description = ?3, image = ?4, kind = ?5
         WHERE id = ?1",
        params![row.id, row.name, row.description, row.image, row.kind],
    )?;
    Ok(())
}

/// Link a location and a setting. Additive; never removes existing links.
pub fn link_setting(conn: &Connection, location_id: i64, setting_id: i64) -> DbResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO locations_settings (location_id, setting_id) VALUES (?1, ?2)",
        params![location_id, setting_id],
    )?;
    Ok(())
}

/// Link a location and a story event. Additive.
pub fn link_event(conn: &Connection, location_id: i64, event_id: i64) -> DbResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO locations_events (location_id, event_id) VALUES (?1, ?2)",
        params![location_id, event_id],
    )?;
    Ok(())
}

/// Ids of all settings linked to a location.
pub fn setting_ids(conn: &Connection, location_id: i64) -> DbResult<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT setting_id FROM locations_settings WHERE location_id = ?1 ORDER BY setting_id",
    )?;
    let rows = stmt.query_map(params![location_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Ids of all story events linked to a location, in insertion order.
pub fn event_ids(conn: &Connection, location_id: i64) -> DbResult<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT event_id FROM locations_events WHERE location_id = ?1 ORDER BY rowid",
    )?;
    let rows = stmt.query_map(params![location_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn row_to_location(row: &rusqlite::Row<'_>) -> rusqlite::Result<LocationRow> {
    Ok(LocationRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        image: row.get(3)?,
        kind: row.get(4)?,
    })
}
