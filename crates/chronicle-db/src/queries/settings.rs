//! Setting queries.

use rusqlite::{params, Connection, OptionalExtension};

use crate::pool::DbResult;

/// Setting row.
#[derive(Debug, Clone)]
pub struct SettingRow {
    pub id: i64,
    pub name: Option<String>,
    pub can_change_outfit: Option<bool>,
    pub can_travel: Option<bool>,
    pub is_infinite_draw: Option<bool>,
    pub items_usable_here: Option<bool>,
}

const COLUMNS: &str =
    "id, name, can_change_outfit, can_travel, is_infinite_draw, items_usable_here";

/// Get a setting by upstream id.
pub fn get(conn: &Connection, id: i64) -> DbResult<Option<SettingRow>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM settings WHERE id = ?1"),
        params![id],
        row_to_setting,
    )
    .optional()
    .map_err(Into::into)
}

/// Get a setting by upstream id, creating an empty record if absent.
pub fn get_or_create(conn: &Connection, id: i64) -> DbResult<SettingRow> {
    conn.execute("INSERT OR IGNORE INTO settings (id) VALUES (?1)", params![id])?;
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM settings WHERE id = ?1"),
        params![id],
        row_to_setting,
    )
    .map_err(Into::into)
}

/// Overwrite a setting's scalar fields.
pub fn save_scalars(conn: &Connection, row: &SettingRow) -> DbResult<()> {
    conn.execute(
        "UPDATE settings SET name = ?2, can_change_outfit = ?3, can_travel = ?4,
         is_infinite_draw = ?5, items_usable_here = ?6
         WHERE id = ?1",
        params![
            row.id,
            row.name,
            row.can_change_outfit,
            row.can_travel,
            row.is_infinite_draw,
            row.items_usable_here
        ],
    )?;
    Ok(())
}

/// Link a setting and a story event. Additive.
pub fn link_event(conn: &Connection, setting_id: i64, event_id: i64) -> DbResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO settings_events (setting_id, event_id) VALUES (?1, ?2)",
        params![setting_id, event_id],
    )?;
    Ok(())
}

/// Ids of settings a story event belongs to.
pub fn ids_for_event(conn: &Connection, event_id: i64) -> DbResult<Vec<i64>> {
    let mut stmt = conn
        .prepare("SELECT setting_id FROM settings_events WHERE event_id = ?1 ORDER BY setting_id")?;
    let rows = stmt.query_map(params![event_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn row_to_setting(row: &rusqlite::Row<'_>) -> rusqlite::Result<SettingRow> {
    Ok(SettingRow {
        id: row.get(0)?,
        name: row.get(1)?,
        can_change_outfit: row.get(2)?,
        can_travel: row.get(3)?,
        is_infinite_draw: row.get(4)?,
        items_usable_here: row.get(5)?,
    })
}
