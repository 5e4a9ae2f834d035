//! User and API-key queries.

use rusqlite::{params, Connection, OptionalExtension};

use crate::pool::DbResult;

/// User row. The current location/setting track where the user's capture
/// session last placed them, for redirect resolution.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub api_key: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub current_location_id: Option<i64>,
    pub current_setting_id: Option<i64>,
}

const COLUMNS: &str =
    "id, name, api_key, is_admin, is_active, current_location_id, current_setting_id";

/// Look up an active user by API key.
pub fn get_by_api_key(conn: &Connection, api_key: &str) -> DbResult<Option<UserRow>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM users WHERE api_key = ?1 AND is_active = 1"),
        params![api_key],
        row_to_user,
    )
    .optional()
    .map_err(Into::into)
}

/// Create a user with a pre-generated API key.
pub fn create(conn: &Connection, name: &str, api_key: &str, is_admin: bool) -> DbResult<UserRow> {
    conn.execute(
        "INSERT INTO users (name, api_key, is_admin) VALUES (?1, ?2, ?3)",
        params![name, api_key, is_admin],
    )?;
    let id = conn.last_insert_rowid();
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM users WHERE id = ?1"),
        params![id],
        row_to_user,
    )
    .map_err(Into::into)
}

/// List all users.
pub fn list(conn: &Connection) -> DbResult<Vec<UserRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM users ORDER BY id"))?;
    let rows = stmt.query_map([], row_to_user)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Update a user's current location/setting after a redirect.
pub fn set_current_position(
    conn: &Connection,
    user_id: i64,
    location_id: Option<i64>,
    setting_id: Option<i64>,
) -> DbResult<()> {
    if let Some(location_id) = location_id {
        conn.execute(
            "UPDATE users SET current_location_id = ?2 WHERE id = ?1",
            params![user_id, location_id],
        )?;
    }
    if let Some(setting_id) = setting_id {
        conn.execute(
            "UPDATE users SET current_setting_id = ?2 WHERE id = ?1",
            params![user_id, setting_id],
        )?;
    }
    Ok(())
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        api_key: row.get(2)?,
        is_admin: row.get(3)?,
        is_active: row.get(4)?,
        current_location_id: row.get(5)?,
        current_setting_id: row.get(6)?,
    })
}
