//! Quality queries.

use rusqlite::{params, Connection, OptionalExtension};

use crate::pool::DbResult;

/// Quality row. Same upstream id always resolves to one record; the display
/// fields are refreshed on every sighting.
#[derive(Debug, Clone)]
pub struct QualityRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub nature: String,
}

/// Insert or refresh a quality record.
pub fn upsert(conn: &Connection, id: i64, name: &str, category: &str, nature: &str) -> DbResult<()> {
    conn.execute(
        "INSERT INTO qualities (id, name, category, nature) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET name = ?2, category = ?3, nature = ?4",
        params![id, name, category, nature],
    )?;
    Ok(())
}

/// Get a quality by upstream id.
pub fn get(conn: &Connection, id: i64) -> DbResult<Option<QualityRow>> {
    conn.query_row(
        "SELECT id, name, description, category, nature FROM qualities WHERE id = ?1",
        params![id],
        |row| {
            Ok(QualityRow {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                category: row.get(3)?,
                nature: row.get(4)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}
