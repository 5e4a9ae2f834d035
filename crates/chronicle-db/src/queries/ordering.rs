//! Pairwise ordering adjacency queries.

use rusqlite::{params, Connection};

use crate::pool::DbResult;

/// Record that `before_id` was observed immediately before `after_id`.
///
/// The reversed pair is dropped first so that the most recent listing wins
/// when two snapshots disagree.
pub fn record_before(conn: &Connection, before_id: i64, after_id: i64) -> DbResult<()> {
    conn.execute(
        "DELETE FROM event_order WHERE before_id = ?1 AND after_id = ?2",
        params![after_id, before_id],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO event_order (before_id, after_id) VALUES (?1, ?2)",
        params![before_id, after_id],
    )?;
    Ok(())
}

/// Adjacency pairs restricted to the given member set.
pub fn pairs_among(conn: &Connection, member_ids: &[i64]) -> DbResult<Vec<(i64, i64)>> {
    if member_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders: Vec<String> = (1..=member_ids.len()).map(|i| format!("?{}", i)).collect();
    let in_list = placeholders.join(", ");
    let sql = format!(
        "SELECT before_id, after_id FROM event_order
         WHERE before_id IN ({in_list}) AND after_id IN ({in_list})"
    );

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> =
        member_ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();
    let rows = stmt.query_map(params.as_slice(), |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
