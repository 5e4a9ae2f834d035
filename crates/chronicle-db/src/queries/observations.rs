//! Observation history queries for story events and choices.
//!
//! Histories are returned newest first. Child rows (requirements,
//! challenges) are owned by their observation and replaced wholesale when
//! the observation's interpreted lists change.

use rusqlite::{params, Connection};

use crate::pool::DbResult;

/// Requirement owner discriminator for the shared `requirements` table.
pub const OWNER_EVENT: &str = "event";
/// See [`OWNER_EVENT`].
pub const OWNER_CHOICE: &str = "choice";

/// Story event observation row.
#[derive(Debug, Clone)]
pub struct EventObservationRow {
    pub id: i64,
    pub event_id: i64,
    pub last_modified: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub teaser: Option<String>,
}

/// Choice observation row.
#[derive(Debug, Clone)]
pub struct ChoiceObservationRow {
    pub id: i64,
    pub choice_id: i64,
    pub last_modified: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub currency_cost: Option<i64>,
}

/// Interpreted requirement row.
#[derive(Debug, Clone)]
pub struct RequirementRow {
    pub id: i64,
    pub observation_id: i64,
    pub position: i64,
    pub upstream_id: i64,
    pub quality_id: i64,
    pub is_cost: bool,
    pub image: Option<String>,
    pub min_quantity: Option<i64>,
    pub max_quantity: Option<i64>,
    pub required_values: Option<String>,
    pub fallback_text: Option<String>,
}

/// Challenge row.
#[derive(Debug, Clone)]
pub struct ChallengeRow {
    pub id: i64,
    pub observation_id: i64,
    pub position: i64,
    pub upstream_id: i64,
    pub category: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub target: i64,
    pub nature: String,
    pub kind: String,
}

/// List a story event's observations, newest first.
pub fn list_event_observations(
    conn: &Connection,
    event_id: i64,
) -> DbResult<Vec<EventObservationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, event_id, last_modified, name, description, teaser
         FROM event_observations WHERE event_id = ?1
         ORDER BY last_modified DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![event_id], |row| {
        Ok(EventObservationRow {
            id: row.get(0)?,
            event_id: row.get(1)?,
            last_modified: row.get(2)?,
            name: row.get(3)?,
            description: row.get(4)?,
            teaser: row.get(5)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Insert a new story event observation, returning its row id.
pub fn insert_event_observation(
    conn: &Connection,
    event_id: i64,
    last_modified: &str,
    name: Option<&str>,
    description: Option<&str>,
    teaser: Option<&str>,
) -> DbResult<i64> {
    conn.execute(
        "INSERT INTO event_observations (event_id, last_modified, name, description, teaser)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![event_id, last_modified, name, description, teaser],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Refresh an existing story event observation in place.
pub fn update_event_observation(
    conn: &Connection,
    id: i64,
    last_modified: &str,
    name: Option<&str>,
    description: Option<&str>,
    teaser: Option<&str>,
) -> DbResult<()> {
    conn.execute(
        "UPDATE event_observations
         SET last_modified = ?2, name = ?3, description = ?4, teaser = ?5
         WHERE id = ?1",
        params![id, last_modified, name, description, teaser],
    )?;
    Ok(())
}

/// List a choice's observations, newest first.
pub fn list_choice_observations(
    conn: &Connection,
    choice_id: i64,
) -> DbResult<Vec<ChoiceObservationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, choice_id, last_modified, name, description, currency_cost
         FROM choice_observations WHERE choice_id = ?1
         ORDER BY last_modified DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![choice_id], |row| {
        Ok(ChoiceObservationRow {
            id: row.get(0)?,
            choice_id: row.get(1)?,
            last_modified: row.get(2)?,
            name: row.get(3)?,
            description: row.get(4)?,
            currency_cost: row.get(5)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Insert a new choice observation, returning its row id.
pub fn insert_choice_observation(
    conn: &Connection,
    choice_id: i64,
    last_modified: &str,
    name: Option<&str>,
    description: Option<&str>,
    currency_cost: Option<i64>,
) -> DbResult<i64> {
    conn.execute(
        "INSERT INTO choice_observations (choice_id, last_modified, name, description, currency_cost)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![choice_id, last_modified, name, description, currency_cost],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Refresh an existing choice observation in place.
pub fn update_choice_observation(
    conn: &Connection,
    id: i64,
    last_modified: &str,
    name: Option<&str>,
    description: Option<&str>,
    currency_cost: Option<i64>,
) -> DbResult<()> {
    conn.execute(
        "UPDATE choice_observations
         SET last_modified = ?2, name = ?3, description = ?4, currency_cost = ?5
         WHERE id = ?1",
        params![id, last_modified, name, description, currency_cost],
    )?;
    Ok(())
}

/// List an observation's requirements in recorded order.
pub fn list_requirements(
    conn: &Connection,
    owner_kind: &str,
    observation_id: i64,
) -> DbResult<Vec<RequirementRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, observation_id, position, upstream_id, quality_id, is_cost,
                image, min_quantity, max_quantity, required_values, fallback_text
         FROM requirements WHERE owner_kind = ?1 AND observation_id = ?2
         ORDER BY position",
    )?;
    let rows = stmt.query_map(params![owner_kind, observation_id], |row| {
        Ok(RequirementRow {
            id: row.get(0)?,
            observation_id: row.get(1)?,
            position: row.get(2)?,
            upstream_id: row.get(3)?,
            quality_id: row.get(4)?,
            is_cost: row.get(5)?,
            image: row.get(6)?,
            min_quantity: row.get(7)?,
            max_quantity: row.get(8)?,
            required_values: row.get(9)?,
            fallback_text: row.get(10)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Replace an observation's requirements wholesale.
pub fn replace_requirements(
    conn: &Connection,
    owner_kind: &str,
    observation_id: i64,
    requirements: &[RequirementRow],
) -> DbResult<()> {
    conn.execute(
        "DELETE FROM requirements WHERE owner_kind = ?1 AND observation_id = ?2",
        params![owner_kind, observation_id],
    )?;
    for (position, req) in requirements.iter().enumerate() {
        conn.execute(
            "INSERT INTO requirements
             (owner_kind, observation_id, position, upstream_id, quality_id, is_cost,
              image, min_quantity, max_quantity, required_values, fallback_text)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                owner_kind,
                observation_id,
                position as i64,
                req.upstream_id,
                req.quality_id,
                req.is_cost,
                req.image,
                req.min_quantity,
                req.max_quantity,
                req.required_values,
                req.fallback_text
            ],
        )?;
    }
    Ok(())
}

/// List a choice observation's challenges in recorded order.
pub fn list_challenges(conn: &Connection, observation_id: i64) -> DbResult<Vec<ChallengeRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, observation_id, position, upstream_id, category, name,
                description, image, target, nature, kind
         FROM challenges WHERE observation_id = ?1
         ORDER BY position",
    )?;
    let rows = stmt.query_map(params![observation_id], |row| {
        Ok(ChallengeRow {
            id: row.get(0)?,
            observation_id: row.get(1)?,
            position: row.get(2)?,
            upstream_id: row.get(3)?,
            category: row.get(4)?,
            name: row.get(5)?,
            description: row.get(6)?,
            image: row.get(7)?,
            target: row.get(8)?,
            nature: row.get(9)?,
            kind: row.get(10)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Replace a choice observation's challenges wholesale.
pub fn replace_challenges(
    conn: &Connection,
    observation_id: i64,
    challenges: &[ChallengeRow],
) -> DbResult<()> {
    conn.execute(
        "DELETE FROM challenges WHERE observation_id = ?1",
        params![observation_id],
    )?;
    for (position, challenge) in challenges.iter().enumerate() {
        conn.execute(
            "INSERT INTO challenges
             (observation_id, position, upstream_id, category, name, description,
              image, target, nature, kind)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                observation_id,
                position as i64,
                challenge.upstream_id,
                challenge.category,
                challenge.name,
                challenge.description,
                challenge.image,
                challenge.target,
                challenge.nature,
                challenge.kind
            ],
        )?;
    }
    Ok(())
}
