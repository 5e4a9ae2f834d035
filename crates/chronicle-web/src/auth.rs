//! API key authorization for submissions.

use chronicle_db::queries::users::{self, UserRow};
use chronicle_db::{DbPool, DbResult};

/// Look up the active user behind an API key.
pub fn authorize(db: &DbPool, api_key: &str) -> DbResult<Option<UserRow>> {
    if api_key.is_empty() {
        return Ok(None);
    }
    db.with_conn(|conn| users::get_by_api_key(conn, api_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_known_key() {
        let db = DbPool::in_memory().unwrap();
        let user = db
            .with_conn(|conn| users::create(conn, "alice", "key-1", false))
            .unwrap();
        let found = authorize(&db, "key-1").unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[test]
    fn test_authorize_rejects_unknown_and_empty() {
        let db = DbPool::in_memory().unwrap();
        assert!(authorize(&db, "nope").unwrap().is_none());
        assert!(authorize(&db, "").unwrap().is_none());
    }
}
