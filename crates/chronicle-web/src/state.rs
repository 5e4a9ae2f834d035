//! Application state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chronicle_core::images::ImageCache;
use chronicle_core::ledger::RecordingSession;
use chronicle_db::DbPool;

/// Application state shared across handlers.
///
/// Recording sessions are keyed by user id and live for the process
/// lifetime; each holds the possession ledger outcome interpretation
/// depends on.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub images: Arc<dyn ImageCache>,
    pub sessions: Arc<Mutex<HashMap<i64, RecordingSession>>>,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, images: Arc<dyn ImageCache>) -> Self {
        Self {
            db,
            images,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run a closure against one user's recording session, creating it on
    /// first use.
    pub fn with_session<T>(&self, user_id: i64, f: impl FnOnce(&mut RecordingSession) -> T) -> T {
        let mut sessions = match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(sessions.entry(user_id).or_default())
    }
}
