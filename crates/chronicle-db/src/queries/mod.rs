//! Database query implementations.
//!
//! Unlike a pool-level API, every function here takes a borrowed
//! `rusqlite::Connection` so callers can compose several queries inside a
//! single `DbPool::with_tx` unit of work.

pub mod choices;
pub mod events;
pub mod locations;
pub mod observations;
pub mod ordering;
pub mod outcomes;
pub mod qualities;
pub mod settings;
pub mod users;
