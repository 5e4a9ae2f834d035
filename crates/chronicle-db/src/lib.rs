//! Chronicle persistence layer.
//!
//! SQLite-backed entity store for recorded game content. Entities are keyed
//! by the stable integer id the upstream game assigns; observation tables
//! hold the versioned narrative history with their owned child rows
//! (requirements, challenges, messages).

pub mod migrations;
pub mod pool;
pub mod queries;

pub use pool::{DbError, DbPool, DbResult};
