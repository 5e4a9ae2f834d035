//! Chronicle core: the observation aggregator.
//!
//! Turns successive, partial, possibly contradictory snapshots of game
//! content into a canonical, versioned knowledge base. The moving parts:
//!
//! - [`patterns`] — ordered regex tables classifying free-text requirement
//!   tooltips and outcome messages into structured captures.
//! - [`ledger`] — per-session possession ledger used to derive and verify
//!   numeric quality changes.
//! - [`merge`] — the update-vs-append decision for observation histories.
//! - [`interpret`] — requirement and outcome interpreters built on the two
//!   above.
//! - [`recorder`] — orchestration of incoming snapshots into the store.
//! - [`ordering`] — best-effort total order reconstruction from pairwise
//!   adjacency observations.

pub mod error;
pub mod images;
pub mod interpret;
pub mod ledger;
pub mod merge;
pub mod model;
pub mod ordering;
pub mod patterns;
pub mod recorder;
pub mod snapshot;
pub mod text;

pub use error::{ChronicleError, ChronicleResult};
