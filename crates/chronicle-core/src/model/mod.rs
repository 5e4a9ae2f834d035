//! Domain model: interpreted, versioned views over the stored rows.

mod challenge;
mod choice;
mod event;
mod outcome;
mod requirement;

pub use challenge::Challenge;
pub use choice::{ChoiceObservation, ChoiceObservationFields};
pub use event::{EventObservation, EventObservationFields};
pub use outcome::{MessageKind, OutcomeMessage, OutcomeObservation, OutcomeObservationFields};
pub use requirement::{Requirement, RequirementConstraint};

use chrono::{DateTime, Utc};

/// Parse a stored RFC 3339 timestamp, falling back to now for rows written
/// by hand or by older builds.
pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
