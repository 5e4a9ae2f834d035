//! Observation merge engine: the update-vs-append decision.
//!
//! An entity is re-observed every time a player revisits it; appending a new
//! history entry per visit would grow without bound. Instead, a candidate
//! snapshot settles into the first (newest-first) existing observation it
//! fully matches, and only genuinely changed content appends a new entry.

use chrono::{DateTime, Utc};

/// One kind of versioned observation history.
///
/// `Fields` is the candidate: every member is optional, and absent members
/// neither participate in matching nor erase stored values on update.
pub trait MergeableObservation: Sized {
    type Fields;

    /// Whether the candidate matches this observation on every present field.
    fn matches(&self, candidate: &Self::Fields) -> bool;

    /// Overwrite the fields present in the candidate and refresh the
    /// modification timestamp.
    fn apply(&mut self, candidate: Self::Fields, now: DateTime<Utc>);

    /// Build a brand-new observation from the candidate fields.
    fn from_fields(candidate: Self::Fields, now: DateTime<Utc>) -> Self;
}

/// Merge a candidate into an observation history (newest first).
///
/// Scans for the first full match and updates it in place; otherwise
/// prepends a new observation. Returns the index of the settled entry.
/// First-full-match is deliberate: a candidate partially matching two
/// historical entries on disjoint field subsets settles into whichever full
/// match comes first, not the "best" one. This operation cannot fail.
pub fn merge_or_append<O: MergeableObservation>(
    history: &mut Vec<O>,
    candidate: O::Fields,
    now: DateTime<Utc>,
) -> usize {
    for (index, existing) in history.iter_mut().enumerate() {
        if existing.matches(&candidate) {
            existing.apply(candidate, now);
            return index;
        }
    }
    history.insert(0, O::from_fields(candidate, now));
    0
}

/// Comparison on substantive attributes only, excluding row identifiers and
/// observation back-references which differ on every fresh interpretation.
pub trait CanonicalEq {
    fn canonical_eq(&self, other: &Self) -> bool;
}

/// Field match for plain scalar values: an absent candidate always matches,
/// and a stored null accepts any candidate value (the field simply had not
/// been observed yet).
pub(crate) fn scalar_matches<T: PartialEq>(stored: &Option<T>, candidate: &Option<T>) -> bool {
    match (stored, candidate) {
        (_, None) | (None, Some(_)) => true,
        (Some(stored), Some(candidate)) => stored == candidate,
    }
}

/// Field match for ordered sub-record lists, canonicalized element-wise.
pub(crate) fn list_matches<T: CanonicalEq>(
    stored: &Option<Vec<T>>,
    candidate: &Option<Vec<T>>,
) -> bool {
    match (stored, candidate) {
        (_, None) | (None, Some(_)) => true,
        (Some(stored), Some(candidate)) => {
            stored.len() == candidate.len()
                && stored
                    .iter()
                    .zip(candidate.iter())
                    .all(|(a, b)| a.canonical_eq(b))
        }
    }
}

/// Overwrite the target only when the candidate field is present.
pub(crate) fn assign_present<T>(target: &mut Option<T>, candidate: Option<T>) {
    if candidate.is_some() {
        *target = candidate;
    }
}
