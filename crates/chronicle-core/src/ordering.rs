//! Story event order reconstruction.
//!
//! The game presents events in a meaningful order but never reports it
//! directly; recording captures pairwise "A was listed before B" facts and
//! this module rebuilds a total display order from them.

use std::collections::{HashMap, HashSet};

/// Passes before an unsatisfiable (cyclic) constraint set is abandoned.
const MAX_PASSES: usize = 100;

/// Rebuild a display order for `members` from observed before/after pairs.
///
/// Members keep their incoming relative order except where a pair forces a
/// move, so the result is stable across submissions. Pairs mentioning ids
/// outside `members` are ignored. Contradictory pairs cannot all be honored;
/// the result then reflects the state after the pass cap rather than looping.
pub fn reconstruct_order(members: &[i64], pairs: &[(i64, i64)]) -> Vec<i64> {
    let member_set: HashSet<i64> = members.iter().copied().collect();
    let mut must_precede: HashMap<i64, Vec<i64>> = HashMap::new();
    for &(before, after) in pairs {
        if member_set.contains(&before) && member_set.contains(&after) {
            must_precede.entry(before).or_default().push(after);
        }
    }

    let mut ordered: Vec<i64> = members.to_vec();
    for _ in 0..MAX_PASSES {
        let snapshot = ordered.clone();
        for &member in members {
            let Some(idx) = ordered.iter().position(|&id| id == member) else {
                continue;
            };
            let mut target = idx;
            for after in must_precede.get(&member).into_iter().flatten() {
                if let Some(after_idx) = ordered.iter().position(|&id| id == *after) {
                    target = target.min(after_idx);
                }
            }
            if target < idx {
                let moved = ordered.remove(idx);
                ordered.insert(target, moved);
            }
        }
        if ordered == snapshot {
            break;
        }
    }
    ordered
}
