//! Selection policies over a single set of failure counters.
//!
//! These are pure functions: they see one [`FailureCounters`] and never touch
//! the published snapshot, which keeps every choice inside one generation.

use crate::load_balancer::failures::FailureCounters;

/// Index chosen when every node is marked as failing.
///
/// Picking a concrete node lets the caller either get a real error back or
/// find the node recovered.
pub const FALLBACK_INDEX: usize = 0;

/// Index of the first node, in priority order, with no recorded failures.
pub fn first_healthy(failures: &FailureCounters) -> Option<usize> {
    (0..failures.len()).find(|&i| failures.is_healthy(i))
}

/// Index of the first healthy node scanning circularly from `start`.
///
/// Visits `start, start + 1, ..` up to the end, then wraps to `0` and stops
/// just before `start` again.
pub fn first_healthy_from(failures: &FailureCounters, start: usize) -> Option<usize> {
    let len = failures.len();
    if len == 0 {
        return None;
    }
    let start = start % len;

    (start..len)
        .chain(0..start)
        .find(|&i| failures.is_healthy(i))
}

/// Where the scan for `session_id` begins: `session_id mod node_count`.
pub fn session_start_index(session_id: u64, node_count: usize) -> usize {
    session_id.checked_rem(node_count as u64).unwrap_or(0) as usize
}
