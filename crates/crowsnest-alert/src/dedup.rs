//! Cycle-to-cycle alert deduplication.
//!
//! The suppression key is the rule id joined with the formatted display
//! value. An alert whose value string is unchanged since the previous cycle
//! is a duplicate and is not persisted again; any change to the value string,
//! however small, makes it a new occurrence. The key set is replaced
//! wholesale each cycle, so a rule that stops firing also stops suppressing.

use crowsnest_common::types::Alert;
use std::collections::HashSet;

/// Suppression key for an alert: `{rule id}-{display value}`.
pub fn dedup_key(alert: &Alert) -> String {
    format!("{}-{}", alert.id, alert.value)
}

/// Splits the current cycle's alerts into the subset to persist and the key
/// set to carry into the next cycle.
///
/// `last_keys` is the key set returned by the previous call for the same
/// session; the caller owns that state and passes it back in.
pub fn reconcile(
    current: &[Alert],
    last_keys: &HashSet<String>,
) -> (Vec<Alert>, HashSet<String>) {
    let mut new_keys = HashSet::with_capacity(current.len());
    let mut to_persist = Vec::new();

    for alert in current {
        let key = dedup_key(alert);
        if !last_keys.contains(&key) {
            to_persist.push(alert.clone());
        }
        new_keys.insert(key);
    }

    (to_persist, new_keys)
}
