//! Presentation-facing view of current and historical alerts.
//!
//! This is the boundary consumed by whatever renders the alert panel; the
//! rendering itself lives elsewhere. The payload carries the current
//! severity-sorted alert list, the filtered history grouped by calendar day,
//! and per-category counts for both.

use crate::scheduler::MonitorScheduler;
use crowsnest_common::types::{Alert, AlertCategory};
use crowsnest_history::{group_by_day, DateWindow, DayGroup, HistoryFilter};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct AlertPanel {
    pub current: Vec<Alert>,
    pub current_counts: HashMap<AlertCategory, usize>,
    pub history_days: Vec<DayGroup>,
    pub history_counts: HashMap<AlertCategory, usize>,
}

/// Builds the alert panel payload for one session, with the history side
/// filtered by `category` and `window`.
pub fn build_panel(
    scheduler: &MonitorScheduler,
    session_id: &str,
    category: Option<AlertCategory>,
    window: DateWindow,
) -> AlertPanel {
    let current = scheduler.current_alerts(session_id);

    let filter = HistoryFilter {
        category,
        window,
        session_id: Some(session_id.to_string()),
    };
    let entries = scheduler.history().filter(&filter);

    AlertPanel {
        current_counts: category_counts(current.iter().map(|a| a.category)),
        history_counts: category_counts(entries.iter().map(|e| e.alert.category)),
        history_days: group_by_day(&entries),
        current,
    }
}

/// Counts occurrences per category.
pub fn category_counts(
    categories: impl IntoIterator<Item = AlertCategory>,
) -> HashMap<AlertCategory, usize> {
    let mut counts = HashMap::new();
    for category in categories {
        *counts.entry(category).or_insert(0) += 1;
    }
    counts
}
