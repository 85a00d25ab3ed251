//! Filtering and calendar-day grouping over history entries.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use crowsnest_common::types::{AlertCategory, HistoryAlert};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Date window for history queries. `Today` is bounded by the local calendar
/// day; `Week` is a rolling 7x24h window from now, not calendar-aligned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateWindow {
    #[default]
    All,
    Today,
    Week,
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateWindow::All => write!(f, "all"),
            DateWindow::Today => write!(f, "today"),
            DateWindow::Week => write!(f, "week"),
        }
    }
}

impl std::str::FromStr for DateWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(DateWindow::All),
            "today" => Ok(DateWindow::Today),
            "week" => Ok(DateWindow::Week),
            _ => Err(format!("unknown date window: {s}")),
        }
    }
}

/// Predicate for history queries.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub category: Option<AlertCategory>,
    pub window: DateWindow,
    pub session_id: Option<String>,
}

/// Applies `filter` to `entries`, evaluating the date window against `now`.
/// Input order is preserved.
pub fn filter_entries<'a>(
    entries: impl IntoIterator<Item = &'a HistoryAlert>,
    filter: &HistoryFilter,
    now: DateTime<Utc>,
) -> Vec<HistoryAlert> {
    let today = now.with_timezone(&Local).date_naive();
    let week_cutoff = now - Duration::days(7);

    entries
        .into_iter()
        .filter(|entry| {
            if let Some(session_id) = filter.session_id.as_deref() {
                if entry.session_id != session_id {
                    return false;
                }
            }
            if let Some(category) = filter.category {
                if entry.alert.category != category {
                    return false;
                }
            }
            match filter.window {
                DateWindow::All => true,
                DateWindow::Today => local_day(entry) == today,
                DateWindow::Week => entry.alert.timestamp >= week_cutoff,
            }
        })
        .cloned()
        .collect()
}

/// One local calendar day of history entries, labeled for display.
#[derive(Debug, Clone, Serialize)]
pub struct DayGroup {
    /// Long date label, e.g. `Thursday, August 6, 2026`.
    pub label: String,
    pub entries: Vec<HistoryAlert>,
}

/// Groups entries by their local calendar date. Group order follows the
/// first occurrence of each day in the input, so head-first (most recent
/// first) input yields most-recent-day-first groups.
pub fn group_by_day(entries: &[HistoryAlert]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for entry in entries {
        let local = entry.alert.timestamp.with_timezone(&Local);
        let day = local.date_naive();
        let slot = *index.entry(day).or_insert_with(|| {
            groups.push(DayGroup {
                label: local.format("%A, %B %-d, %Y").to_string(),
                entries: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].entries.push(entry.clone());
    }

    groups
}

fn local_day(entry: &HistoryAlert) -> NaiveDate {
    entry.alert.timestamp.with_timezone(&Local).date_naive()
}
