use chrono::Utc;
use crowsnest_alert::dedup::reconcile;
use crowsnest_alert::thresholds::Thresholds;
use crowsnest_alert::Evaluator;
use crowsnest_common::types::{Alert, HistoryAlert};
use crowsnest_history::HistoryStore;
use crowsnest_telemetry::{fetch_snapshot, TelemetrySource};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// One monitored session: its telemetry transport plus the dedup state
/// carried between evaluation cycles.
pub struct Session {
    id: String,
    source: Arc<dyn TelemetrySource>,
    /// Dedup key set from the previous cycle. Holding this lock for the
    /// whole cycle is the in-flight guard: overlapping triggers for the same
    /// session skip rather than run concurrently.
    state: tokio::sync::Mutex<HashSet<String>>,
}

impl Session {
    pub fn new(id: impl Into<String>, source: Arc<dyn TelemetrySource>) -> Self {
        Self {
            id: id.into(),
            source,
            state: tokio::sync::Mutex::new(HashSet::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Runs one fetch → evaluate → reconcile → persist cycle.
    ///
    /// Returns the full severity-sorted alert list for current-state display
    /// (independent of what was persisted), or `None` when a cycle for this
    /// session is already in flight.
    pub async fn run_cycle(
        &self,
        evaluator: &Evaluator,
        limits: &Thresholds,
        fetch_timeout: Duration,
        history: &HistoryStore,
    ) -> Option<Vec<Alert>> {
        let Ok(mut last_keys) = self.state.try_lock() else {
            tracing::debug!(session_id = %self.id, "Evaluation already in flight, skipping");
            return None;
        };

        let snapshot = fetch_snapshot(&self.id, self.source.as_ref(), fetch_timeout).await;
        let alerts = evaluator.evaluate(&snapshot, limits, Utc::now());

        let (to_persist, new_keys) = reconcile(&alerts, &last_keys);
        *last_keys = new_keys;

        for alert in &to_persist {
            history.append(HistoryAlert {
                history_id: crowsnest_common::id::next_id(),
                session_id: self.id.clone(),
                alert: alert.clone(),
            });
        }

        if !to_persist.is_empty() {
            tracing::info!(
                session_id = %self.id,
                new = to_persist.len(),
                active = alerts.len(),
                "Recorded new alerts"
            );
        } else {
            tracing::debug!(session_id = %self.id, active = alerts.len(), "Evaluation cycle complete");
        }

        Some(alerts)
    }
}
