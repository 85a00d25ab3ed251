use crate::config::MonitorConfig;
use crate::session::Session;
use crowsnest_alert::thresholds::Thresholds;
use crowsnest_alert::Evaluator;
use crowsnest_common::types::Alert;
use crowsnest_history::HistoryStore;
use crowsnest_telemetry::TelemetrySource;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Owns the monitored sessions and drives their evaluation cycles.
///
/// Sessions evaluate independently: each tick fans the cycles out as tasks
/// and a failure or overlap in one session never blocks the others.
pub struct MonitorScheduler {
    sessions: Mutex<HashMap<String, Arc<Session>>>,
    evaluator: Arc<Evaluator>,
    limits: Arc<Thresholds>,
    history: Arc<HistoryStore>,
    fetch_timeout: Duration,
    /// Latest alert list per session, for the current-state view.
    current: Mutex<HashMap<String, Vec<Alert>>>,
}

impl MonitorScheduler {
    pub fn new(config: &MonitorConfig, history: Arc<HistoryStore>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            evaluator: Arc::new(Evaluator::new()),
            limits: Arc::new(config.thresholds.clone()),
            history,
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
            current: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a session under `id`. An existing session with the same id
    /// is replaced, dropping its dedup state.
    pub fn add_session(&self, id: &str, source: Arc<dyn TelemetrySource>) {
        let session = Arc::new(Session::new(id, source));
        self.lock_sessions().insert(id.to_string(), session);
        tracing::info!(session_id = %id, "Session registered");
    }

    /// Removes a session. Returns true if it existed. Its history entries
    /// are kept until cleared explicitly.
    pub fn remove_session(&self, id: &str) -> bool {
        let removed = self.lock_sessions().remove(id).is_some();
        if removed {
            self.lock_current().remove(id);
            tracing::info!(session_id = %id, "Session removed");
        }
        removed
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.lock_sessions().keys().cloned().collect()
    }

    /// Latest severity-sorted alert list for `session_id`, empty until the
    /// first completed cycle.
    pub fn current_alerts(&self, session_id: &str) -> Vec<Alert> {
        self.lock_current()
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Runs one evaluation cycle for every registered session, in parallel.
    pub async fn run_once(&self) {
        let sessions: Vec<Arc<Session>> = self.lock_sessions().values().cloned().collect();
        let mut handles = Vec::with_capacity(sessions.len());

        for session in sessions {
            let evaluator = self.evaluator.clone();
            let limits = self.limits.clone();
            let history = self.history.clone();
            let fetch_timeout = self.fetch_timeout;
            handles.push(tokio::spawn(async move {
                let alerts = session
                    .run_cycle(&evaluator, &limits, fetch_timeout, &history)
                    .await;
                (session, alerts)
            }));
        }

        for handle in handles {
            match handle.await {
                Ok((session, Some(alerts))) => {
                    self.lock_current()
                        .insert(session.id().to_string(), alerts);
                }
                // Cycle skipped: an earlier one is still in flight.
                Ok((_, None)) => {}
                Err(e) => {
                    tracing::error!(error = %e, "Evaluation task panicked");
                }
            }
        }
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<String, Arc<Session>>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_current(&self) -> MutexGuard<'_, HashMap<String, Vec<Alert>>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
