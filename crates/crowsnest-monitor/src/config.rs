use crowsnest_alert::thresholds::Thresholds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between evaluation cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Per-sub-source fetch timeout. A fetch that exceeds it leaves its
    /// metric family absent for the cycle.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Path of the history database.
    #[serde(default = "default_history_path")]
    pub history_path: String,

    /// Session id the local telemetry source registers under.
    #[serde(default = "default_session_id")]
    pub session_id: String,

    /// Threshold table; any field left out keeps its default.
    #[serde(default)]
    pub thresholds: Thresholds,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            history_path: default_history_path(),
            session_id: default_session_id(),
            thresholds: Thresholds::default(),
        }
    }
}

impl MonitorConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

fn default_interval_secs() -> u64 {
    15
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_history_path() -> String {
    "data/history.db".to_string()
}

fn default_session_id() -> String {
    "local".to_string()
}
