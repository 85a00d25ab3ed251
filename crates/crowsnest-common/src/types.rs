use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alert severity level, ordered from lowest to highest.
///
/// # Examples
///
/// ```
/// use crowsnest_common::types::Severity;
///
/// let sev: Severity = "warning".parse().unwrap();
/// assert_eq!(sev, Severity::Warning);
/// assert_eq!(sev.to_string(), "warning");
/// assert!(Severity::Critical > Severity::Info);
/// assert!(Severity::Critical.rank() < Severity::Info.rank());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Display ordering weight. Critical alerts sort first in operator-facing
    /// lists: critical=0, warning=1, info=2.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// Metric family a raised alert belongs to, used for filtering and counting
/// in the alert views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Memory,
    Cpu,
    Disk,
    Network,
    Security,
    Process,
    System,
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertCategory::Memory => write!(f, "memory"),
            AlertCategory::Cpu => write!(f, "cpu"),
            AlertCategory::Disk => write!(f, "disk"),
            AlertCategory::Network => write!(f, "network"),
            AlertCategory::Security => write!(f, "security"),
            AlertCategory::Process => write!(f, "process"),
            AlertCategory::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for AlertCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(AlertCategory::Memory),
            "cpu" => Ok(AlertCategory::Cpu),
            "disk" => Ok(AlertCategory::Disk),
            "network" => Ok(AlertCategory::Network),
            "security" => Ok(AlertCategory::Security),
            "process" => Ok(AlertCategory::Process),
            "system" => Ok(AlertCategory::System),
            _ => Err(format!("unknown alert category: {s}")),
        }
    }
}

/// A transient, rule-triggered classification of one snapshot metric against
/// a threshold. Produced by the evaluator, valid for one evaluation cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Stable key identifying which rule fired (e.g. `memory-critical`).
    /// Per-entity rules embed the entity: `disk-warning-/var`,
    /// `process-cpu-critical-4312`.
    pub id: String,
    pub severity: Severity,
    pub category: AlertCategory,
    pub title: String,
    pub description: String,
    /// Formatted observed value (e.g. `96.0%`, `25`).
    pub value: String,
    /// Formatted bound that was breached (e.g. `95.0%`, `20`).
    pub threshold: String,
    /// Evaluation time.
    pub timestamp: DateTime<Utc>,
}

/// A persisted occurrence of an [`Alert`], retained in the history log until
/// evicted by capacity pressure or an explicit clear.
///
/// The originating rule id is `alert.id`; `history_id` is unique per
/// persisted occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryAlert {
    pub history_id: String,
    pub session_id: String,
    #[serde(flatten)]
    pub alert: Alert,
}

/// One telemetry sample for one monitored session at one instant.
///
/// Every metric family is optional: a sub-source that failed to fetch or is
/// not collected by the session's transport is `None`, and its checks are
/// skipped. Absent telemetry is never read as a zero value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub session_id: String,
    pub captured_at: DateTime<Utc>,
    pub stats: Option<HostStats>,
    pub socket_stats: Option<SocketStats>,
    pub disks: Option<Vec<DiskUsage>>,
    /// Ranked by CPU usage, highest first. Only the top entries are consulted
    /// by the process checks.
    pub processes: Option<Vec<ProcessSample>>,
    pub security_probe: Option<ProbeCounters>,
}

impl TelemetrySnapshot {
    /// An empty snapshot with every metric family absent.
    pub fn new(session_id: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            captured_at,
            stats: None,
            socket_stats: None,
            disks: None,
            processes: None,
            security_probe: None,
        }
    }
}

/// CPU, load, memory, and swap figures fetched as one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostStats {
    pub cpu: CpuStats,
    pub load: LoadAverage,
    pub memory: MemUsage,
    pub swap: MemUsage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuStats {
    /// Overall utilization, 0-100.
    pub usage_percent: f64,
    pub user_percent: Option<f64>,
    pub system_percent: Option<f64>,
    pub iowait_percent: Option<f64>,
    /// Logical core count; `None` when the transport cannot report it.
    pub cores: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Byte totals for a memory pool (main memory or swap).
///
/// # Examples
///
/// ```
/// use crowsnest_common::types::MemUsage;
///
/// let mem = MemUsage { total: 200, used: 50 };
/// assert_eq!(mem.used_percent(), Some(25.0));
///
/// // A host without swap reports total 0; there is no percentage to check.
/// let swap = MemUsage { total: 0, used: 0 };
/// assert_eq!(swap.used_percent(), None);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MemUsage {
    pub total: u64,
    pub used: u64,
}

impl MemUsage {
    /// Used percentage, or `None` when the pool has zero capacity.
    pub fn used_percent(&self) -> Option<f64> {
        if self.total > 0 {
            Some(self.used as f64 / self.total as f64 * 100.0)
        } else {
            None
        }
    }
}

/// TCP socket state counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SocketStats {
    pub established: u64,
    pub time_wait: u64,
    pub syn_recv: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskUsage {
    /// Mount point (e.g. `/var`).
    pub path: String,
    pub used_percent: f64,
    /// Inode usage; `None` when the transport does not report inodes.
    pub inodes_used_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub user: String,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub command: String,
}

/// Counters extracted from the security probe's labeled text output.
///
/// A section that is missing or carries no parseable integer counts as 0;
/// the probe being absent altogether is modeled as `Option<ProbeCounters>`
/// on the snapshot instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeCounters {
    pub failed_logins: u64,
    pub zombies: u64,
    pub oom_kills: u64,
}
