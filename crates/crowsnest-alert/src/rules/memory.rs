use super::{alert, pct};
use crate::thresholds::Thresholds;
use crate::AlertCheck;
use chrono::{DateTime, Utc};
use crowsnest_common::types::{Alert, AlertCategory, Severity, TelemetrySnapshot};

/// Main-memory and swap usage checks. A host without swap (total 0) has no
/// swap percentage and the swap check is skipped.
pub struct MemoryCheck;

impl AlertCheck for MemoryCheck {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn evaluate(
        &self,
        snapshot: &TelemetrySnapshot,
        limits: &Thresholds,
        now: DateTime<Utc>,
    ) -> Vec<Alert> {
        let Some(stats) = snapshot.stats.as_ref() else {
            return Vec::new();
        };
        let mut alerts = Vec::new();

        if let Some(used) = stats.memory.used_percent() {
            if let Some(severity) = limits.memory.classify(used) {
                let bound = limits.memory.bound(severity);
                alerts.push(alert(
                    format!("memory-{severity}"),
                    severity,
                    AlertCategory::Memory,
                    match severity {
                        Severity::Critical => "Memory usage critical".to_string(),
                        _ => "Memory usage high".to_string(),
                    },
                    format!(
                        "Memory usage is at {} (threshold {})",
                        pct(used),
                        pct(bound)
                    ),
                    pct(used),
                    pct(bound),
                    now,
                ));
            }
        }

        if let Some(used) = stats.swap.used_percent() {
            if let Some(severity) = limits.swap.classify(used) {
                let bound = limits.swap.bound(severity);
                alerts.push(alert(
                    format!("swap-{severity}"),
                    severity,
                    AlertCategory::Memory,
                    match severity {
                        Severity::Critical => "Swap usage critical".to_string(),
                        _ => "Swap usage high".to_string(),
                    },
                    format!(
                        "Swap usage is at {} (threshold {})",
                        pct(used),
                        pct(bound)
                    ),
                    pct(used),
                    pct(bound),
                    now,
                ));
            }
        }

        alerts
    }
}
