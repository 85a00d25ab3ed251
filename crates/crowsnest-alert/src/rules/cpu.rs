use super::{alert, pct};
use crate::thresholds::Thresholds;
use crate::AlertCheck;
use chrono::{DateTime, Utc};
use crowsnest_common::types::{Alert, AlertCategory, Severity, TelemetrySnapshot};

/// Overall CPU utilization plus the independent I/O-wait sub-check.
pub struct CpuCheck;

impl AlertCheck for CpuCheck {
    fn name(&self) -> &'static str {
        "cpu"
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

        if let Some(severity) = limits.cpu.classify(stats.cpu.usage_percent) {
            let bound = limits.cpu.bound(severity);
            alerts.push(alert(
                format!("cpu-{severity}"),
                severity,
                AlertCategory::Cpu,
                match severity {
                    Severity::Critical => "CPU usage critical".to_string(),
                    _ => "CPU usage high".to_string(),
                },
                format!(
                    "CPU usage is at {} (threshold {})",
                    pct(stats.cpu.usage_percent),
                    pct(bound)
                ),
                pct(stats.cpu.usage_percent),
                pct(bound),
                now,
            ));
        }

        if let Some(iowait) = stats.cpu.iowait_percent {
            if let Some(severity) = limits.iowait.classify(iowait) {
                let bound = limits.iowait.bound(severity);
                alerts.push(alert(
                    format!("iowait-{severity}"),
                    severity,
                    AlertCategory::Cpu,
                    match severity {
                        Severity::Critical => "I/O wait critical".to_string(),
                        _ => "I/O wait high".to_string(),
                    },
                    format!(
                        "CPU is spending {} of its time waiting on I/O (threshold {})",
                        pct(iowait),
                        pct(bound)
                    ),
                    pct(iowait),
                    pct(bound),
                    now,
                ));
            }
        }

        alerts
    }
}
