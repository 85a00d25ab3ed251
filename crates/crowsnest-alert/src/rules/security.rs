use super::alert;
use crate::thresholds::Thresholds;
use crate::AlertCheck;
use chrono::{DateTime, Utc};
use crowsnest_common::types::{Alert, AlertCategory, Severity, TelemetrySnapshot};

/// Checks over the parsed security-probe counters. Any OOM-kill occurrence
/// is critical regardless of count.
pub struct SecurityProbeCheck;

impl AlertCheck for SecurityProbeCheck {
    fn name(&self) -> &'static str {
        "security-probe"
    }

    fn evaluate(
        &self,
        snapshot: &TelemetrySnapshot,
        limits: &Thresholds,
        now: DateTime<Utc>,
    ) -> Vec<Alert> {
        let Some(probe) = snapshot.security_probe.as_ref() else {
            return Vec::new();
        };
        let mut alerts = Vec::new();

        if let Some(severity) = limits.failed_logins.classify(probe.failed_logins as f64) {
            let bound = limits.failed_logins.bound(severity) as u64;
            alerts.push(alert(
                format!("failed-logins-{severity}"),
                severity,
                AlertCategory::Security,
                "Repeated SSH login failures".to_string(),
                format!(
                    "{} failed SSH login attempts recorded (threshold {})",
                    probe.failed_logins, bound
                ),
                probe.failed_logins.to_string(),
                bound.to_string(),
                now,
            ));
        }

        if let Some(severity) = limits.zombies.classify(probe.zombies as f64) {
            let bound = limits.zombies.bound(severity) as u64;
            alerts.push(alert(
                format!("zombie-{severity}"),
                severity,
                AlertCategory::Security,
                "Zombie processes detected".to_string(),
                format!(
                    "{} zombie processes present (threshold {})",
                    probe.zombies, bound
                ),
                probe.zombies.to_string(),
                bound.to_string(),
                now,
            ));
        }

        if probe.oom_kills > 0 {
            alerts.push(alert(
                "oom-critical".to_string(),
                Severity::Critical,
                AlertCategory::Security,
                "Out-of-memory killer invoked".to_string(),
                format!(
                    "The kernel OOM killer has terminated {} process(es)",
                    probe.oom_kills
                ),
                probe.oom_kills.to_string(),
                "0".to_string(),
                now,
            ));
        }

        alerts
    }
}
