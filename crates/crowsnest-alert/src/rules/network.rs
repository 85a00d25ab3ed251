use super::alert;
use crate::thresholds::Thresholds;
use crate::AlertCheck;
use chrono::{DateTime, Utc};
use crowsnest_common::types::{Alert, AlertCategory, Severity, TelemetrySnapshot};

/// TCP socket state checks. Established and TIME_WAIT counts are raised as
/// network alerts; a SYN_RECV backlog is raised as a security alert since it
/// can indicate a SYN flood.
pub struct SocketCheck;

impl AlertCheck for SocketCheck {
    fn name(&self) -> &'static str {
        "sockets"
    }

    fn evaluate(
        &self,
        snapshot: &TelemetrySnapshot,
        limits: &Thresholds,
        now: DateTime<Utc>,
    ) -> Vec<Alert> {
        let Some(sockets) = snapshot.socket_stats.as_ref() else {
            return Vec::new();
        };
        let mut alerts = Vec::new();

        if let Some(severity) = limits.established.classify(sockets.established as f64) {
            let bound = limits.established.bound(severity) as u64;
            alerts.push(alert(
                format!("established-{severity}"),
                severity,
                AlertCategory::Network,
                match severity {
                    Severity::Critical => "TCP connection count critical".to_string(),
                    _ => "TCP connection count high".to_string(),
                },
                format!(
                    "{} established TCP connections (threshold {})",
                    sockets.established, bound
                ),
                sockets.established.to_string(),
                bound.to_string(),
                now,
            ));
        }

        if let Some(severity) = limits.timewait.classify(sockets.time_wait as f64) {
            let bound = limits.timewait.bound(severity) as u64;
            alerts.push(alert(
                format!("timewait-{severity}"),
                severity,
                AlertCategory::Network,
                match severity {
                    Severity::Critical => "TIME_WAIT socket count critical".to_string(),
                    _ => "TIME_WAIT socket count high".to_string(),
                },
                format!(
                    "{} TCP sockets in TIME_WAIT (threshold {})",
                    sockets.time_wait, bound
                ),
                sockets.time_wait.to_string(),
                bound.to_string(),
                now,
            ));
        }

        if let Some(severity) = limits.synrecv.classify(sockets.syn_recv as f64) {
            let bound = limits.synrecv.bound(severity) as u64;
            alerts.push(alert(
                format!("synrecv-{severity}"),
                severity,
                AlertCategory::Security,
                "Possible SYN flood".to_string(),
                format!(
                    "{} TCP sockets in SYN_RECV (threshold {})",
                    sockets.syn_recv, bound
                ),
                sockets.syn_recv.to_string(),
                bound.to_string(),
                now,
            ));
        }

        alerts
    }
}
