use super::{alert, ratio};
use crate::thresholds::Thresholds;
use crate::AlertCheck;
use chrono::{DateTime, Utc};
use crowsnest_common::types::{Alert, AlertCategory, Severity, TelemetrySnapshot};

/// 1-minute load average relative to the core count. The core count defaults
/// to 1 when the transport cannot report it.
pub struct LoadCheck;

impl AlertCheck for LoadCheck {
    fn name(&self) -> &'static str {
        "load"
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

        let cores = stats.cpu.cores.filter(|c| *c > 0).unwrap_or(1);
        let per_core = stats.load.one / cores as f64;
        let Some(severity) = limits.load_ratio.classify(per_core) else {
            return Vec::new();
        };
        let bound = limits.load_ratio.bound(severity);

        vec![alert(
            format!("load-{severity}"),
            severity,
            AlertCategory::System,
            match severity {
                Severity::Critical => "Load average critical".to_string(),
                _ => "Load average high".to_string(),
            },
            format!(
                "1-minute load average {} is {}x per core across {} core(s) (threshold {}x)",
                ratio(stats.load.one),
                ratio(per_core),
                cores,
                ratio(bound)
            ),
            ratio(per_core),
            ratio(bound),
            now,
        )]
    }
}
