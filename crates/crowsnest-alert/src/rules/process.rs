use super::{alert, pct};
use crate::thresholds::Thresholds;
use crate::AlertCheck;
use chrono::{DateTime, Utc};
use crowsnest_common::types::{Alert, AlertCategory, Severity, TelemetrySnapshot};

/// Only the top entries of the CPU-ranked process list are examined, not the
/// full process table.
const TOP_PROCESSES: usize = 5;

/// Per-process CPU and memory checks over the top of the ranked list. Alert
/// ids embed the pid so each process dedups independently.
pub struct ProcessCheck;

impl AlertCheck for ProcessCheck {
    fn name(&self) -> &'static str {
        "process"
    }

    fn evaluate(
        &self,
        snapshot: &TelemetrySnapshot,
        limits: &Thresholds,
        now: DateTime<Utc>,
    ) -> Vec<Alert> {
        let Some(processes) = snapshot.processes.as_ref() else {
            return Vec::new();
        };
        let mut alerts = Vec::new();

        for proc in processes.iter().take(TOP_PROCESSES) {
            if let Some(severity) = limits.process_cpu.classify(proc.cpu_percent) {
                let bound = limits.process_cpu.bound(severity);
                alerts.push(alert(
                    format!("process-cpu-{severity}-{}", proc.pid),
                    severity,
                    AlertCategory::Process,
                    match severity {
                        Severity::Critical => {
                            format!("Process {} CPU critical", proc.command)
                        }
                        _ => format!("Process {} CPU high", proc.command),
                    },
                    format!(
                        "{} (pid {}, user {}) is using {} CPU (threshold {})",
                        proc.command,
                        proc.pid,
                        proc.user,
                        pct(proc.cpu_percent),
                        pct(bound)
                    ),
                    pct(proc.cpu_percent),
                    pct(bound),
                    now,
                ));
            }

            if let Some(severity) = limits.process_mem.classify(proc.mem_percent) {
                let bound = limits.process_mem.bound(severity);
                alerts.push(alert(
                    format!("process-mem-{severity}-{}", proc.pid),
                    severity,
                    AlertCategory::Process,
                    match severity {
                        Severity::Critical => {
                            format!("Process {} memory critical", proc.command)
                        }
                        _ => format!("Process {} memory high", proc.command),
                    },
                    format!(
                        "{} (pid {}, user {}) is using {} of memory (threshold {})",
                        proc.command,
                        proc.pid,
                        proc.user,
                        pct(proc.mem_percent),
                        pct(bound)
                    ),
                    pct(proc.mem_percent),
                    pct(bound),
                    now,
                ));
            }
        }

        alerts
    }
}
