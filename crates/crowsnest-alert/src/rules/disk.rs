use super::{alert, pct};
use crate::thresholds::Thresholds;
use crate::AlertCheck;
use chrono::{DateTime, Utc};
use crowsnest_common::types::{Alert, AlertCategory, Severity, TelemetrySnapshot};

/// Per-mount space and inode checks. Alert ids embed the mount point so each
/// filesystem dedups independently.
pub struct DiskCheck;

impl AlertCheck for DiskCheck {
    fn name(&self) -> &'static str {
        "disk"
    }

    fn evaluate(
        &self,
        snapshot: &TelemetrySnapshot,
        limits: &Thresholds,
        now: DateTime<Utc>,
    ) -> Vec<Alert> {
        let Some(disks) = snapshot.disks.as_ref() else {
            return Vec::new();
        };
        let mut alerts = Vec::new();

        for disk in disks {
            if let Some(severity) = limits.disk.classify(disk.used_percent) {
                let bound = limits.disk.bound(severity);
                alerts.push(alert(
                    format!("disk-{severity}-{}", disk.path),
                    severity,
                    AlertCategory::Disk,
                    match severity {
                        Severity::Critical => format!("Disk space critical on {}", disk.path),
                        _ => format!("Disk space low on {}", disk.path),
                    },
                    format!(
                        "{} is {} full (threshold {})",
                        disk.path,
                        pct(disk.used_percent),
                        pct(bound)
                    ),
                    pct(disk.used_percent),
                    pct(bound),
                    now,
                ));
            }

            if let Some(inodes) = disk.inodes_used_percent {
                if let Some(severity) = limits.inodes.classify(inodes) {
                    let bound = limits.inodes.bound(severity);
                    alerts.push(alert(
                        format!("inodes-{severity}-{}", disk.path),
                        severity,
                        AlertCategory::Disk,
                        match severity {
                            Severity::Critical => {
                                format!("Inode usage critical on {}", disk.path)
                            }
                            _ => format!("Inode usage high on {}", disk.path),
                        },
                        format!(
                            "{} has {} of its inodes in use (threshold {})",
                            disk.path,
                            pct(inodes),
                            pct(bound)
                        ),
                        pct(inodes),
                        pct(bound),
                        now,
                    ));
                }
            }
        }

        alerts
    }
}
