//! [`TelemetrySource`] for the host the monitor itself runs on, backed by
//! `sysinfo`.
//!
//! Socket statistics and the security probe are transport-level concerns not
//! collected locally; those fetches return errors so the snapshot carries the
//! families as absent.

use crate::TelemetrySource;
use anyhow::{bail, Result};
use crowsnest_common::types::{
    CpuStats, DiskUsage, HostStats, LoadAverage, MemUsage, ProcessSample, SocketStats,
};
use std::sync::{Mutex, MutexGuard};
use sysinfo::{Disks, System, Users};

pub struct LocalSource {
    system: Mutex<System>,
}

impl LocalSource {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_all();
        system.refresh_memory();
        Self {
            system: Mutex::new(system),
        }
    }

    fn lock_system(&self) -> MutexGuard<'_, System> {
        self.system
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for LocalSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TelemetrySource for LocalSource {
    async fn fetch_stats(&self) -> Result<HostStats> {
        let mut system = self.lock_system();
        system.refresh_cpu_all();
        system.refresh_memory();

        let load_avg = System::load_average();

        Ok(HostStats {
            cpu: CpuStats {
                usage_percent: system.global_cpu_usage() as f64,
                // sysinfo reports utilization only, not the user/system/iowait split.
                user_percent: None,
                system_percent: None,
                iowait_percent: None,
                cores: Some(system.cpus().len() as u32),
            },
            load: LoadAverage {
                one: load_avg.one,
                five: load_avg.five,
                fifteen: load_avg.fifteen,
            },
            memory: MemUsage {
                total: system.total_memory(),
                used: system.used_memory(),
            },
            swap: MemUsage {
                total: system.total_swap(),
                used: system.used_swap(),
            },
        })
    }

    async fn fetch_socket_stats(&self) -> Result<SocketStats> {
        bail!("socket statistics are not collected by the local source")
    }

    async fn fetch_disks(&self) -> Result<Vec<DiskUsage>> {
        let disks = Disks::new_with_refreshed_list();
        Ok(disks
            .iter()
            .map(|disk| {
                let total = disk.total_space();
                let used = total.saturating_sub(disk.available_space());
                let used_percent = if total > 0 {
                    used as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                DiskUsage {
                    path: disk.mount_point().to_string_lossy().to_string(),
                    used_percent,
                    // Inode counts are not exposed by sysinfo.
                    inodes_used_percent: None,
                }
            })
            .collect())
    }

    async fn fetch_processes(&self) -> Result<Vec<ProcessSample>> {
        let mut system = self.lock_system();
        system.refresh_processes();
        system.refresh_memory();

        let total_memory = system.total_memory();
        let users = Users::new_with_refreshed_list();

        let mut samples: Vec<ProcessSample> = system
            .processes()
            .iter()
            .map(|(pid, proc)| {
                let user = proc
                    .user_id()
                    .and_then(|uid| users.get_user_by_id(uid))
                    .map(|u| u.name().to_string())
                    .unwrap_or_else(|| "-".to_string());
                let mem_percent = if total_memory > 0 {
                    proc.memory() as f64 / total_memory as f64 * 100.0
                } else {
                    0.0
                };
                ProcessSample {
                    pid: pid.as_u32(),
                    user,
                    cpu_percent: proc.cpu_usage() as f64,
                    mem_percent,
                    command: proc.name().to_string(),
                }
            })
            .collect();

        samples.sort_by(|a, b| {
            b.cpu_percent
                .partial_cmp(&a.cpu_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(samples)
    }

    async fn fetch_probe_output(&self) -> Result<String> {
        bail!("security probe is not collected by the local source")
    }
}
