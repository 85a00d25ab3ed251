//! Telemetry acquisition boundary for the crowsnest monitoring engine.
//!
//! A [`TelemetrySource`] implementation fetches each metric family from a
//! monitored host; [`fetch_snapshot`] fans the sub-fetches out concurrently
//! and assembles a [`TelemetrySnapshot`], leaving any family that failed or
//! timed out absent rather than zeroed.

pub mod local;
pub mod probe;

use anyhow::Result;
use chrono::Utc;
use crowsnest_common::types::{
    DiskUsage, HostStats, ProcessSample, SocketStats, TelemetrySnapshot,
};
use std::future::Future;
use std::time::Duration;

/// Per-session telemetry transport for a monitored host.
///
/// Implementations fetch each metric family independently; a failure in one
/// must not affect the others. The security probe returns the raw labeled
/// text output of the probe command; parsing lives in [`probe`].
#[async_trait::async_trait]
pub trait TelemetrySource: Send + Sync {
    /// CPU, load average, memory, and swap figures.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport or host API call fails.
    async fn fetch_stats(&self) -> Result<HostStats>;

    /// TCP socket state counts.
    async fn fetch_socket_stats(&self) -> Result<SocketStats>;

    /// Per-mount disk usage.
    async fn fetch_disks(&self) -> Result<Vec<DiskUsage>>;

    /// Process list ranked by CPU usage, highest first.
    async fn fetch_processes(&self) -> Result<Vec<ProcessSample>>;

    /// Raw security-probe text output (see [`probe::parse`]).
    async fn fetch_probe_output(&self) -> Result<String>;
}

/// Fetches all metric families from `source` concurrently and assembles a
/// snapshot for `session_id`.
///
/// Each sub-fetch runs under `timeout`. A sub-fetch that fails or times out
/// is logged and leaves its family `None` on the snapshot; it never aborts
/// the other fetches.
pub async fn fetch_snapshot(
    session_id: &str,
    source: &dyn TelemetrySource,
    timeout: Duration,
) -> TelemetrySnapshot {
    let captured_at = Utc::now();
    let (stats, socket_stats, disks, processes, probe_output) = tokio::join!(
        sub_fetch(session_id, "stats", timeout, source.fetch_stats()),
        sub_fetch(session_id, "sockets", timeout, source.fetch_socket_stats()),
        sub_fetch(session_id, "disks", timeout, source.fetch_disks()),
        sub_fetch(session_id, "processes", timeout, source.fetch_processes()),
        sub_fetch(session_id, "probe", timeout, source.fetch_probe_output()),
    );

    TelemetrySnapshot {
        session_id: session_id.to_string(),
        captured_at,
        stats,
        socket_stats,
        disks,
        processes,
        security_probe: probe_output.map(|raw| probe::parse(&raw)),
    }
}

async fn sub_fetch<T>(
    session_id: &str,
    family: &str,
    timeout: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Option<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            tracing::warn!(
                session_id = %session_id,
                family,
                error = %e,
                "Telemetry fetch failed, skipping family this cycle"
            );
            None
        }
        Err(_) => {
            tracing::warn!(
                session_id = %session_id,
                family,
                timeout_secs = timeout.as_secs(),
                "Telemetry fetch timed out, skipping family this cycle"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use crowsnest_common::types::{CpuStats, LoadAverage, MemUsage};

    struct PartialSource;

    #[async_trait::async_trait]
    impl TelemetrySource for PartialSource {
        async fn fetch_stats(&self) -> Result<HostStats> {
            Ok(HostStats {
                cpu: CpuStats {
                    usage_percent: 12.0,
                    user_percent: None,
                    system_percent: None,
                    iowait_percent: None,
                    cores: Some(4),
                },
                load: LoadAverage {
                    one: 0.5,
                    five: 0.4,
                    fifteen: 0.3,
                },
                memory: MemUsage {
                    total: 100,
                    used: 40,
                },
                swap: MemUsage { total: 0, used: 0 },
            })
        }

        async fn fetch_socket_stats(&self) -> Result<SocketStats> {
            bail!("sockets unavailable")
        }

        async fn fetch_disks(&self) -> Result<Vec<DiskUsage>> {
            Ok(vec![])
        }

        async fn fetch_processes(&self) -> Result<Vec<ProcessSample>> {
            bail!("processes unavailable")
        }

        async fn fetch_probe_output(&self) -> Result<String> {
            Ok("---ZOMBIE---\n2\n".to_string())
        }
    }

    #[tokio::test]
    async fn failed_sub_fetches_leave_families_absent() {
        let snapshot =
            fetch_snapshot("test", &PartialSource, Duration::from_secs(1)).await;

        assert_eq!(snapshot.session_id, "test");
        assert!(snapshot.stats.is_some());
        assert!(snapshot.socket_stats.is_none());
        assert!(snapshot.processes.is_none());
        assert!(snapshot.disks.expect("disks fetched").is_empty());
        assert_eq!(snapshot.security_probe.unwrap().zombies, 2);
    }

    struct StalledSource;

    #[async_trait::async_trait]
    impl TelemetrySource for StalledSource {
        async fn fetch_stats(&self) -> Result<HostStats> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            bail!("unreachable")
        }

        async fn fetch_socket_stats(&self) -> Result<SocketStats> {
            Ok(SocketStats {
                established: 3,
                time_wait: 1,
                syn_recv: 0,
                total: 4,
            })
        }

        async fn fetch_disks(&self) -> Result<Vec<DiskUsage>> {
            bail!("disks unavailable")
        }

        async fn fetch_processes(&self) -> Result<Vec<ProcessSample>> {
            bail!("processes unavailable")
        }

        async fn fetch_probe_output(&self) -> Result<String> {
            bail!("probe unavailable")
        }
    }

    #[tokio::test]
    async fn timed_out_sub_fetch_does_not_block_others() {
        let snapshot =
            fetch_snapshot("test", &StalledSource, Duration::from_millis(50)).await;

        assert!(snapshot.stats.is_none());
        assert_eq!(snapshot.socket_stats.unwrap().established, 3);
    }
}
