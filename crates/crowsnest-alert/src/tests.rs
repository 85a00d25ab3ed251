use crate::dedup::{dedup_key, reconcile};
use crate::thresholds::Thresholds;
use crate::Evaluator;
use chrono::Utc;
use crowsnest_common::types::{
    CpuStats, DiskUsage, HostStats, LoadAverage, MemUsage, ProbeCounters, ProcessSample,
    Severity, SocketStats, TelemetrySnapshot,
};
use std::collections::HashSet;

fn quiet_stats() -> HostStats {
    HostStats {
        cpu: CpuStats {
            usage_percent: 10.0,
            user_percent: None,
            system_percent: None,
            iowait_percent: None,
            cores: Some(4),
        },
        load: LoadAverage {
            one: 0.2,
            five: 0.2,
            fifteen: 0.2,
        },
        memory: MemUsage {
            total: 100,
            used: 40,
        },
        swap: MemUsage { total: 0, used: 0 },
    }
}

fn snapshot_with_memory(used: u64, total: u64) -> TelemetrySnapshot {
    let mut snapshot = TelemetrySnapshot::new("web-01", Utc::now());
    let mut stats = quiet_stats();
    stats.memory = MemUsage { total, used };
    snapshot.stats = Some(stats);
    snapshot
}

fn snapshot_with_sockets(established: u64, time_wait: u64, syn_recv: u64) -> TelemetrySnapshot {
    let mut snapshot = TelemetrySnapshot::new("web-01", Utc::now());
    snapshot.socket_stats = Some(SocketStats {
        established,
        time_wait,
        syn_recv,
        total: established + time_wait + syn_recv,
    });
    snapshot
}

fn sample_process(pid: u32, cpu_percent: f64, mem_percent: f64) -> ProcessSample {
    ProcessSample {
        pid,
        user: "app".to_string(),
        cpu_percent,
        mem_percent,
        command: format!("worker-{pid}"),
    }
}

#[test]
fn memory_critical_at_96_percent() {
    let evaluator = Evaluator::new();
    let alerts = evaluator.evaluate(
        &snapshot_with_memory(96, 100),
        &Thresholds::default(),
        Utc::now(),
    );

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "memory-critical");
    assert_eq!(alerts[0].severity, Severity::Critical);
    assert_eq!(alerts[0].value, "96.0%");
    assert_eq!(alerts[0].threshold, "95.0%");
}

#[test]
fn memory_warning_band() {
    let evaluator = Evaluator::new();
    let alerts = evaluator.evaluate(
        &snapshot_with_memory(85, 100),
        &Thresholds::default(),
        Utc::now(),
    );

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "memory-warning");
    assert_eq!(alerts[0].severity, Severity::Warning);
}

#[test]
fn memory_below_warning_is_silent() {
    let evaluator = Evaluator::new();
    let alerts = evaluator.evaluate(
        &snapshot_with_memory(70, 100),
        &Thresholds::default(),
        Utc::now(),
    );
    assert!(alerts.is_empty());
}

#[test]
fn thresholds_are_non_strict() {
    let evaluator = Evaluator::new();
    let limits = Thresholds::default();

    let critical = evaluator.evaluate(&snapshot_with_memory(95, 100), &limits, Utc::now());
    assert_eq!(critical[0].id, "memory-critical");

    let warning = evaluator.evaluate(&snapshot_with_memory(80, 100), &limits, Utc::now());
    assert_eq!(warning[0].id, "memory-warning");
}

#[test]
fn empty_snapshot_produces_no_alerts() {
    let evaluator = Evaluator::new();
    let snapshot = TelemetrySnapshot::new("web-01", Utc::now());
    let alerts = evaluator.evaluate(&snapshot, &Thresholds::default(), Utc::now());
    assert!(alerts.is_empty());
}

#[test]
fn missing_socket_stats_skip_network_checks() {
    let evaluator = Evaluator::new();
    // Nothing socket-related may fire when the family is absent, even though
    // a zero-valued family would also be below every bound here.
    let alerts = evaluator.evaluate(
        &snapshot_with_memory(40, 100),
        &Thresholds::default(),
        Utc::now(),
    );
    assert!(alerts.iter().all(|a| !a.id.starts_with("established")
        && !a.id.starts_with("timewait")
        && !a.id.starts_with("synrecv")));
}

#[test]
fn synrecv_backlog_is_critical_security_alert() {
    let evaluator = Evaluator::new();
    let alerts = evaluator.evaluate(
        &snapshot_with_sockets(10, 10, 25),
        &Thresholds::default(),
        Utc::now(),
    );

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "synrecv-critical");
    assert_eq!(alerts[0].category.to_string(), "security");
    assert_eq!(alerts[0].value, "25");
    assert_eq!(alerts[0].threshold, "20");
}

#[test]
fn swap_without_capacity_is_skipped() {
    let evaluator = Evaluator::new();
    let limits = Thresholds::default();

    // total 0: no percentage, no alert.
    let alerts = evaluator.evaluate(&snapshot_with_memory(40, 100), &limits, Utc::now());
    assert!(alerts.iter().all(|a| !a.id.starts_with("swap")));

    let mut snapshot = snapshot_with_memory(40, 100);
    snapshot.stats.as_mut().unwrap().swap = MemUsage {
        total: 100,
        used: 70,
    };
    let alerts = evaluator.evaluate(&snapshot, &limits, Utc::now());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "swap-warning");
}

#[test]
fn load_ratio_uses_core_count() {
    let evaluator = Evaluator::new();
    let limits = Thresholds::default();

    let mut snapshot = snapshot_with_memory(40, 100);
    {
        let stats = snapshot.stats.as_mut().unwrap();
        stats.cpu.cores = Some(2);
        stats.load.one = 3.2;
    }
    let alerts = evaluator.evaluate(&snapshot, &limits, Utc::now());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "load-critical");
    assert_eq!(alerts[0].value, "1.60");
}

#[test]
fn load_ratio_defaults_to_one_core() {
    let evaluator = Evaluator::new();
    let mut snapshot = snapshot_with_memory(40, 100);
    {
        let stats = snapshot.stats.as_mut().unwrap();
        stats.cpu.cores = None;
        stats.load.one = 1.2;
    }
    let alerts = evaluator.evaluate(&snapshot, &Thresholds::default(), Utc::now());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "load-warning");
}

#[test]
fn iowait_is_an_independent_sub_check() {
    let evaluator = Evaluator::new();
    let mut snapshot = snapshot_with_memory(40, 100);
    snapshot.stats.as_mut().unwrap().cpu.iowait_percent = Some(45.0);
    let alerts = evaluator.evaluate(&snapshot, &Thresholds::default(), Utc::now());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "iowait-critical");
}

#[test]
fn disk_alerts_embed_the_mount_point() {
    let evaluator = Evaluator::new();
    let mut snapshot = TelemetrySnapshot::new("web-01", Utc::now());
    snapshot.disks = Some(vec![
        DiskUsage {
            path: "/".to_string(),
            used_percent: 96.0,
            inodes_used_percent: None,
        },
        DiskUsage {
            path: "/var".to_string(),
            used_percent: 88.0,
            inodes_used_percent: Some(96.0),
        },
    ]);

    let alerts = evaluator.evaluate(&snapshot, &Thresholds::default(), Utc::now());
    let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
    assert!(ids.contains(&"disk-critical-/"));
    assert!(ids.contains(&"disk-warning-/var"));
    assert!(ids.contains(&"inodes-critical-/var"));
    assert_eq!(alerts.len(), 3);
}

#[test]
fn only_top_five_processes_are_examined() {
    let evaluator = Evaluator::new();
    let mut snapshot = TelemetrySnapshot::new("web-01", Utc::now());
    let mut processes: Vec<ProcessSample> =
        (1..=5).map(|pid| sample_process(pid, 10.0, 5.0)).collect();
    // Sixth entry would breach the critical bound, but it is out of rank.
    processes.push(sample_process(6, 99.0, 5.0));
    snapshot.processes = Some(processes);

    let alerts = evaluator.evaluate(&snapshot, &Thresholds::default(), Utc::now());
    assert!(alerts.is_empty());
}

#[test]
fn process_alerts_embed_the_pid() {
    let evaluator = Evaluator::new();
    let mut snapshot = TelemetrySnapshot::new("web-01", Utc::now());
    snapshot.processes = Some(vec![
        sample_process(4312, 85.0, 10.0),
        sample_process(4313, 10.0, 35.0),
    ]);

    let alerts = evaluator.evaluate(&snapshot, &Thresholds::default(), Utc::now());
    let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
    assert!(ids.contains(&"process-cpu-critical-4312"));
    assert!(ids.contains(&"process-mem-warning-4313"));
    assert_eq!(alerts.len(), 2);
}

#[test]
fn zombie_count_from_probe_raises_warning() {
    let evaluator = Evaluator::new();
    let mut snapshot = TelemetrySnapshot::new("web-01", Utc::now());
    snapshot.security_probe = Some(ProbeCounters {
        failed_logins: 0,
        zombies: 5,
        oom_kills: 0,
    });

    let alerts = evaluator.evaluate(&snapshot, &Thresholds::default(), Utc::now());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "zombie-warning");
    assert_eq!(alerts[0].value, "5");
}

#[test]
fn any_oom_kill_is_critical() {
    let evaluator = Evaluator::new();
    let mut snapshot = TelemetrySnapshot::new("web-01", Utc::now());
    snapshot.security_probe = Some(ProbeCounters {
        failed_logins: 0,
        zombies: 0,
        oom_kills: 1,
    });

    let alerts = evaluator.evaluate(&snapshot, &Thresholds::default(), Utc::now());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "oom-critical");
    assert_eq!(alerts[0].severity, Severity::Critical);
}

#[test]
fn alerts_are_sorted_by_severity_rank() {
    let evaluator = Evaluator::new();
    let mut snapshot = snapshot_with_memory(85, 100); // warning
    snapshot.security_probe = Some(ProbeCounters {
        failed_logins: 0,
        zombies: 4,  // warning
        oom_kills: 2, // critical
    });
    snapshot.disks = Some(vec![DiskUsage {
        path: "/".to_string(),
        used_percent: 97.0, // critical
        inodes_used_percent: None,
    }]);

    let alerts = evaluator.evaluate(&snapshot, &Thresholds::default(), Utc::now());
    assert!(alerts.len() >= 4);
    assert_eq!(alerts[0].severity, Severity::Critical);
    for pair in alerts.windows(2) {
        assert!(pair[0].severity.rank() <= pair[1].severity.rank());
    }
}

#[test]
fn reconcile_is_idempotent_for_unchanged_values() {
    let evaluator = Evaluator::new();
    let alerts = evaluator.evaluate(
        &snapshot_with_memory(96, 100),
        &Thresholds::default(),
        Utc::now(),
    );

    let (first, keys) = reconcile(&alerts, &HashSet::new());
    assert_eq!(first.len(), alerts.len());

    let (second, next_keys) = reconcile(&alerts, &keys);
    assert!(second.is_empty());
    assert_eq!(next_keys, keys);
}

#[test]
fn changed_value_string_is_re_persisted() {
    let evaluator = Evaluator::new();
    let limits = Thresholds::default();

    // 82.0% and 83.1%: same warning band, different display value.
    let first = evaluator.evaluate(&snapshot_with_memory(820, 1000), &limits, Utc::now());
    let second = evaluator.evaluate(&snapshot_with_memory(831, 1000), &limits, Utc::now());
    assert_eq!(first[0].value, "82.0%");
    assert_eq!(second[0].value, "83.1%");

    let (_, keys) = reconcile(&first, &HashSet::new());
    let (to_persist, _) = reconcile(&second, &keys);
    assert_eq!(to_persist.len(), 1);
    assert_eq!(to_persist[0].id, "memory-warning");
}

#[test]
fn keys_stop_suppressing_once_the_alert_clears() {
    let evaluator = Evaluator::new();
    let limits = Thresholds::default();

    let firing = evaluator.evaluate(&snapshot_with_memory(96, 100), &limits, Utc::now());
    let (_, keys) = reconcile(&firing, &HashSet::new());

    // Alert clears for a cycle; the replacement key set forgets it.
    let quiet = evaluator.evaluate(&snapshot_with_memory(40, 100), &limits, Utc::now());
    let (persisted, keys) = reconcile(&quiet, &keys);
    assert!(persisted.is_empty());
    assert!(keys.is_empty());

    // Same value fires again: persisted again.
    let again = evaluator.evaluate(&snapshot_with_memory(96, 100), &limits, Utc::now());
    let (persisted, _) = reconcile(&again, &keys);
    assert_eq!(persisted.len(), 1);
}

#[test]
fn dedup_key_joins_id_and_display_value() {
    let evaluator = Evaluator::new();
    let alerts = evaluator.evaluate(
        &snapshot_with_memory(96, 100),
        &Thresholds::default(),
        Utc::now(),
    );
    assert_eq!(dedup_key(&alerts[0]), "memory-critical-96.0%");
}
