//! Threshold evaluation engine: maps a telemetry snapshot to a
//! severity-sorted list of transient alerts.
//!
//! Each metric family is covered by an [`AlertCheck`] implementation that
//! applies the two-tier (critical, then warning) policy from the
//! [`thresholds::Thresholds`] table. Evaluation is pure and deterministic;
//! a metric family absent from the snapshot is skipped, never treated as a
//! zero-value breach. The [`dedup`] module decides which of the produced
//! alerts are new since the previous cycle and should be persisted.

pub mod dedup;
pub mod rules;
pub mod thresholds;

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use crowsnest_common::types::{Alert, TelemetrySnapshot};
use thresholds::Thresholds;

/// A per-family check that inspects a snapshot and produces zero or more
/// alerts.
///
/// Implementations must be pure: same snapshot, limits, and `now` in, same
/// alerts out. Exactly one of critical/warning may fire per check per entity
/// per cycle.
pub trait AlertCheck: Send + Sync {
    /// Short name used for logging and registration (e.g. `"memory"`).
    fn name(&self) -> &'static str;

    /// Evaluates the snapshot against the threshold table.
    fn evaluate(
        &self,
        snapshot: &TelemetrySnapshot,
        limits: &Thresholds,
        now: DateTime<Utc>,
    ) -> Vec<Alert>;
}

/// Runs a fixed set of [`AlertCheck`]s over snapshots.
pub struct Evaluator {
    checks: Vec<Box<dyn AlertCheck>>,
}

impl Evaluator {
    /// An evaluator with the built-in check set (memory, cpu, load, disk,
    /// sockets, processes, security probe).
    pub fn new() -> Self {
        Self {
            checks: rules::built_in(),
        }
    }

    /// An evaluator with a custom check set.
    pub fn with_checks(checks: Vec<Box<dyn AlertCheck>>) -> Self {
        Self { checks }
    }

    pub fn checks(&self) -> &[Box<dyn AlertCheck>] {
        &self.checks
    }

    /// Evaluates one snapshot into a severity-sorted alert list.
    ///
    /// The result is ordered by severity rank ascending (critical, warning,
    /// info); order among equal severities follows check registration order.
    pub fn evaluate(
        &self,
        snapshot: &TelemetrySnapshot,
        limits: &Thresholds,
        now: DateTime<Utc>,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();
        for check in &self.checks {
            alerts.extend(check.evaluate(snapshot, limits, now));
        }
        alerts.sort_by_key(|a| a.severity.rank());
        alerts
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
