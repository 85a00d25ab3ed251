//! Built-in per-family checks.

pub mod cpu;
pub mod disk;
pub mod load;
pub mod memory;
pub mod network;
pub mod process;
pub mod security;

use crate::AlertCheck;
use chrono::{DateTime, Utc};
use crowsnest_common::types::{Alert, AlertCategory, Severity};

/// The built-in check set, in registration order.
pub(crate) fn built_in() -> Vec<Box<dyn AlertCheck>> {
    vec![
        Box::new(memory::MemoryCheck),
        Box::new(cpu::CpuCheck),
        Box::new(load::LoadCheck),
        Box::new(disk::DiskCheck),
        Box::new(network::SocketCheck),
        Box::new(process::ProcessCheck),
        Box::new(security::SecurityProbeCheck),
    ]
}

/// Formats a percentage with one decimal place, e.g. `96.0%`.
pub(crate) fn pct(value: f64) -> String {
    format!("{value:.1}%")
}

/// Formats a ratio with two decimal places, e.g. `1.60`.
pub(crate) fn ratio(value: f64) -> String {
    format!("{value:.2}")
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn alert(
    id: String,
    severity: Severity,
    category: AlertCategory,
    title: String,
    description: String,
    value: String,
    threshold: String,
    now: DateTime<Utc>,
) -> Alert {
    Alert {
        id,
        severity,
        category,
        title,
        description,
        value,
        threshold,
        timestamp: now,
    }
}
