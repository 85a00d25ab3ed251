//! Parser for the security probe's labeled text output.
//!
//! The probe command emits sections delimited by `---LABEL---` marker lines,
//! e.g.
//!
//! ```text
//! ---SSH_FAILURES---
//! 12
//! ---ZOMBIE---
//! 3
//! ---OOM_KILLS---
//! 0
//! ```
//!
//! The first decimal integer found in a section body is its count. Sections
//! that are missing or carry no parseable integer count as 0; unknown labels
//! are ignored. Parsing never fails.

use crowsnest_common::types::ProbeCounters;

pub const LABEL_SSH_FAILURES: &str = "SSH_FAILURES";
pub const LABEL_ZOMBIE: &str = "ZOMBIE";
pub const LABEL_OOM_KILLS: &str = "OOM_KILLS";

/// Extracts the probe counters from raw probe output.
pub fn parse(raw: &str) -> ProbeCounters {
    let mut counters = ProbeCounters::default();
    let mut current: Option<String> = None;

    for line in raw.lines() {
        if let Some(label) = section_label(line) {
            current = Some(label.to_string());
            continue;
        }
        let Some(label) = current.as_deref() else {
            continue;
        };
        let Some(n) = first_integer(line) else {
            continue;
        };
        match label {
            LABEL_SSH_FAILURES => counters.failed_logins = n,
            LABEL_ZOMBIE => counters.zombies = n,
            LABEL_OOM_KILLS => counters.oom_kills = n,
            _ => {}
        }
        // Only the first integer in a section counts; skip to the next marker.
        current = None;
    }

    counters
}

/// Recognizes a `---LABEL---` marker line and returns the label.
fn section_label(line: &str) -> Option<&str> {
    let label = line.trim().strip_prefix("---")?.strip_suffix("---")?;
    if !label.is_empty() && label.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
        Some(label)
    } else {
        None
    }
}

/// First run of ASCII digits in `s`, parsed as `u64`.
fn first_integer(s: &str) -> Option<u64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
