//! The fixed threshold table driving every check, overridable from
//! configuration.

use crowsnest_common::types::Severity;
use serde::{Deserialize, Serialize};

/// A two-tier bound: warning and critical, compared non-strictly (`>=`).
///
/// # Examples
///
/// ```
/// use crowsnest_alert::thresholds::Band;
/// use crowsnest_common::types::Severity;
///
/// let band = Band::new(80.0, 95.0);
/// assert_eq!(band.classify(96.0), Some(Severity::Critical));
/// assert_eq!(band.classify(95.0), Some(Severity::Critical));
/// assert_eq!(band.classify(80.0), Some(Severity::Warning));
/// assert_eq!(band.classify(79.9), None);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Band {
    pub warning: f64,
    pub critical: f64,
}

impl Band {
    pub const fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }

    /// Two-tier classification: critical is checked first; if not met,
    /// warning; otherwise no severity.
    pub fn classify(&self, value: f64) -> Option<Severity> {
        if value >= self.critical {
            Some(Severity::Critical)
        } else if value >= self.warning {
            Some(Severity::Warning)
        } else {
            None
        }
    }

    /// The bound that applies to the given severity, for display.
    pub fn bound(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Critical => self.critical,
            _ => self.warning,
        }
    }
}

/// Threshold table for every metric family. Percentage bands are 0-100,
/// `load_ratio` is 1-minute load divided by core count, the socket and probe
/// bands are plain counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub memory: Band,
    pub swap: Band,
    pub cpu: Band,
    pub iowait: Band,
    pub load_ratio: Band,
    pub disk: Band,
    pub inodes: Band,
    pub established: Band,
    pub timewait: Band,
    pub synrecv: Band,
    pub process_cpu: Band,
    pub process_mem: Band,
    pub failed_logins: Band,
    pub zombies: Band,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            memory: Band::new(80.0, 95.0),
            swap: Band::new(60.0, 80.0),
            cpu: Band::new(80.0, 95.0),
            iowait: Band::new(20.0, 40.0),
            load_ratio: Band::new(1.0, 1.5),
            disk: Band::new(85.0, 95.0),
            inodes: Band::new(85.0, 95.0),
            established: Band::new(500.0, 1000.0),
            timewait: Band::new(1000.0, 5000.0),
            synrecv: Band::new(5.0, 20.0),
            process_cpu: Band::new(50.0, 80.0),
            process_mem: Band::new(30.0, 50.0),
            failed_logins: Band::new(5.0, 20.0),
            zombies: Band::new(3.0, 10.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prefers_critical() {
        let band = Band::new(5.0, 20.0);
        assert_eq!(band.classify(25.0), Some(Severity::Critical));
        assert_eq!(band.classify(20.0), Some(Severity::Critical));
        assert_eq!(band.classify(19.0), Some(Severity::Warning));
        assert_eq!(band.classify(4.0), None);
    }

    #[test]
    fn bound_picks_matching_tier() {
        let band = Band::new(80.0, 95.0);
        assert_eq!(band.bound(Severity::Critical), 95.0);
        assert_eq!(band.bound(Severity::Warning), 80.0);
    }
}
