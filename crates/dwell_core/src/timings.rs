//! Per-control dwell durations.

use crate::{Fault, DEFAULT_CONTROL_DWELL_MS, DEFAULT_KEY_DWELL_MS, MAX_DWELL_MS};
use dwell_input::{RegionClass, TargetId};
use serde::{Deserialize, Serialize};

/// Dwell durations by control class.
///
/// Keys may carry their own override (see `KeySpec::dwell_ms` in the layout
/// crate); backspace and speaker always use `control_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DwellTimings {
    /// Dwell for ordinary keys.
    #[serde(default = "default_key_ms")]
    pub key_ms: u64,

    /// Dwell for backspace and speaker.
    #[serde(default = "default_control_ms")]
    pub control_ms: u64,
}

fn default_key_ms() -> u64 {
    DEFAULT_KEY_DWELL_MS
}

fn default_control_ms() -> u64 {
    DEFAULT_CONTROL_DWELL_MS
}

impl Default for DwellTimings {
    fn default() -> Self {
        Self {
            key_ms: DEFAULT_KEY_DWELL_MS,
            control_ms: DEFAULT_CONTROL_DWELL_MS,
        }
    }
}

impl DwellTimings {
    pub fn new(key_ms: u64, control_ms: u64) -> Self {
        Self { key_ms, control_ms }
    }

    /// Duration for `target`, honouring a per-key override.
    pub fn duration_for(&self, target: &TargetId, key_override: Option<u64>) -> u64 {
        match target.class() {
            RegionClass::Backspace | RegionClass::Speaker => self.control_ms,
            RegionClass::Key => key_override.unwrap_or(self.key_ms),
        }
    }

    /// Reject durations that are zero or unreasonably long.
    pub fn validate(&self) -> Result<(), Fault> {
        check_duration(RegionClass::Key, self.key_ms)?;
        check_duration(RegionClass::Backspace, self.control_ms)?;
        Ok(())
    }
}

/// Validate a single duration (also used for per-key overrides).
pub fn check_duration(class: RegionClass, ms: u64) -> Result<(), Fault> {
    if ms == 0 {
        return Err(Fault::ZeroDuration { class });
    }
    if ms > MAX_DWELL_MS {
        return Err(Fault::DurationTooLong {
            ms,
            max: MAX_DWELL_MS,
        });
    }
    Ok(())
}
