//! Faults raised by the dwell engine.

use dwell_input::{RegionClass, TargetId};
use thiserror::Error;

/// Dwell fault.
///
/// Timing faults are raised while validating configuration. Commit faults
/// are raised when a selection cannot be applied; the session logs them and
/// carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// A dwell duration of zero would commit on the first frame.
    #[error("Dwell duration for {class:?} must be positive")]
    ZeroDuration { class: RegionClass },

    /// Dwell duration beyond the accepted maximum.
    #[error("Dwell duration {ms}ms exceeds maximum {max}ms")]
    DurationTooLong { ms: u64, max: u64 },

    /// Committed key is not part of the visible layout.
    #[error("Key {0} is not in the current layout")]
    UnknownKey(TargetId),

    /// Input arrived after the session ended.
    #[error("Session has ended")]
    SessionEnded,
}

impl Fault {
    /// Check if the session can continue after this fault.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Fault::UnknownKey(_))
    }

    /// Check if this fault indicates a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Fault::ZeroDuration { .. } | Fault::DurationTooLong { .. })
    }
}
