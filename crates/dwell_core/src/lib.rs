//! Dwell selection engine.
//!
//! A dwell is a sustained hover over one control. When the hover lasts for
//! the control's configured duration without interruption, the controller
//! commits that control exactly once.
//!
//! # Time
//!
//! The controller never reads a clock. Every call takes `now_ms`, a
//! monotonic millisecond timestamp supplied by the host, and a "timer" is
//! just a deadline checked by [`DwellController::tick`]. Cancellation is
//! therefore synchronous: once a retarget has been processed, no stale
//! deadline exists that could fire later.
//!
//! # Example
//!
//! ```
//! use dwell_core::{DwellController, DwellEvent};
//! use dwell_input::TargetId;
//!
//! let mut dwell = DwellController::new();
//! dwell.retarget(Some(TargetId::key("i")), 3000, 0);
//!
//! assert!(dwell.tick(2999).is_none());
//! assert!(matches!(dwell.tick(3000), Some(DwellEvent::Committed { .. })));
//! assert!(dwell.tick(6000).is_none()); // no auto-repeat
//! ```

mod controller;
mod effect;
mod fault;
mod log;
mod timings;

pub use controller::{DwellAffordance, DwellController, DwellEvent, DwellPhase, DwellStats, DwellTimer};
pub use effect::EffectSet;
pub use fault::Fault;
pub use log::{DwellLog, TimestampedEvent};
pub use timings::{check_duration, DwellTimings};

/// Default dwell for ordinary keys (milliseconds).
pub const DEFAULT_KEY_DWELL_MS: u64 = 3000;

/// Default dwell for backspace and speaker (milliseconds).
pub const DEFAULT_CONTROL_DWELL_MS: u64 = 2000;

/// Longest dwell accepted by configuration validation (milliseconds).
pub const MAX_DWELL_MS: u64 = 60_000;
