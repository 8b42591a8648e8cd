//! Pointer and switch input for dwell selection.
//!
//! This crate turns a continuous pointer stream (mouse, gaze tracker,
//! head tracker) or a discrete "active control" signal from switch hardware
//! into edge-triggered hover changes over a set of rectangular hit regions.
//!
//! 1. **Cadence independent** - `hit_test` is a pure function of the latest
//!    sample and the regions rendered right now
//! 2. **Edge triggered** - `HoverTracker` reports a change only when the
//!    resolved target differs from the previous poll
//! 3. **Read only** - nothing in here touches sentence or layout state
//!
//! # Architecture
//!
//! ```text
//! Mouse / gaze ─┐
//!               ├──► RawInput ──► HoverTracker ──► HoverChange
//! Switch       ─┘                     ▲
//!                                     │
//!                           &[HitRegion] (per poll)
//! ```
//!
//! # Example
//!
//! ```
//! use dwell_input::{HitRegion, HoverTracker, RawInput, Rect, TargetId};
//!
//! let regions = vec![HitRegion::key("i", Rect::new(0.0, 0.0, 100.0, 100.0))];
//! let mut tracker = HoverTracker::new();
//!
//! tracker.handle(&RawInput::pointer_moved(50.0, 50.0));
//! let change = tracker.poll(&regions).expect("entered key");
//! assert_eq!(change.current, Some(TargetId::key("i")));
//!
//! // Same target on the next poll: no edge.
//! assert!(tracker.poll(&regions).is_none());
//! ```

mod geometry;
mod hover;
mod raw;
mod region;

pub use geometry::{Rect, Vec2};
pub use hover::{HoverChange, HoverMode, HoverTracker, PointerSample};
pub use raw::RawInput;
pub use region::{hit_test, HitRegion, RegionClass, TargetId};

/// Region id reported for the backspace control.
pub const BACKSPACE_ID: &str = "backspace-btn";

/// Region id reported for the speaker (speak sentence) control.
pub const SPEAKER_ID: &str = "speaker-btn";

/// Initial pointer position before any move event arrives.
///
/// Far outside any viewport so the first poll resolves to no target.
pub const OFFSCREEN: Vec2 = Vec2 {
    x: -1000.0,
    y: -1000.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offscreen_hits_nothing() {
        let regions = vec![
            HitRegion::backspace(Rect::new(0.0, 0.0, 50.0, 50.0)),
            HitRegion::key("i", Rect::new(0.0, 60.0, 50.0, 50.0)),
        ];
        let sample = PointerSample::at(OFFSCREEN);
        assert_eq!(hit_test(&sample, &regions), None);
    }

    #[test]
    fn control_ids_are_distinct() {
        assert_ne!(BACKSPACE_ID, SPEAKER_ID);
    }
}
