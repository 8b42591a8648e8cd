//! Edge-triggered hover tracking.

use crate::region::{hit_test, HitRegion, TargetId};
use crate::{RawInput, Vec2, OFFSCREEN};
use serde::{Deserialize, Serialize};

/// Latest pointer position. Overwritten in place, no history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub pos: Vec2,
}

impl PointerSample {
    pub fn at(pos: Vec2) -> Self {
        Self { pos }
    }
}

impl Default for PointerSample {
    fn default() -> Self {
        Self::at(OFFSCREEN)
    }
}

/// Where the tracker takes its hover target from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum HoverMode {
    /// Hit-test the latest pointer sample.
    #[default]
    Pointer,
    /// Use the control reported by switch hardware.
    Discrete(Option<TargetId>),
}

/// Hover target changed between two polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverChange {
    pub previous: Option<TargetId>,
    pub current: Option<TargetId>,
}

/// Maps pointer samples to at most one active target per poll.
///
/// Call [`handle`](HoverTracker::handle) for every raw event and
/// [`poll`](HoverTracker::poll) once per frame with the regions rendered for
/// that frame. The tracker never caches regions.
#[derive(Debug, Default)]
pub struct HoverTracker {
    /// Latest pointer sample.
    sample: PointerSample,
    /// Pointer or discrete mode.
    mode: HoverMode,
    /// Result of the previous poll.
    active: Option<TargetId>,
    /// Number of polls evaluated.
    polls: u64,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw input event.
    pub fn handle(&mut self, input: &RawInput) {
        match input {
            RawInput::PointerMoved { pos } | RawInput::PointerClicked { pos } => {
                self.sample.pos = *pos;
                self.mode = HoverMode::Pointer;
            }
            RawInput::PointerLeft => {
                self.sample = PointerSample::default();
                self.mode = HoverMode::Pointer;
            }
            RawInput::ActiveControl { target } => self.set_active_control(target.clone()),
        }
    }

    /// Enter discrete mode with `target` as the active control.
    pub fn set_active_control(&mut self, target: Option<TargetId>) {
        self.mode = HoverMode::Discrete(target);
    }

    /// Resolve the target for this poll without changing tracker state.
    pub fn resolve(&self, regions: &[HitRegion]) -> Option<TargetId> {
        match &self.mode {
            HoverMode::Pointer => hit_test(&self.sample, regions),
            HoverMode::Discrete(target) => target
                .as_ref()
                .filter(|t| regions.iter().any(|r| &r.id == *t))
                .cloned(),
        }
    }

    /// Evaluate one poll. Returns a change only on an edge.
    pub fn poll(&mut self, regions: &[HitRegion]) -> Option<HoverChange> {
        self.polls += 1;
        let current = self.resolve(regions);
        if current == self.active {
            return None;
        }

        tracing::trace!(
            previous = ?self.active,
            current = ?current,
            "hover target changed"
        );
        let previous = std::mem::replace(&mut self.active, current.clone());
        Some(HoverChange { previous, current })
    }

    /// Forget the previous result.
    ///
    /// The next poll reports whatever is under the pointer as a fresh edge,
    /// even when it is the target that was active before.
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Target resolved by the last poll.
    pub fn active(&self) -> Option<&TargetId> {
        self.active.as_ref()
    }

    pub fn sample(&self) -> PointerSample {
        self.sample
    }

    pub fn mode(&self) -> &HoverMode {
        &self.mode
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;

    fn grid() -> Vec<HitRegion> {
        vec![
            HitRegion::backspace(Rect::new(200.0, 0.0, 50.0, 50.0)),
            HitRegion::key("i", Rect::new(0.0, 0.0, 100.0, 100.0)),
            HitRegion::key("like", Rect::new(100.0, 0.0, 100.0, 100.0)),
        ]
    }

    #[test]
    fn edge_triggered() {
        let regions = grid();
        let mut tracker = HoverTracker::new();

        assert!(tracker.poll(&regions).is_none());

        tracker.handle(&RawInput::pointer_moved(10.0, 10.0));
        let change = tracker.poll(&regions).unwrap();
        assert_eq!(change.previous, None);
        assert_eq!(change.current, Some(TargetId::key("i")));

        // Jitter inside the same key is not an edge.
        tracker.handle(&RawInput::pointer_moved(40.0, 60.0));
        assert!(tracker.poll(&regions).is_none());

        tracker.handle(&RawInput::pointer_moved(150.0, 10.0));
        let change = tracker.poll(&regions).unwrap();
        assert_eq!(change.previous, Some(TargetId::key("i")));
        assert_eq!(change.current, Some(TargetId::key("like")));

        tracker.handle(&RawInput::PointerLeft);
        let change = tracker.poll(&regions).unwrap();
        assert_eq!(change.current, None);
        assert_eq!(tracker.polls(), 5);
    }

    #[test]
    fn reset_reemits_same_target() {
        let regions = grid();
        let mut tracker = HoverTracker::new();
        tracker.handle(&RawInput::pointer_moved(10.0, 10.0));
        assert!(tracker.poll(&regions).is_some());

        tracker.reset();
        let change = tracker.poll(&regions).unwrap();
        assert_eq!(change.previous, None);
        assert_eq!(change.current, Some(TargetId::key("i")));
    }

    #[test]
    fn regions_are_not_cached() {
        let mut tracker = HoverTracker::new();
        tracker.handle(&RawInput::pointer_moved(10.0, 10.0));
        tracker.poll(&grid());

        // Layout changed under a still pointer: new key id at same spot.
        let next = vec![HitRegion::key("would", Rect::new(0.0, 0.0, 100.0, 100.0))];
        let change = tracker.poll(&next).unwrap();
        assert_eq!(change.current, Some(TargetId::key("would")));
    }

    #[test]
    fn discrete_mode_follows_switch() {
        let regions = grid();
        let mut tracker = HoverTracker::new();

        tracker.handle(&RawInput::active_control(Some(TargetId::Backspace)));
        let change = tracker.poll(&regions).unwrap();
        assert_eq!(change.current, Some(TargetId::Backspace));

        // A control that is not rendered resolves to none.
        tracker.handle(&RawInput::active_control(Some(TargetId::Speaker)));
        let change = tracker.poll(&regions).unwrap();
        assert_eq!(change.current, None);

        // Pointer movement switches back to hit testing.
        tracker.handle(&RawInput::pointer_moved(150.0, 50.0));
        assert_eq!(tracker.mode(), &HoverMode::Pointer);
        let change = tracker.poll(&regions).unwrap();
        assert_eq!(change.current, Some(TargetId::key("like")));
    }
}
