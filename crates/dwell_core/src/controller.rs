//! The dwell timer state machine.

use dwell_input::TargetId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The single live dwell timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DwellTimer {
    /// Control being dwelled on.
    pub target: TargetId,
    /// When the hover began.
    pub started_at_ms: u64,
    /// How long the hover must last.
    pub duration_ms: u64,
}

impl DwellTimer {
    pub fn deadline_ms(&self) -> u64 {
        self.started_at_ms.saturating_add(self.duration_ms)
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.deadline_ms()
    }
}

/// Controller state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DwellPhase {
    /// Nothing hovered, no timer.
    #[default]
    Idle,
    /// A timer is armed for a hovered control.
    Dwelling(DwellTimer),
}

/// Transition emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DwellEvent {
    /// A fresh timer was armed (hover began).
    Armed { target: TargetId, duration_ms: u64 },
    /// The timer was destroyed before its deadline.
    Cancelled { target: TargetId, elapsed_ms: u64 },
    /// The dwell completed; the target is selected.
    Committed { target: TargetId, elapsed_ms: u64 },
}

impl DwellEvent {
    pub fn target(&self) -> &TargetId {
        match self {
            DwellEvent::Armed { target, .. }
            | DwellEvent::Cancelled { target, .. }
            | DwellEvent::Committed { target, .. } => target,
        }
    }
}

/// Lifetime counters for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DwellStats {
    pub armed: u64,
    pub cancelled: u64,
    pub committed: u64,
}

/// Visual progress of the current dwell.
///
/// The presentation layer reads this every frame to draw the cursor fill;
/// it replaces any global styling side channel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DwellAffordance {
    pub target: Option<TargetId>,
    pub elapsed_ms: u64,
    pub duration_ms: u64,
    /// Progress in `0.0..=1.0`.
    pub fraction: f32,
}

/// Owns the single dwell timer.
///
/// State machine:
///
/// ```text
///            hover T                      deadline reached
///   Idle ─────────────► Dwelling(T) ───────────────────────► Idle  (Committed)
///    ▲                    │      │
///    │   hover none       │      │ hover T2 ≠ T
///    └────────────────────┘      └──► Dwelling(T2)  (Cancelled + Armed)
/// ```
#[derive(Debug, Default)]
pub struct DwellController {
    phase: DwellPhase,
    stats: DwellStats,
}

impl DwellController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DwellPhase {
        &self.phase
    }

    pub fn stats(&self) -> DwellStats {
        self.stats
    }

    /// Target of the live timer, if any.
    pub fn target(&self) -> Option<&TargetId> {
        match &self.phase {
            DwellPhase::Idle => None,
            DwellPhase::Dwelling(timer) => Some(&timer.target),
        }
    }

    pub fn is_dwelling(&self) -> bool {
        matches!(self.phase, DwellPhase::Dwelling(_))
    }

    /// Deadline of the live timer, for hosts that sleep until it.
    pub fn next_deadline(&self) -> Option<u64> {
        match &self.phase {
            DwellPhase::Idle => None,
            DwellPhase::Dwelling(timer) => Some(timer.deadline_ms()),
        }
    }

    /// Apply a hover change.
    ///
    /// Any live timer for a different target is cancelled before a new one
    /// is armed. `duration_ms` is only read when `next` is a target.
    /// Re-announcing the target that is already dwelling keeps its timer.
    pub fn retarget(
        &mut self,
        next: Option<TargetId>,
        duration_ms: u64,
        now_ms: u64,
    ) -> SmallVec<[DwellEvent; 2]> {
        let mut events = SmallVec::new();

        if let (DwellPhase::Dwelling(timer), Some(next)) = (&self.phase, &next) {
            if &timer.target == next {
                return events;
            }
        }

        if let Some(cancelled) = self.cancel(now_ms) {
            events.push(cancelled);
        }

        if let Some(target) = next {
            tracing::debug!(%target, duration_ms, now_ms, "dwell armed");
            self.stats.armed += 1;
            self.phase = DwellPhase::Dwelling(DwellTimer {
                target: target.clone(),
                started_at_ms: now_ms,
                duration_ms,
            });
            events.push(DwellEvent::Armed {
                target,
                duration_ms,
            });
        }

        events
    }

    /// Commit the live timer if its deadline has passed.
    ///
    /// Returns `Committed` at most once per armed timer; the controller is
    /// `Idle` afterwards, so a still-hovered target needs a fresh hover edge
    /// and a full second dwell before it can commit again.
    pub fn tick(&mut self, now_ms: u64) -> Option<DwellEvent> {
        let due = matches!(&self.phase, DwellPhase::Dwelling(timer) if timer.is_due(now_ms));
        if !due {
            return None;
        }

        match std::mem::take(&mut self.phase) {
            DwellPhase::Dwelling(timer) => {
                let elapsed_ms = timer.elapsed_ms(now_ms);
                tracing::debug!(target = %timer.target, elapsed_ms, "dwell committed");
                self.stats.committed += 1;
                Some(DwellEvent::Committed {
                    target: timer.target,
                    elapsed_ms,
                })
            }
            DwellPhase::Idle => None,
        }
    }

    /// Destroy the live timer, if any.
    ///
    /// Used on retarget and on teardown; after this returns nothing can
    /// commit until a new hover is reported.
    pub fn cancel(&mut self, now_ms: u64) -> Option<DwellEvent> {
        match std::mem::take(&mut self.phase) {
            DwellPhase::Idle => None,
            DwellPhase::Dwelling(timer) => {
                let elapsed_ms = timer.elapsed_ms(now_ms);
                tracing::debug!(target = %timer.target, elapsed_ms, "dwell cancelled");
                self.stats.cancelled += 1;
                Some(DwellEvent::Cancelled {
                    target: timer.target,
                    elapsed_ms,
                })
            }
        }
    }

    /// Visual progress at `now_ms`.
    pub fn affordance(&self, now_ms: u64) -> DwellAffordance {
        match &self.phase {
            DwellPhase::Idle => DwellAffordance::default(),
            DwellPhase::Dwelling(timer) => {
                let elapsed_ms = timer.elapsed_ms(now_ms).min(timer.duration_ms);
                let fraction = if timer.duration_ms == 0 {
                    1.0
                } else {
                    elapsed_ms as f32 / timer.duration_ms as f32
                };
                DwellAffordance {
                    target: Some(timer.target.clone()),
                    elapsed_ms,
                    duration_ms: timer.duration_ms,
                    fraction,
                }
            }
        }
    }
}
