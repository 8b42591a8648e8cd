//! Dwell event log.
//!
//! `DwellLog` records every controller transition with its timestamp. The
//! simulator prints it after a replay, and tests use it to assert on the
//! exact commit sequence of a scripted session.

use crate::DwellEvent;
use dwell_input::TargetId;
use serde::{Deserialize, Serialize};

/// A dwell event with the time it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampedEvent {
    /// Host clock in milliseconds.
    pub at_ms: u64,

    /// The transition.
    pub event: DwellEvent,
}

impl TimestampedEvent {
    pub fn new(at_ms: u64, event: DwellEvent) -> Self {
        Self { at_ms, event }
    }

    /// One-line rendering: `<ms> <kind> <target>`.
    pub fn to_line(&self) -> String {
        let (kind, target) = match &self.event {
            DwellEvent::Armed { target, .. } => ("armed", target),
            DwellEvent::Cancelled { target, .. } => ("cancelled", target),
            DwellEvent::Committed { target, .. } => ("committed", target),
        };
        format!("{:>8} {:<9} {}", self.at_ms, kind, target)
    }
}

/// Log of dwell transitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DwellLog {
    /// Recorded events, oldest first.
    pub events: Vec<TimestampedEvent>,
}

impl DwellLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transition.
    pub fn record(&mut self, at_ms: u64, event: DwellEvent) {
        self.events.push(TimestampedEvent::new(at_ms, event));
    }

    /// Record every transition of a batch.
    pub fn extend(&mut self, at_ms: u64, events: impl IntoIterator<Item = DwellEvent>) {
        for event in events {
            self.record(at_ms, event);
        }
    }

    /// Committed targets in order.
    pub fn commits(&self) -> Vec<&TargetId> {
        self.events
            .iter()
            .filter_map(|e| match &e.event {
                DwellEvent::Committed { target, .. } => Some(target),
                _ => None,
            })
            .collect()
    }

    /// Events recorded up to and including `at_ms`.
    pub fn until(&self, at_ms: u64) -> &[TimestampedEvent] {
        let end = self.events.partition_point(|e| e.at_ms <= at_ms);
        &self.events[..end]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Events as printable lines.
    pub fn to_lines(&self) -> Vec<String> {
        self.events.iter().map(TimestampedEvent::to_line).collect()
    }
}
