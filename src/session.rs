//! The keyboard session: one engine for every keyboard variant.
//!
//! # Architecture
//!
//! ```text
//!   RawInput ──► HoverTracker ──edge──► DwellController ──commit──┐
//!                     ▲                                            │
//!                     │ regions (fresh per frame)                  ▼
//!   host ◄── Outcome ◄┴──────────── SelectionDispatcher ◄── backspace / speaker
//!                                          │
//!                                          ▼
//!                              SentenceBuffer + Layout
//! ```
//!
//! The session is synchronous and never reads a clock: every entry point
//! takes `now_ms`. Output (speech, sound, suggestion fetches, host signals)
//! is returned as [`SideEffect`] requests for the driver to perform.

use crate::config::KeyboardConfig;
use crate::dispatcher::{KeyboardState, Outcome, SelectionDispatcher};
use crate::error::SuggestResult;
use crate::services::SoundGate;
use crate::suggest::normalize;
use dwell_core::{DwellAffordance, DwellController, DwellEvent, DwellLog, DwellTimings, EffectSet};
use dwell_input::{HitRegion, HoverTracker, PointerSample, RawInput, TargetId};
use dwell_layout::{KeyType, Layout, LayoutCatalog, SentenceBuffer};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A running keyboard.
pub struct KeyboardSession {
    id: Uuid,
    timings: DwellTimings,
    type_dwell: BTreeMap<KeyType, u64>,
    max_suggestions: usize,
    tracker: HoverTracker,
    dwell: DwellController,
    dispatcher: SelectionDispatcher,
    state: KeyboardState,
    sound: SoundGate,
    log: DwellLog,
    ended: bool,
}

impl KeyboardSession {
    /// Create a session. Suggestions are off until
    /// [`with_suggestions`](Self::with_suggestions) enables them.
    pub fn new(config: &KeyboardConfig, catalog: LayoutCatalog) -> Self {
        let state = KeyboardState::new(&catalog);
        let id = Uuid::new_v4();
        tracing::info!(session = %id, variant = ?config.variant, "keyboard session started");
        Self {
            id,
            timings: config.effective_timings(),
            type_dwell: config.type_dwell_ms.clone(),
            max_suggestions: config.suggestions.max,
            tracker: HoverTracker::new(),
            dwell: DwellController::new(),
            dispatcher: SelectionDispatcher::new(catalog),
            state,
            sound: SoundGate::new(&config.sound),
            log: DwellLog::new(),
            ended: false,
        }
    }

    /// Defer layout derivation to a suggestion source.
    pub fn with_suggestions(mut self, enabled: bool) -> Self {
        self.dispatcher = self.dispatcher.with_suggestions(enabled);
        self
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Feed a raw input event. The first click unlocks hover sounds.
    pub fn handle_input(&mut self, input: &RawInput) {
        if self.ended {
            return;
        }
        if input.is_unlock_gesture() && self.sound.unlock() {
            tracing::debug!(session = %self.id, "hover sound unlocked");
        }
        self.tracker.handle(input);
    }

    /// One poll: hover edge, dwell transition, then timer check.
    ///
    /// `regions` must be the regions of the layout currently shown.
    pub fn frame(&mut self, now_ms: u64, regions: &[HitRegion]) -> Outcome {
        if self.ended {
            return Outcome::none();
        }

        let mut out = Outcome::none();
        if let Some(change) = self.tracker.poll(regions) {
            let duration = change
                .current
                .as_ref()
                .map(|t| self.duration_for(t))
                .unwrap_or_default();
            let events = self.dwell.retarget(change.current.clone(), duration, now_ms);
            for event in &events {
                match event {
                    DwellEvent::Armed { .. } => {
                        out.flag(EffectSet::DWELL_ARMED);
                        if self.sound.is_open() {
                            out.play_hover_sound();
                        }
                    }
                    DwellEvent::Cancelled { .. } => out.flag(EffectSet::DWELL_CANCELLED),
                    DwellEvent::Committed { .. } => {}
                }
            }
            self.log.extend(now_ms, events);
            if change.current.is_none() {
                out.flag(EffectSet::HOVER_CLEARED);
            }
        }

        out.merge(self.fire_due(now_ms));
        out
    }

    /// Commit a due dwell without polling (host timer path).
    pub fn fire_due(&mut self, now_ms: u64) -> Outcome {
        if self.ended {
            return Outcome::none();
        }
        let Some(event) = self.dwell.tick(now_ms) else {
            return Outcome::none();
        };

        let target = event.target().clone();
        self.log.record(now_ms, event);
        // The still-hovered target needs a fresh edge and a full new dwell.
        self.tracker.reset();
        self.commit(&target)
    }

    fn commit(&mut self, target: &TargetId) -> Outcome {
        match target {
            TargetId::Backspace => self.backspace(),
            TargetId::Speaker => self.speak_sentence(),
            TargetId::Key(id) => match self.dispatcher.dispatch(&mut self.state, id) {
                Ok(out) => out,
                Err(fault) => {
                    tracing::debug!(session = %self.id, %fault, "commit ignored");
                    Outcome::none()
                }
            },
        }
    }

    fn backspace(&mut self) -> Outcome {
        let mut out = Outcome::none();
        out.flag(EffectSet::COMMITTED);
        out.speak("backspace");
        let Some(removed) = self.state.buffer.delete_last() else {
            return out;
        };
        tracing::info!(session = %self.id, %removed, "backspace");
        out.flag(EffectSet::BUFFER_CHANGED);
        self.state.touch();
        self.dispatcher.apply_rules(&mut self.state, &mut out);
        out
    }

    fn speak_sentence(&mut self) -> Outcome {
        let mut out = Outcome::none();
        out.flag(EffectSet::COMMITTED);
        if !self.state.buffer.is_empty() {
            out.speak(self.state.buffer.text());
        }
        out
    }

    // =========================================================================
    // SUGGESTIONS
    // =========================================================================

    /// Apply a suggestion result for the request with `ticket`.
    ///
    /// Results for a superseded epoch are dropped. A non-empty result shows
    /// the suggestion layout; an empty or failed one falls back to
    /// rule-based derivation.
    pub fn apply_suggestions(&mut self, ticket: u64, result: SuggestResult<Vec<String>>) -> Outcome {
        if self.ended || ticket != self.state.epoch() {
            tracing::debug!(session = %self.id, ticket, current = self.state.epoch(), "stale suggestions dropped");
            return Outcome::none();
        }

        let mut out = Outcome::none();
        let suggestions = match result {
            Ok(raw) => normalize(raw, self.max_suggestions),
            Err(err) => {
                tracing::warn!(session = %self.id, error = %err, "suggestion request failed");
                Vec::new()
            }
        };

        if suggestions.is_empty() {
            self.dispatcher.apply_rules(&mut self.state, &mut out);
        } else {
            self.dispatcher
                .apply_suggestion_layout(&mut self.state, &suggestions, &mut out);
        }
        out
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Tear down: cancel the dwell timer and reset sentence and layout.
    pub fn end(&mut self, now_ms: u64) -> Outcome {
        let mut out = Outcome::none();
        if self.ended {
            return out;
        }
        if let Some(event) = self.dwell.cancel(now_ms) {
            self.log.record(now_ms, event);
            out.flag(EffectSet::DWELL_CANCELLED);
        }
        self.tracker.reset();
        out.flag(self.state.reset(self.dispatcher.catalog()));
        out.flag(EffectSet::SESSION_ENDED);
        self.ended = true;
        tracing::info!(session = %self.id, stats = ?self.dwell.stats(), "keyboard session ended");
        out
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sentence(&self) -> String {
        self.state.buffer.text()
    }

    pub fn buffer(&self) -> &SentenceBuffer {
        &self.state.buffer
    }

    pub fn layout(&self) -> &Layout {
        &self.state.layout
    }

    pub fn hovered(&self) -> Option<&TargetId> {
        self.tracker.active()
    }

    /// Latest pointer sample.
    pub fn pointer(&self) -> PointerSample {
        self.tracker.sample()
    }

    pub fn affordance(&self, now_ms: u64) -> DwellAffordance {
        self.dwell.affordance(now_ms)
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.dwell.next_deadline()
    }

    pub fn epoch(&self) -> u64 {
        self.state.epoch()
    }

    pub fn log(&self) -> &DwellLog {
        &self.log
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn suggestions_enabled(&self) -> bool {
        self.dispatcher.suggestions_enabled()
    }

    fn duration_for(&self, target: &TargetId) -> u64 {
        let key_override = target
            .as_key()
            .and_then(|id| self.state.layout.key(id))
            .and_then(|k| k.dwell_ms.or_else(|| self.type_dwell.get(&k.key_type).copied()));
        self.timings.duration_for(target, key_override)
    }
}
