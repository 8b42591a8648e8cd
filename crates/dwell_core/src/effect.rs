//! Effect flags reported by one step of the selection pipeline.
//!
//! Every entry point of the session (input, frame, timer, suggestion
//! result) returns an `EffectSet` describing what changed, so the host
//! knows what to redraw without diffing state.

use bitflags::bitflags;

bitflags! {
    /// Set of effects produced by one session step.
    ///
    /// # Example
    ///
    /// ```
    /// use dwell_core::EffectSet;
    ///
    /// let effects = EffectSet::COMMITTED | EffectSet::BUFFER_CHANGED;
    /// assert!(effects.needs_redraw());
    /// assert!(!effects.session_ended());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EffectSet: u16 {
        /// No effects.
        const NONE = 0;

        // =====================================================================
        // HOVER / DWELL
        // =====================================================================

        /// A new dwell timer was armed; the hover affordance restarts.
        const DWELL_ARMED = 1 << 0;

        /// A live dwell timer was cancelled.
        const DWELL_CANCELLED = 1 << 1;

        /// Pointer left every region.
        const HOVER_CLEARED = 1 << 2;

        /// A dwell completed and its target was selected.
        const COMMITTED = 1 << 3;

        // =====================================================================
        // SENTENCE / LAYOUT
        // =====================================================================

        /// Sentence buffer changed.
        const BUFFER_CHANGED = 1 << 4;

        /// Visible layout changed.
        const LAYOUT_CHANGED = 1 << 5;

        /// A suggestion request is outstanding for the current buffer.
        const DERIVE_PENDING = 1 << 6;

        // =====================================================================
        // OUTPUT
        // =====================================================================

        /// Speech was requested.
        const SPEECH_REQUESTED = 1 << 7;

        /// A hover sound was requested.
        const SOUND_REQUESTED = 1 << 8;

        // =====================================================================
        // HOST
        // =====================================================================

        /// The session ended; the host should tear the keyboard down.
        const SESSION_ENDED = 1 << 9;

        /// The host was asked to switch input modality.
        const MODALITY_SWITCH = 1 << 10;
    }
}

impl Default for EffectSet {
    fn default() -> Self {
        EffectSet::NONE
    }
}

impl EffectSet {
    /// Check if any dwell-affordance effects are set.
    pub fn has_dwell_effects(&self) -> bool {
        self.intersects(EffectSet::DWELL_ARMED | EffectSet::DWELL_CANCELLED | EffectSet::HOVER_CLEARED)
    }

    /// Check if the keyboard surface needs a redraw.
    pub fn needs_redraw(&self) -> bool {
        self.intersects(EffectSet::BUFFER_CHANGED | EffectSet::LAYOUT_CHANGED)
    }

    /// Check if the host should stop driving the session.
    pub fn session_ended(&self) -> bool {
        self.contains(EffectSet::SESSION_ENDED)
    }

    /// Check if the step produced audible output.
    pub fn is_audible(&self) -> bool {
        self.intersects(EffectSet::SPEECH_REQUESTED | EffectSet::SOUND_REQUESTED)
    }
}
