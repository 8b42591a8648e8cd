//! Key selection dispatch.
//!
//! Turns a committed key id into buffer and layout mutations plus output
//! requests. Backspace and speaker never reach the dispatcher; the session
//! handles them directly.
//!
//! # Routing
//!
//! | Key                              | Buffer  | Layout          | Output                |
//! |----------------------------------|---------|-----------------|-----------------------|
//! | `clear`                          | emptied | `default`       | speak "clear"         |
//! | `home`                           | -       | `default`       | speak "home"          |
//! | `exit`                           | -       | -               | speak, end signal     |
//! | `vocab`                          | -       | `vocab`         | speak "vocab"         |
//! | action with a modality           | -       | -               | speak, switch signal  |
//! | category naming a layout         | -       | that layout     | speak label           |
//! | anything else                    | append  | re-derived      | speak label           |

use crate::services::HostSignal;
use crate::suggest::DeriveRequest;
use dwell_core::{EffectSet, Fault};
use dwell_input::TargetId;
use dwell_layout::{ids, keys, KeySpec, KeyType, Layout, LayoutCatalog, SentenceBuffer};
use serde::{Deserialize, Serialize};

/// Output requested by one session step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEffect {
    Speak(String),
    PlayHoverSound,
    Derive(DeriveRequest),
    Signal(HostSignal),
}

/// Effects and output requests of one session step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub effects: EffectSet,
    pub requests: Vec<SideEffect>,
}

impl Outcome {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn flag(&mut self, effects: EffectSet) {
        self.effects |= effects;
    }

    pub fn speak(&mut self, text: impl Into<String>) {
        self.effects |= EffectSet::SPEECH_REQUESTED;
        self.requests.push(SideEffect::Speak(text.into()));
    }

    pub fn signal(&mut self, signal: HostSignal) {
        self.effects |= match signal {
            HostSignal::SessionEnd => EffectSet::SESSION_ENDED,
            HostSignal::SwitchModality(_) => EffectSet::MODALITY_SWITCH,
        };
        self.requests.push(SideEffect::Signal(signal));
    }

    pub fn play_hover_sound(&mut self) {
        self.effects |= EffectSet::SOUND_REQUESTED;
        self.requests.push(SideEffect::PlayHoverSound);
    }

    pub fn derive(&mut self, request: DeriveRequest) {
        self.effects |= EffectSet::DERIVE_PENDING;
        self.requests.push(SideEffect::Derive(request));
    }

    /// Fold another outcome into this one, keeping request order.
    pub fn merge(&mut self, other: Outcome) {
        self.effects |= other.effects;
        self.requests.extend(other.requests);
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.requests.is_empty()
    }

    /// Texts spoken, in order.
    pub fn spoken(&self) -> impl Iterator<Item = &str> {
        self.requests.iter().filter_map(|r| match r {
            SideEffect::Speak(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn signals(&self) -> impl Iterator<Item = HostSignal> + '_ {
        self.requests.iter().filter_map(|r| match r {
            SideEffect::Signal(signal) => Some(*signal),
            _ => None,
        })
    }

    /// Suggestion fetches the driver must start.
    pub fn derive_requests(&self) -> impl Iterator<Item = &DeriveRequest> {
        self.requests.iter().filter_map(|r| match r {
            SideEffect::Derive(request) => Some(request),
            _ => None,
        })
    }
}

/// Sentence, visible layout and derivation epoch.
///
/// The epoch identifies the sentence/navigation state a suggestion request
/// was made for. It is bumped on every buffer mutation and every explicit
/// navigation, which makes any in-flight request stale.
#[derive(Debug, Clone)]
pub struct KeyboardState {
    pub buffer: SentenceBuffer,
    pub layout: Layout,
    epoch: u64,
}

impl KeyboardState {
    pub fn new(catalog: &LayoutCatalog) -> Self {
        Self {
            buffer: SentenceBuffer::new(),
            layout: catalog.default_layout().clone(),
            epoch: 0,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Invalidate in-flight derivations and return the new epoch.
    pub fn touch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Show `layout`. Returns `LAYOUT_CHANGED` when the id differs or the
    /// keys changed.
    pub fn show(&mut self, layout: Layout) -> EffectSet {
        if self.layout == layout {
            return EffectSet::NONE;
        }
        tracing::debug!(from = %self.layout.id, to = %layout.id, "layout changed");
        self.layout = layout;
        EffectSet::LAYOUT_CHANGED
    }

    /// Reset to an empty sentence and the default layout.
    pub fn reset(&mut self, catalog: &LayoutCatalog) -> EffectSet {
        let mut effects = EffectSet::NONE;
        if !self.buffer.tokens().is_empty() {
            effects |= EffectSet::BUFFER_CHANGED;
        }
        self.buffer.clear();
        self.touch();
        effects | self.show(catalog.default_layout().clone())
    }
}

/// Applies committed key selections.
#[derive(Debug, Clone)]
pub struct SelectionDispatcher {
    catalog: LayoutCatalog,
    suggestions: bool,
}

impl SelectionDispatcher {
    pub fn new(catalog: LayoutCatalog) -> Self {
        Self {
            catalog,
            suggestions: false,
        }
    }

    /// Route appends through a suggestion request instead of deriving
    /// immediately.
    pub fn with_suggestions(mut self, enabled: bool) -> Self {
        self.suggestions = enabled;
        self
    }

    pub fn catalog(&self) -> &LayoutCatalog {
        &self.catalog
    }

    pub fn suggestions_enabled(&self) -> bool {
        self.suggestions
    }

    /// Apply the key `key_id` of the visible layout.
    ///
    /// Returns `Fault::UnknownKey` when the visible layout has no such key;
    /// nothing is mutated in that case.
    pub fn dispatch(&self, state: &mut KeyboardState, key_id: &str) -> Result<Outcome, Fault> {
        let key = state
            .layout
            .key(key_id)
            .cloned()
            .ok_or_else(|| Fault::UnknownKey(TargetId::key(key_id)))?;

        tracing::info!(key = %key.id, label = %key.label, layout = %state.layout.id, "key selected");

        let mut out = Outcome::none();
        out.flag(EffectSet::COMMITTED);

        match key.id.as_str() {
            keys::CLEAR => {
                out.speak("clear");
                out.flag(state.reset(&self.catalog));
            }
            keys::HOME => {
                out.speak("home");
                self.navigate(state, ids::DEFAULT, &mut out);
            }
            keys::EXIT => {
                out.speak("exit");
                out.signal(HostSignal::SessionEnd);
            }
            keys::VOCAB => {
                out.speak("vocab");
                self.navigate(state, ids::VOCAB, &mut out);
            }
            _ => self.dispatch_key(state, &key, &mut out),
        }

        Ok(out)
    }

    fn dispatch_key(&self, state: &mut KeyboardState, key: &KeySpec, out: &mut Outcome) {
        if let (KeyType::Action, Some(modality)) = (key.key_type, key.modality) {
            out.speak(key.label.clone());
            out.signal(HostSignal::SwitchModality(modality));
            return;
        }

        if key.key_type == KeyType::Category && self.catalog.layout_by_id(&key.id).is_some() {
            out.speak(key.label.clone());
            self.navigate(state, &key.id, out);
            return;
        }

        out.speak(key.label.clone());
        state.buffer.append(key.label.clone());
        out.flag(EffectSet::BUFFER_CHANGED);
        let ticket = state.touch();
        self.rederive(state, ticket, out);
    }

    /// Explicit navigation. Overrides derivation and stales pending requests.
    fn navigate(&self, state: &mut KeyboardState, layout_id: &str, out: &mut Outcome) {
        state.touch();
        if let Some(layout) = self.catalog.layout_by_id(layout_id) {
            out.flag(state.show(layout.clone()));
        }
    }

    /// Re-derive after a buffer change.
    ///
    /// With suggestions enabled and a non-empty sentence a request is emitted
    /// and the current layout stays visible until the result arrives.
    pub fn rederive(&self, state: &mut KeyboardState, ticket: u64, out: &mut Outcome) {
        if self.suggestions && !state.buffer.is_empty() {
            out.derive(DeriveRequest {
                ticket,
                sentence: state.buffer.text(),
            });
            return;
        }
        self.apply_rules(state, out);
    }

    /// Show the rule-based layout for the current sentence.
    pub fn apply_rules(&self, state: &mut KeyboardState, out: &mut Outcome) {
        let layout = self.catalog.derive_rule_based(&state.buffer).clone();
        out.flag(state.show(layout));
    }

    /// Show the suggestion layout.
    pub fn apply_suggestion_layout(&self, state: &mut KeyboardState, suggestions: &[String], out: &mut Outcome) {
        let layout = self.catalog.derive_suggestion_layout(suggestions);
        out.flag(state.show(layout));
    }
}
