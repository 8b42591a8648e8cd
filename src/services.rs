//! Output ports: speech, hover sound and host signals.
//!
//! The engine never performs output itself. It emits [`SideEffect`]
//! requests and whoever drives the session hands them to these ports.

use crate::config::{SoundConfig, SpeechConfig};
use crate::dispatcher::SideEffect;
use dwell_layout::Modality;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Text plus voice parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Preferred voice language prefix, e.g. `en`.
    pub lang: String,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_voice(text, &SpeechConfig::default())
    }

    pub fn with_voice(text: impl Into<String>, voice: &SpeechConfig) -> Self {
        Self {
            text: text.into(),
            rate: voice.rate,
            pitch: voice.pitch,
            volume: voice.volume,
            lang: voice.lang.clone(),
        }
    }
}

/// Speech synthesis port.
///
/// `speak` is fire-and-forget and must interrupt whatever is currently being
/// spoken, so the user always hears the latest selection.
pub trait SpeechOutput: Send + Sync {
    fn speak(&self, utterance: &Utterance);
}

/// Speech unavailable: every utterance is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeech;

impl SpeechOutput for SilentSpeech {
    fn speak(&self, _utterance: &Utterance) {}
}

/// Logs utterances instead of voicing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSpeech;

impl SpeechOutput for TracingSpeech {
    fn speak(&self, utterance: &Utterance) {
        tracing::info!(text = %utterance.text, rate = utterance.rate, "speaking");
    }
}

/// Hover sound port.
pub trait SoundFeedback: Send + Sync {
    fn play_hover(&self);
}

/// No hover sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSound;

impl SoundFeedback for SilentSound {
    fn play_hover(&self) {}
}

/// Logs hover sounds at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSound {
    pub volume: f32,
}

impl SoundFeedback for TracingSound {
    fn play_hover(&self) {
        tracing::trace!(volume = self.volume, "hover sound");
    }
}

/// Gate for hover sounds.
///
/// Audio stays locked until the first user click of the session, matching
/// platforms that refuse to play sound before a user gesture.
#[derive(Debug, Clone, Default)]
pub struct SoundGate {
    enabled: bool,
    unlocked: bool,
}

impl SoundGate {
    pub fn new(config: &SoundConfig) -> Self {
        Self {
            enabled: config.hover,
            unlocked: false,
        }
    }

    /// Unlock on a user gesture. Returns `true` only for the first unlock.
    pub fn unlock(&mut self) -> bool {
        if self.unlocked {
            return false;
        }
        self.unlocked = true;
        self.enabled
    }

    pub fn is_open(&self) -> bool {
        self.enabled && self.unlocked
    }
}

/// Signal from the keyboard to the application hosting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostSignal {
    /// The user selected exit; tear the keyboard down.
    SessionEnd,
    /// The user asked for a different input modality.
    SwitchModality(Modality),
}

/// The host's single callback for keyboard signals.
pub trait HostLink: Send + Sync {
    fn signal(&self, signal: HostSignal);
}

impl<F> HostLink for F
where
    F: Fn(HostSignal) + Send + Sync,
{
    fn signal(&self, signal: HostSignal) {
        self(signal)
    }
}

/// Captures everything sent to it. Used by the simulator and tests.
#[derive(Debug, Default)]
pub struct Recorder {
    spoken: Mutex<Vec<String>>,
    sounds: Mutex<usize>,
    signals: Mutex<Vec<HostSignal>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn sounds(&self) -> usize {
        self.sounds.lock().map(|n| *n).unwrap_or_default()
    }

    pub fn signals(&self) -> Vec<HostSignal> {
        self.signals.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl SpeechOutput for Recorder {
    fn speak(&self, utterance: &Utterance) {
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(utterance.text.clone());
        }
    }
}

impl SoundFeedback for Recorder {
    fn play_hover(&self) {
        if let Ok(mut n) = self.sounds.lock() {
            *n += 1;
        }
    }
}

impl HostLink for Recorder {
    fn signal(&self, signal: HostSignal) {
        if let Ok(mut signals) = self.signals.lock() {
            signals.push(signal);
        }
    }
}

/// Output ports bundled for a driver.
#[derive(Clone)]
pub struct Services {
    pub speech: Arc<dyn SpeechOutput>,
    pub sound: Arc<dyn SoundFeedback>,
    pub host: Arc<dyn HostLink>,
    pub voice: SpeechConfig,
}

impl Services {
    /// Logging ports honouring the speech switch.
    pub fn tracing(speech: &SpeechConfig, sound: &SoundConfig) -> Self {
        let out: Arc<dyn SpeechOutput> = if speech.enabled {
            Arc::new(TracingSpeech)
        } else {
            Arc::new(SilentSpeech)
        };
        Self {
            speech: out,
            sound: Arc::new(TracingSound {
                volume: sound.volume,
            }),
            host: Arc::new(|signal: HostSignal| tracing::info!(?signal, "host signal")),
            voice: speech.clone(),
        }
    }

    /// Route every port to one recorder.
    pub fn recording(recorder: &Arc<Recorder>) -> Self {
        Self {
            speech: recorder.clone(),
            sound: recorder.clone(),
            host: recorder.clone(),
            voice: SpeechConfig::default(),
        }
    }

    pub fn say(&self, text: &str) {
        self.speech.speak(&Utterance::with_voice(text, &self.voice));
    }

    /// Deliver one output request. Derivation requests are left to the
    /// caller, which owns the suggestion source; returns `false` for them.
    pub fn perform(&self, request: &SideEffect) -> bool {
        match request {
            SideEffect::Speak(text) => self.say(text),
            SideEffect::PlayHoverSound => self.sound.play_hover(),
            SideEffect::Signal(signal) => self.host.signal(*signal),
            SideEffect::Derive(_) => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utterance_defaults() {
        let u = Utterance::new("hello");
        assert_eq!(u.rate, 0.9);
        assert_eq!(u.pitch, 1.0);
        assert_eq!(u.volume, 1.0);
        assert_eq!(u.lang, "en");
    }

    #[test]
    fn sound_gate_unlocks_once() {
        let mut gate = SoundGate::new(&SoundConfig::default());
        assert!(!gate.is_open());
        assert!(gate.unlock());
        assert!(!gate.unlock());
        assert!(gate.is_open());

        let mut muted = SoundGate::new(&SoundConfig {
            hover: false,
            volume: 0.5,
        });
        assert!(!muted.unlock());
        assert!(!muted.is_open());
    }

    #[test]
    fn closure_is_a_host_link() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let link = move |s: HostSignal| sink.lock().unwrap().push(s);
        link.signal(HostSignal::SessionEnd);
        assert_eq!(*seen.lock().unwrap(), vec![HostSignal::SessionEnd]);
    }

    #[test]
    fn recorder_captures_ports() {
        let recorder = Recorder::new();
        let services = Services::recording(&recorder);
        services.say("eat");
        services.sound.play_hover();
        services.host.signal(HostSignal::SwitchModality(Modality::HeadTracking));

        assert_eq!(recorder.spoken(), vec!["eat"]);
        assert_eq!(recorder.sounds(), 1);
        assert_eq!(
            recorder.signals(),
            vec![HostSignal::SwitchModality(Modality::HeadTracking)]
        );
    }
}
