//! Dwell-selection AAC keyboard.
//!
//! A user with limited motor control builds a sentence by resting a pointer
//! (mouse, gaze or head tracker) or a switch scanner on a key until its
//! dwell timer completes. Every committed word is spoken, appended to the
//! sentence, and the next layout is derived from what has been said so far.
//!
//! # Crates
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | `dwell_input` | Geometry, raw input events, hit testing, hover edges |
//! | `dwell_core` | Dwell timer state machine, timings, effect flags, event log |
//! | `dwell_layout` | Keys, layouts, the sentence buffer, rule-based derivation |
//! | `aac_keyboard` | Session engine, suggestion sources, async driver, replay |
//!
//! # Quick start
//!
//! ```no_run
//! use aac_keyboard::{KeyboardConfig, Services, SessionDriver};
//! use tokio::sync::mpsc;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = KeyboardConfig::default();
//! let services = Services::tracing(&config.speech, &config.sound);
//! let driver = SessionDriver::from_config(&config, services)?;
//! let (inputs, rx) = mpsc::channel(64);
//! let session = tokio::spawn(driver.run(rx));
//! drop(inputs);
//! session.await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod driver;
pub mod error;
pub mod render;
pub mod services;
pub mod session;
pub mod suggest;
pub mod trace;

pub use config::{KeyboardConfig, SoundConfig, SpeechConfig, SuggestionConfig};
pub use dispatcher::{KeyboardState, Outcome, SelectionDispatcher, SideEffect};
pub use driver::{SessionDriver, View};
pub use error::{SuggestError, SuggestResult};
pub use render::{GridGeometry, RegionGrid};
pub use services::{
    HostLink, HostSignal, Recorder, Services, SilentSound, SilentSpeech, SoundFeedback, SoundGate,
    SpeechOutput, TracingSound, TracingSpeech, Utterance,
};
pub use session::KeyboardSession;
pub use suggest::{
    normalize, DeriveRequest, GenerationParams, GenerativeSource, HttpSuggestionSource,
    ScriptedSource, SuggestionSource, TextGenerator,
};
pub use trace::{play, replay, Played, ReplayReport, Trace, TraceAction, TraceStep};

pub use dwell_core;
pub use dwell_input;
pub use dwell_layout;
