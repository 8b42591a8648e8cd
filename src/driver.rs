//! Async session driver.
//!
//! Runs a [`KeyboardSession`] on tokio as a single cooperative loop:
//!
//! ```text
//!            ┌──────────── select! ────────────┐
//!   inputs ──┤ RawInput        → handle_input  │
//!   frames ──┤ interval tick   → frame         ├──► perform side effects
//!   timer  ──┤ dwell deadline  → fire_due      │        │
//!   fetch  ──┤ suggestion res. → apply         │        └─► spawn fetch ─┐
//!            └─────────────────────────────────┘                         │
//!                     ▲                                                  │
//!                     └──────────────── mpsc ◄───────────────────────────┘
//! ```
//!
//! Suggestion fetches run as spawned tasks bounded by a timeout, so a slow
//! source never delays hover or dwell processing.

use crate::config::KeyboardConfig;
use crate::dispatcher::{Outcome, SideEffect};
use crate::error::{SuggestError, SuggestResult};
use crate::render::RegionGrid;
use crate::services::{HostSignal, Services};
use crate::session::KeyboardSession;
use crate::suggest::{DeriveRequest, HttpSuggestionSource, SuggestionSource};
use dwell_input::RawInput;
use dwell_layout::Layout;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::Instrument;

type SuggestionResult = (u64, SuggestResult<Vec<String>>);

/// What the host renders: the sentence and the visible keys.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub sentence: String,
    pub layout: Layout,
}

impl View {
    fn of(session: &KeyboardSession) -> Self {
        Self {
            sentence: session.sentence(),
            layout: session.layout().clone(),
        }
    }
}

/// Drives one session until it ends or its input channel closes.
pub struct SessionDriver {
    session: KeyboardSession,
    grid: RegionGrid,
    services: Services,
    source: Option<Arc<dyn SuggestionSource>>,
    frame: Duration,
    timeout: Duration,
    view: watch::Sender<View>,
}

impl SessionDriver {
    pub fn new(session: KeyboardSession, grid: RegionGrid, services: Services) -> Self {
        let (view, _) = watch::channel(View::of(&session));
        Self {
            session,
            grid,
            services,
            source: None,
            frame: Duration::from_millis(16),
            timeout: Duration::from_millis(5000),
            view,
        }
    }

    /// Build a driver from configuration.
    ///
    /// Uses the HTTP suggestion source when suggestions are enabled and a
    /// URL is configured.
    pub fn from_config(config: &KeyboardConfig, services: Services) -> anyhow::Result<Self> {
        config.validate()?;
        let catalog = config.load_catalog()?;
        let session = KeyboardSession::new(config, catalog);
        let mut driver = Self::new(session, RegionGrid::new(config.grid.clone()), services)
            .with_frame(Duration::from_millis(config.frame_ms))
            .with_timeout(Duration::from_millis(config.suggestions.timeout_ms));

        if config.suggestions_enabled() {
            match &config.suggestions.url {
                Some(url) => {
                    let timeout = Duration::from_millis(config.suggestions.timeout_ms);
                    let source = HttpSuggestionSource::with_timeout(url.clone(), timeout)?;
                    tracing::info!(url = source.url(), ?timeout, "using HTTP suggestion source");
                    driver = driver.with_source(Arc::new(source));
                }
                None => tracing::warn!("suggestions enabled without a url; using rules only"),
            }
        }
        Ok(driver)
    }

    pub fn with_source(mut self, source: Arc<dyn SuggestionSource>) -> Self {
        self.session = self.session.with_suggestions(true);
        self.source = Some(source);
        self
    }

    pub fn with_frame(mut self, frame: Duration) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn grid(&self) -> &RegionGrid {
        &self.grid
    }

    /// Watch the rendered view.
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.view.subscribe()
    }

    /// Run until the session ends. Closing `inputs` ends the session.
    pub async fn run(self, inputs: mpsc::Receiver<RawInput>) -> KeyboardSession {
        let span = tracing::info_span!("keyboard_session", id = %self.session.id());
        self.run_loop(inputs).instrument(span).await
    }

    async fn run_loop(mut self, mut inputs: mpsc::Receiver<RawInput>) -> KeyboardSession {
        let start = Instant::now();
        let now_ms = move || start.elapsed().as_millis() as u64;

        let (results_tx, mut results) = mpsc::channel::<SuggestionResult>(16);
        let mut frames = tokio::time::interval(self.frame);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(frame = ?self.frame, suggestions = self.source.is_some(), "driver started");

        loop {
            let deadline = self
                .session
                .next_deadline()
                .map(|ms| start + Duration::from_millis(ms));

            tokio::select! {
                input = inputs.recv() => match input {
                    Some(input) => self.session.handle_input(&input),
                    None => {
                        tracing::debug!("input channel closed");
                        let out = self.session.end(now_ms());
                        self.perform(out, &results_tx, now_ms());
                    }
                },
                _ = frames.tick() => {
                    let regions = self.grid.regions(self.session.layout());
                    let now = now_ms();
                    let out = self.session.frame(now, &regions);
                    self.perform(out, &results_tx, now);
                }
                _ = tokio::time::sleep_until(deadline.unwrap_or(start)), if deadline.is_some() => {
                    let now = now_ms();
                    let out = self.session.fire_due(now);
                    self.perform(out, &results_tx, now);
                }
                Some((ticket, result)) = results.recv() => {
                    let now = now_ms();
                    let out = self.session.apply_suggestions(ticket, result);
                    self.perform(out, &results_tx, now);
                }
            }

            if self.session.is_ended() {
                break;
            }
        }

        tracing::info!(commits = self.session.log().commits().len(), "driver stopped");
        self.session
    }

    /// Deliver every request of `out`, following up on anything that
    /// produces a further outcome.
    fn perform(&mut self, out: Outcome, results: &mpsc::Sender<SuggestionResult>, now: u64) {
        let mut queue = VecDeque::from([out]);
        while let Some(out) = queue.pop_front() {
            if out.effects.needs_redraw() {
                self.view.send_replace(View::of(&self.session));
            }
            for request in &out.requests {
                match request {
                    SideEffect::Derive(request) => match &self.source {
                        Some(source) => self.spawn_fetch(source.clone(), request.clone(), results),
                        None => queue.push_back(
                            self.session
                                .apply_suggestions(request.ticket, Err(SuggestError::Unavailable)),
                        ),
                    },
                    SideEffect::Signal(HostSignal::SessionEnd) => {
                        self.services.perform(request);
                        queue.push_back(self.session.end(now));
                    }
                    other => {
                        self.services.perform(other);
                    }
                }
            }
        }
    }

    fn spawn_fetch(
        &self,
        source: Arc<dyn SuggestionSource>,
        request: DeriveRequest,
        results: &mpsc::Sender<SuggestionResult>,
    ) {
        let results = results.clone();
        let timeout = self.timeout;
        tracing::debug!(source = source.name(), ticket = request.ticket, "fetching suggestions");

        tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, source.suggest(&request.sentence)).await {
                Ok(result) => result,
                Err(_) => Err(SuggestError::Timeout(timeout.as_millis() as u64)),
            };
            if results.send((request.ticket, result)).await.is_err() {
                tracing::debug!(ticket = request.ticket, "driver gone; suggestions dropped");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Recorder;
    use crate::suggest::ScriptedSource;
    use async_trait::async_trait;
    use dwell_input::TargetId;
    use dwell_layout::LayoutCatalog;

    /// Source that answers after a delay.
    struct SlowSource {
        delay: Duration,
        inner: ScriptedSource,
    }

    #[async_trait]
    impl SuggestionSource for SlowSource {
        async fn suggest(&self, sentence: &str) -> SuggestResult<Vec<String>> {
            tokio::time::sleep(self.delay).await;
            self.inner.suggest(sentence).await
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    fn at(target: TargetId, layout: &str) -> RawInput {
        let catalog = LayoutCatalog::builtin();
        let pos = RegionGrid::default()
            .center_of(&target, catalog.layout_by_id(layout).unwrap())
            .unwrap();
        RawInput::PointerMoved { pos }
    }

    fn driver(recorder: &Arc<Recorder>) -> SessionDriver {
        let config = KeyboardConfig::default();
        let session = KeyboardSession::new(&config, LayoutCatalog::builtin());
        SessionDriver::new(session, RegionGrid::default(), Services::recording(recorder))
    }

    async fn pause(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[test]
    fn from_config_builds_http_source_only_with_url() {
        let recorder = Recorder::new();
        let mut config = KeyboardConfig::default();
        config.suggestions.enabled = true;
        config.suggestions.timeout_ms = 750;

        let driver = SessionDriver::from_config(&config, Services::recording(&recorder)).unwrap();
        assert!(driver.source.is_none());
        assert!(!driver.session.suggestions_enabled());
        assert_eq!(driver.timeout, Duration::from_millis(750));

        config.suggestions.url = Some("http://127.0.0.1:9/suggest".into());
        let driver = SessionDriver::from_config(&config, Services::recording(&recorder)).unwrap();
        assert_eq!(driver.source.as_ref().map(|s| s.name()), Some("http"));
        assert!(driver.session.suggestions_enabled());

        config.frame_ms = 0;
        assert!(SessionDriver::from_config(&config, Services::recording(&recorder)).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drives_dwell_selection() {
        let recorder = Recorder::new();
        let driver = driver(&recorder);
        let view = driver.subscribe();
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(driver.run(rx));

        tx.send(at(TargetId::key("i"), "default")).await.unwrap();
        pause(3100).await;
        assert_eq!(view.borrow().layout.id, "afterI");

        tx.send(at(TargetId::key("like"), "afterI")).await.unwrap();
        pause(3100).await;
        assert_eq!(view.borrow().sentence, "i like");

        tx.send(at(TargetId::Backspace, "afterILike")).await.unwrap();
        pause(2100).await;
        assert_eq!(view.borrow().sentence, "i");
        assert_eq!(view.borrow().layout.id, "afterI");

        drop(tx);
        let session = handle.await.unwrap();
        assert!(session.is_ended());
        assert_eq!(recorder.spoken(), vec!["i", "like", "backspace"]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_source_times_out_to_rules() {
        let recorder = Recorder::new();
        let source = SlowSource {
            delay: Duration::from_secs(10),
            inner: ScriptedSource::new().with("i", &["want"]),
        };
        let driver = driver(&recorder)
            .with_source(Arc::new(source))
            .with_timeout(Duration::from_millis(500));
        let view = driver.subscribe();
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(driver.run(rx));

        tx.send(at(TargetId::key("i"), "default")).await.unwrap();
        pause(3100).await;
        assert_eq!(view.borrow().sentence, "i");
        assert_eq!(view.borrow().layout.id, "default");

        pause(600).await;
        assert_eq!(view.borrow().layout.id, "afterI");

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn suggestions_replace_rules() {
        let recorder = Recorder::new();
        let source = SlowSource {
            delay: Duration::from_millis(200),
            inner: ScriptedSource::new().with("i", &["want", "need"]),
        };
        let driver = driver(&recorder).with_source(Arc::new(source));
        let view = driver.subscribe();
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(driver.run(rx));

        tx.send(at(TargetId::key("i"), "default")).await.unwrap();
        pause(3400).await;
        let shown = view.borrow().layout.clone();
        assert_eq!(shown.id, "suggestions");
        assert_eq!(shown.keys[6].label, "want");

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stale_results_never_show() {
        let recorder = Recorder::new();
        let source = SlowSource {
            delay: Duration::from_millis(5000),
            inner: ScriptedSource::new().with("i", &["pizza"]),
        };
        let driver = driver(&recorder)
            .with_source(Arc::new(source))
            .with_timeout(Duration::from_secs(10));
        let view = driver.subscribe();
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(driver.run(rx));

        tx.send(at(TargetId::key("i"), "default")).await.unwrap();
        pause(3100).await;
        tx.send(at(TargetId::key("vocab"), "default")).await.unwrap();
        pause(3100).await;
        assert_eq!(view.borrow().layout.id, "vocab");

        // The request for "i" resolves around t=8000 and must be dropped.
        pause(3000).await;
        assert_eq!(view.borrow().layout.id, "vocab");

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn results_for_an_older_sentence_are_dropped() {
        let recorder = Recorder::new();
        let source = SlowSource {
            delay: Duration::from_millis(5000),
            inner: ScriptedSource::new().with("i", &["want"]).with("i can", &["eat"]),
        };
        let driver = driver(&recorder)
            .with_source(Arc::new(source))
            .with_timeout(Duration::from_secs(10));
        let view = driver.subscribe();
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(driver.run(rx));

        tx.send(at(TargetId::key("i"), "default")).await.unwrap();
        pause(3100).await;
        tx.send(at(TargetId::key("can"), "default")).await.unwrap();
        pause(3100).await;
        tx.send(RawInput::PointerLeft).await.unwrap();
        assert_eq!(view.borrow().sentence, "i can");

        // The answer for "i" lands around t=8000 and is discarded.
        pause(2800).await;
        assert_eq!(view.borrow().layout.id, "default");

        // The answer for "i can" lands around t=11100.
        pause(2300).await;
        let shown = view.borrow().layout.clone();
        assert_eq!(shown.id, "suggestions");
        assert_eq!(shown.keys[6].label, "eat");

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn exit_ends_the_session() {
        let recorder = Recorder::new();
        let driver = driver(&recorder);
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(driver.run(rx));

        tx.send(at(TargetId::key("exit"), "default")).await.unwrap();
        let session = handle.await.unwrap();

        assert!(session.is_ended());
        assert_eq!(recorder.spoken(), vec!["exit"]);
        assert_eq!(recorder.signals(), vec![HostSignal::SessionEnd]);
        assert_eq!(session.next_deadline(), None);
    }
}
