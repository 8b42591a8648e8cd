//! Scripted input traces and deterministic replay.
//!
//! A trace is a YAML list of timed pointer/switch steps. [`replay`] runs the
//! session on a virtual clock, one frame at a time, and awaits suggestion
//! requests inline, so the same trace always produces the same report.
//! [`play`] instead feeds the steps to a live [`SessionDriver`] on the tokio
//! clock.
//!
//! ```yaml
//! frame_ms: 16
//! suggestions:
//!   i like: [pizza, music]
//! steps:
//!   - { at_ms: 0, do: hover, target: i }
//!   - { at_ms: 3100, do: hover, target: like }
//!   - { at_ms: 6200, do: hover, target: backspace-btn }
//!   - { at_ms: 8300, do: leave }
//! ```

use crate::config::KeyboardConfig;
use crate::dispatcher::{Outcome, SideEffect};
use crate::driver::{SessionDriver, View};
use crate::render::RegionGrid;
use crate::services::{HostSignal, Recorder, Services};
use crate::session::KeyboardSession;
use crate::suggest::{ScriptedSource, SuggestionSource};
use anyhow::Context;
use dwell_input::{RawInput, TargetId, Vec2, BACKSPACE_ID, OFFSCREEN, SPEAKER_ID};
use dwell_layout::{Layout, LayoutCatalog};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// A recorded or hand-written input script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trace {
    /// Frame interval; falls back to the config's.
    #[serde(default)]
    pub frame_ms: Option<u64>,
    /// Stop time; defaults to a little after the last step settles.
    #[serde(default)]
    pub until_ms: Option<u64>,
    /// Canned suggestions. Non-empty enables the suggestion path.
    #[serde(default)]
    pub suggestions: ScriptedSource,
    pub steps: Vec<TraceStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: TraceAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "do", rename_all = "snake_case")]
pub enum TraceAction {
    /// Move the pointer to the center of a control of the visible layout.
    Hover { target: String },
    /// Move the pointer to an absolute position.
    Move { x: f32, y: f32 },
    /// Click where the pointer is.
    Click,
    /// Pointer leaves the viewport.
    Leave,
    /// Switch hardware reports an active control (or none).
    Switch { target: Option<String> },
}

/// Parse a control name as written in traces.
pub fn parse_target(name: &str) -> TargetId {
    match name {
        BACKSPACE_ID | "backspace" => TargetId::Backspace,
        SPEAKER_ID | "speaker" => TargetId::Speaker,
        key => TargetId::key(key),
    }
}

impl Trace {
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let mut trace: Trace = serde_yaml::from_str(yaml).context("Failed to parse trace")?;
        trace.steps.sort_by_key(|s| s.at_ms);
        Ok(trace)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace: {}", path.display()))?;
        Self::from_yaml(&content)
    }

    fn end_ms(&self, config: &KeyboardConfig) -> u64 {
        if let Some(until) = self.until_ms {
            return until;
        }
        let timings = config.effective_timings();
        let last = self.steps.last().map(|s| s.at_ms).unwrap_or_default();
        last + timings.key_ms.max(timings.control_ms) + 2 * config.frame_ms
    }
}

/// Everything a replay produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub session: String,
    pub spoken: Vec<String>,
    pub sounds: usize,
    pub signals: Vec<HostSignal>,
    pub commits: Vec<String>,
    pub sentence: String,
    pub layout: String,
    pub ended: bool,
    pub log: Vec<String>,
}

/// Replay `trace` against a fresh session.
///
/// A `SessionEnd` signal ends the session and the replay.
pub async fn replay(
    trace: &Trace,
    config: &KeyboardConfig,
    catalog: LayoutCatalog,
) -> anyhow::Result<ReplayReport> {
    let recorder = Recorder::new();
    let services = Services::recording(&recorder);
    let grid = RegionGrid::new(config.grid.clone());
    let frame_ms = trace.frame_ms.unwrap_or(config.frame_ms).max(1);
    let end_ms = trace.end_ms(config);
    let scripted = !trace.suggestions.is_empty();

    let mut session = KeyboardSession::new(config, catalog).with_suggestions(scripted);
    let mut steps = trace.steps.iter().peekable();
    let mut now = 0;

    tracing::info!(steps = trace.steps.len(), end_ms, frame_ms, scripted, "replaying trace");

    while now <= end_ms && !session.is_ended() {
        while let Some(step) = steps.next_if(|s| s.at_ms <= now) {
            let input = to_input(&step.action, session.layout(), session.pointer().pos, &grid);
            tracing::debug!(at_ms = step.at_ms, ?input, "trace step");
            session.handle_input(&input);
        }

        let regions = grid.regions(session.layout());
        let mut queue = VecDeque::from([session.frame(now, &regions)]);
        while let Some(out) = queue.pop_front() {
            deliver(out, &mut session, &services, &trace.suggestions, now, &mut queue).await;
        }
        now += frame_ms;
    }

    let signals = recorder.signals();
    let report = ReplayReport {
        session: session.id().to_string(),
        spoken: recorder.spoken(),
        sounds: recorder.sounds(),
        commits: session
            .log()
            .commits()
            .iter()
            .map(|t| t.to_string())
            .collect(),
        sentence: session.sentence(),
        layout: session.layout().id.clone(),
        ended: session.is_ended(),
        log: session.log().to_lines(),
        signals,
    };
    Ok(report)
}

async fn deliver(
    out: Outcome,
    session: &mut KeyboardSession,
    services: &Services,
    suggestions: &ScriptedSource,
    now: u64,
    queue: &mut VecDeque<Outcome>,
) {
    for request in &out.requests {
        match request {
            SideEffect::Derive(request) => {
                let result = suggestions.suggest(&request.sentence).await;
                queue.push_back(session.apply_suggestions(request.ticket, result));
            }
            SideEffect::Signal(HostSignal::SessionEnd) => {
                services.perform(&SideEffect::Signal(HostSignal::SessionEnd));
                queue.push_back(session.end(now));
            }
            other => {
                services.perform(other);
            }
        }
    }
}

/// Result of [`play`].
pub struct Played {
    /// The session after the driver stopped (and ended it).
    pub session: KeyboardSession,
    /// What was on screen just before the session ended.
    pub last_view: View,
}

/// Feed `trace` to `driver` in real time and wait for it to stop.
///
/// Hover steps resolve against the layout the driver shows at that moment.
/// The input channel is closed once the trace has settled, which ends the
/// session.
pub async fn play(trace: &Trace, config: &KeyboardConfig, driver: SessionDriver) -> anyhow::Result<Played> {
    let grid = driver.grid().clone();
    let view = driver.subscribe();
    let (tx, rx) = mpsc::channel(64);
    let handle = tokio::spawn(driver.run(rx));

    let start = Instant::now();
    let mut pointer = OFFSCREEN;
    for step in &trace.steps {
        tokio::time::sleep_until(start + Duration::from_millis(step.at_ms)).await;
        let layout = view.borrow().layout.clone();
        let input = to_input(&step.action, &layout, pointer, &grid);
        if let RawInput::PointerMoved { pos } = &input {
            pointer = *pos;
        }
        if tx.send(input).await.is_err() {
            tracing::debug!(at_ms = step.at_ms, "session ended before the trace did");
            break;
        }
    }

    if !handle.is_finished() {
        tokio::time::sleep_until(start + Duration::from_millis(trace.end_ms(config))).await;
    }
    let last_view = view.borrow().clone();
    drop(tx);

    let session = handle.await.context("driver task failed")?;
    Ok(Played { session, last_view })
}

fn to_input(action: &TraceAction, layout: &Layout, pointer: Vec2, grid: &RegionGrid) -> RawInput {
    match action {
        TraceAction::Hover { target } => {
            let target = parse_target(target);
            let pos = grid.center_of(&target, layout).unwrap_or_else(|| {
                tracing::warn!(%target, layout = %layout.id, "hover target not visible");
                OFFSCREEN
            });
            RawInput::PointerMoved { pos }
        }
        TraceAction::Move { x, y } => RawInput::PointerMoved {
            pos: Vec2::new(*x, *y),
        },
        TraceAction::Click => RawInput::PointerClicked { pos: pointer },
        TraceAction::Leave => RawInput::PointerLeft,
        TraceAction::Switch { target } => RawInput::ActiveControl {
            target: target.as_deref().map(parse_target),
        },
    }
}
