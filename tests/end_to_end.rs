//! Whole-keyboard scenarios driven through trace replay and the session API.

use aac_keyboard::dwell_input::TargetId;
use aac_keyboard::dwell_layout::{KeySpec, KeyType, Layout, LayoutCatalog, Modality};
use aac_keyboard::{replay, HostSignal, KeyboardConfig, KeyboardSession, RegionGrid, SideEffect, Trace};
use pretty_assertions::assert_eq;

async fn run(config: &KeyboardConfig, yaml: &str) -> aac_keyboard::ReplayReport {
    let trace = Trace::from_yaml(yaml).unwrap();
    replay(&trace, config, LayoutCatalog::builtin()).await.unwrap()
}

#[tokio::test]
async fn builds_and_speaks_a_sentence() {
    let report = run(
        &KeyboardConfig::default(),
        r#"
steps:
  - { at_ms: 0, do: hover, target: i }
  - { at_ms: 3100, do: hover, target: like }
  - { at_ms: 6200, do: hover, target: toplay }
  - { at_ms: 9300, do: hover, target: speaker-btn }
  - { at_ms: 11400, do: leave }
"#,
    )
    .await;

    assert_eq!(report.sentence, "i like to play");
    assert_eq!(report.layout, "afterILikeToPlay");
    assert_eq!(report.spoken, vec!["i", "like", "to play", "i like to play"]);
    assert_eq!(report.commits, vec!["i", "like", "toplay", "speaker-btn"]);
}

#[tokio::test]
async fn suggestions_fill_the_grid() {
    let report = run(
        &KeyboardConfig::default(),
        r#"
suggestions:
  i: [want, need, "  ", want]
steps:
  - { at_ms: 0, do: hover, target: i }
  - { at_ms: 3100, do: hover, target: suggestion_0 }
  - { at_ms: 6200, do: leave }
"#,
    )
    .await;

    assert_eq!(report.spoken, vec!["i", "want"]);
    assert_eq!(report.sentence, "i want");
    // No scripted answer for "i want": rules take over.
    assert_eq!(report.layout, "default");
}

#[tokio::test]
async fn exit_ends_the_session() {
    let report = run(
        &KeyboardConfig::default(),
        r#"
steps:
  - { at_ms: 0, do: hover, target: i }
  - { at_ms: 3100, do: hover, target: home }
  - { at_ms: 6200, do: hover, target: exit }
  - { at_ms: 20000, do: hover, target: i }
"#,
    )
    .await;

    assert!(report.ended);
    assert_eq!(report.spoken, vec!["i", "home", "exit"]);
    assert_eq!(report.signals, vec![HostSignal::SessionEnd]);
    assert_eq!(report.sentence, "");
    assert_eq!(report.layout, "default");
}

#[tokio::test]
async fn switch_control_uses_its_preset() {
    let config = KeyboardConfig::from_yaml("variant: switch_control\n").unwrap();
    let report = run(
        &config,
        r#"
steps:
  - { at_ms: 0, do: switch, target: i }
  - { at_ms: 1600, do: switch, target: backspace-btn }
  - { at_ms: 3200, do: switch }
"#,
    )
    .await;

    assert_eq!(report.commits, vec!["i", "backspace-btn"]);
    assert_eq!(report.spoken, vec!["i", "backspace"]);
    assert_eq!(report.sentence, "");
    assert_eq!(report.layout, "default");
}

#[tokio::test]
async fn configured_timings_override_the_preset() {
    let config = KeyboardConfig::from_yaml("timings:\n  key_ms: 500\n  control_ms: 400\n").unwrap();
    let report = run(
        &config,
        r#"
steps:
  - { at_ms: 0, do: hover, target: i }
  - { at_ms: 600, do: hover, target: like }
  - { at_ms: 1200, do: leave }
"#,
    )
    .await;

    assert_eq!(report.sentence, "i like");
    assert_eq!(report.layout, "afterILike");
}

#[test]
fn modality_key_signals_the_host() {
    let builtin = LayoutCatalog::builtin();
    let mut layouts: Vec<Layout> = builtin
        .layout_ids()
        .into_iter()
        .filter_map(|id| builtin.layout_by_id(id).cloned())
        .collect();
    layouts[0].keys[23] = KeySpec::new("head", "head tracking", KeyType::Action)
        .with_modality(Modality::HeadTracking);
    let catalog = LayoutCatalog::from_layouts(layouts).unwrap();

    let config = KeyboardConfig::default();
    let grid = RegionGrid::new(config.grid.clone());
    let mut session = KeyboardSession::new(&config, catalog);
    let pos = grid
        .center_of(&TargetId::key("head"), session.layout())
        .unwrap();
    session.handle_input(&aac_keyboard::dwell_input::RawInput::PointerMoved { pos });

    let mut requests = Vec::new();
    let mut now = 0;
    while now <= 3100 {
        let regions = grid.regions(session.layout());
        requests.extend(session.frame(now, &regions).requests);
        now += 16;
    }

    assert_eq!(
        requests,
        vec![
            SideEffect::Speak("head tracking".into()),
            SideEffect::Signal(HostSignal::SwitchModality(Modality::HeadTracking)),
        ]
    );
    assert_eq!(session.sentence(), "");
    assert!(!session.is_ended());
}
