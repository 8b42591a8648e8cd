//! Keyboard configuration.
//!
//! Defines the serde schema for the keyboard YAML file. Every section is
//! optional; an empty document yields the plain keyboard with built-in
//! vocabulary, speech on and suggestions off.
//!
//! ```yaml
//! variant: head_tracking
//! timings:
//!   key_ms: 2500
//!   control_ms: 2000
//! type_dwell_ms:
//!   action: 4000
//! suggestions:
//!   enabled: true
//!   url: http://localhost:8080/suggest
//!   timeout_ms: 4000
//! speech:
//!   rate: 0.9
//! catalog: config/layouts.yaml
//! ```

use crate::render::GridGeometry;
use anyhow::{bail, Context};
use dwell_core::{check_duration, DwellTimings};
use dwell_input::RegionClass;
use dwell_layout::{KeyType, LayoutCatalog, Modality, MAX_SUGGESTIONS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Input modality the keyboard is tuned for.
    #[serde(default)]
    pub variant: Modality,

    /// Explicit dwell durations; the variant preset applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings: Option<DwellTimings>,

    /// Per key type dwell. A key's own `dwell_ms` still wins; types not
    /// listed use `key_ms`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub type_dwell_ms: BTreeMap<KeyType, u64>,

    #[serde(default)]
    pub suggestions: SuggestionConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub sound: SoundConfig,

    #[serde(default)]
    pub grid: GridGeometry,

    /// Custom layout catalog; the built-in vocabulary is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Hover poll cadence for the async driver.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
}

fn default_frame_ms() -> u64 {
    16
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            variant: Modality::default(),
            timings: None,
            type_dwell_ms: BTreeMap::new(),
            suggestions: SuggestionConfig::default(),
            speech: SpeechConfig::default(),
            sound: SoundConfig::default(),
            grid: GridGeometry::default(),
            catalog: None,
            frame_ms: default_frame_ms(),
        }
    }
}

/// Suggestion service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Endpoint for the HTTP suggestion source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// A request slower than this counts as no suggestions.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// How many suggestions to show (at most 18).
    #[serde(default = "default_max_suggestions")]
    pub max: usize,
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_max_suggestions() -> usize {
    MAX_SUGGESTIONS
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: None,
            timeout_ms: default_timeout_ms(),
            max: default_max_suggestions(),
        }
    }
}

/// Speech output settings. Mirrors the utterance defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_rate")]
    pub rate: f32,

    #[serde(default = "default_one")]
    pub pitch: f32,

    #[serde(default = "default_one")]
    pub volume: f32,

    /// Preferred voice language prefix.
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_true() -> bool {
    true
}

fn default_rate() -> f32 {
    0.9
}

fn default_one() -> f32 {
    1.0
}

fn default_lang() -> String {
    "en".to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: default_rate(),
            pitch: 1.0,
            volume: 1.0,
            lang: default_lang(),
        }
    }
}

/// Hover sound settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_true")]
    pub hover: bool,

    #[serde(default = "default_sound_volume")]
    pub volume: f32,
}

fn default_sound_volume() -> f32 {
    0.5
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            hover: true,
            volume: default_sound_volume(),
        }
    }
}

impl KeyboardConfig {
    /// Preset for a keyboard variant.
    pub fn for_variant(variant: Modality) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: KeyboardConfig = if yaml.trim().is_empty() {
            KeyboardConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Dwell durations in effect: explicit timings, else the variant preset.
    pub fn effective_timings(&self) -> DwellTimings {
        self.timings.unwrap_or_else(|| match self.variant {
            Modality::Plain | Modality::HeadTracking => DwellTimings::default(),
            Modality::SwitchControl => DwellTimings::new(1500, 1500),
        })
    }

    /// Whether a suggestion source should be built.
    pub fn suggestions_enabled(&self) -> bool {
        self.suggestions.enabled && self.suggestions.max > 0
    }

    /// Apply `AAC_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Unparseable values are ignored and the configured value is kept.
    pub fn apply_vars<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let num = |key: &str| get(key).and_then(|v| v.trim().parse::<u64>().ok());

        let mut timings = self.effective_timings();
        let mut timings_changed = false;
        if let Some(ms) = num("AAC_KEY_DWELL_MS") {
            timings.key_ms = ms;
            timings_changed = true;
        }
        if let Some(ms) = num("AAC_CONTROL_DWELL_MS") {
            timings.control_ms = ms;
            timings_changed = true;
        }
        if timings_changed {
            self.timings = Some(timings);
        }

        if let Some(url) = get("AAC_SUGGESTIONS_URL").filter(|u| !u.trim().is_empty()) {
            self.suggestions.url = Some(url);
            self.suggestions.enabled = true;
        }
        if let Some(ms) = num("AAC_SUGGESTION_TIMEOUT_MS") {
            self.suggestions.timeout_ms = ms;
        }
        if let Some(flag) = get("AAC_SPEECH") {
            match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => self.speech.enabled = true,
                "0" | "false" | "off" | "no" => self.speech.enabled = false,
                other => tracing::warn!(value = other, "ignoring unrecognised AAC_SPEECH"),
            }
        }
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.effective_timings().validate()?;
        for (key_type, ms) in &self.type_dwell_ms {
            check_duration(RegionClass::Key, *ms)
                .with_context(|| format!("type_dwell_ms.{key_type:?}"))?;
        }

        if self.suggestions.max > MAX_SUGGESTIONS {
            bail!(
                "suggestions.max {} exceeds the {} available slots",
                self.suggestions.max,
                MAX_SUGGESTIONS
            );
        }
        if self.suggestions.timeout_ms == 0 {
            bail!("suggestions.timeout_ms must be positive");
        }
        if self.frame_ms == 0 {
            bail!("frame_ms must be positive");
        }
        if !(0.0..=1.0).contains(&self.speech.volume) || !(0.0..=1.0).contains(&self.sound.volume) {
            bail!("volumes must be within 0.0..=1.0");
        }
        if self.speech.rate <= 0.0 {
            bail!("speech.rate must be positive");
        }
        self.grid.validate()?;
        Ok(())
    }

    /// Load the configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> anyhow::Result<LayoutCatalog> {
        match &self.catalog {
            Some(path) => LayoutCatalog::load(path),
            None => Ok(LayoutCatalog::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn empty_yaml_is_plain_default() {
        let config = KeyboardConfig::from_yaml("").unwrap();
        assert_eq!(config, KeyboardConfig::default());
        assert_eq!(config.effective_timings(), DwellTimings::new(3000, 2000));
        assert!(config.speech.enabled);
        assert!(!config.suggestions_enabled());
        assert_eq!(config.speech.rate, 0.9);
        assert_eq!(config.sound.volume, 0.5);
    }

    #[test]
    fn load_full_config() {
        let yaml = r#"
variant: switch_control
suggestions:
  enabled: true
  url: http://localhost:9000/suggest
  max: 12
speech:
  enabled: false
"#;
        let config = KeyboardConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.variant, Modality::SwitchControl);
        assert_eq!(config.effective_timings(), DwellTimings::new(1500, 1500));
        assert!(config.suggestions_enabled());
        assert_eq!(config.suggestions.timeout_ms, 5000); // default
        assert_eq!(config.suggestions.max, 12);
        assert!(!config.speech.enabled);
        assert_eq!(config.speech.lang, "en");
    }

    #[test]
    fn explicit_timings_override_variant() {
        let yaml = "variant: switch_control\ntimings:\n  key_ms: 2200\n";
        let config = KeyboardConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.effective_timings(), DwellTimings::new(2200, 2000));
    }

    #[test]
    fn type_dwell_section() {
        let config = KeyboardConfig::from_yaml("type_dwell_ms:\n  verb: 1000\n  action: 4000\n").unwrap();
        assert_eq!(config.type_dwell_ms.get(&KeyType::Verb), Some(&1000));
        assert_eq!(config.type_dwell_ms.get(&KeyType::Action), Some(&4000));
        assert_eq!(config.type_dwell_ms.get(&KeyType::Pronoun), None);

        assert!(KeyboardConfig::from_yaml("type_dwell_ms:\n  verb: 0\n").is_err());
    }

    #[test]
    fn validation_rejects_bad_values() {
        assert!(KeyboardConfig::from_yaml("timings:\n  key_ms: 0\n").is_err());
        assert!(KeyboardConfig::from_yaml("suggestions:\n  max: 19\n").is_err());
        assert!(KeyboardConfig::from_yaml("frame_ms: 0\n").is_err());
        assert!(KeyboardConfig::from_yaml("speech:\n  volume: 2.0\n").is_err());
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("AAC_KEY_DWELL_MS", "2500"),
            ("AAC_CONTROL_DWELL_MS", "not-a-number"),
            ("AAC_SUGGESTIONS_URL", "http://127.0.0.1:7000/s"),
            ("AAC_SUGGESTION_TIMEOUT_MS", "800"),
            ("AAC_SPEECH", "off"),
        ]
        .into_iter()
        .collect();

        let mut config = KeyboardConfig::default();
        config.apply_vars(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.effective_timings(), DwellTimings::new(2500, 2000));
        assert!(config.suggestions_enabled());
        assert_eq!(config.suggestions.url.as_deref(), Some("http://127.0.0.1:7000/s"));
        assert_eq!(config.suggestions.timeout_ms, 800);
        assert!(!config.speech.enabled);
    }

    #[test]
    fn builtin_catalog_without_path() {
        let catalog = KeyboardConfig::default().load_catalog().unwrap();
        assert_eq!(catalog.default_layout().len(), 24);
        assert!(KeyboardConfig {
            catalog: Some("/nonexistent/layouts.yaml".into()),
            ..KeyboardConfig::default()
        }
        .load_catalog()
        .is_err());
    }
}
