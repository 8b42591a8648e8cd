//! Key definitions.

use serde::{Deserialize, Serialize};

/// Grammatical or functional class of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Pronoun,
    Verb,
    Adjective,
    Noun,
    Article,
    Conjunction,
    Preposition,
    Suffix,
    Response,
    /// Navigates to the layout named by the key id, when one exists.
    Category,
    /// Clear, home, exit and modality switches.
    Action,
    /// Synthesized from a suggestion result.
    Suggestion,
}

impl KeyType {
    /// Check if selecting this key may change the layout without touching the
    /// sentence.
    pub fn is_navigational(&self) -> bool {
        matches!(self, KeyType::Category | KeyType::Action)
    }
}

/// Input modality a host can switch to.
///
/// Also names the keyboard variant a configuration is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// Mouse or eye-gaze pointer.
    #[default]
    Plain,
    /// Head-tracking pointer.
    HeadTracking,
    /// Scanning switch hardware.
    SwitchControl,
}

fn default_color() -> String {
    "#f5f5f5".to_string()
}

/// One key of a layout. Immutable once defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    /// Unique within its layout.
    pub id: String,

    /// Text shown, spoken and appended.
    pub label: String,

    /// Icon name resolved by the presentation layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(rename = "type")]
    pub key_type: KeyType,

    #[serde(default = "default_color")]
    pub color: String,

    /// Per-key dwell override in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dwell_ms: Option<u64>,

    /// Modality the host should switch to when this action key commits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<Modality>,
}

impl KeySpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>, key_type: KeyType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            key_type,
            color: default_color(),
            dwell_ms: None,
            modality: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_dwell_ms(mut self, ms: u64) -> Self {
        self.dwell_ms = Some(ms);
        self
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = Some(modality);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn yaml_key_defaults() {
        let key: KeySpec = serde_yaml::from_str("{ id: eat, label: eat, type: verb }").unwrap();
        assert_eq!(key, KeySpec::new("eat", "eat", KeyType::Verb));
        assert_eq!(key.color, "#f5f5f5");
    }

    #[test]
    fn yaml_key_full() {
        let yaml = r##"
id: head
label: HEAD
type: action
color: "#ffccbc"
dwell_ms: 1500
modality: head_tracking
"##;
        let key: KeySpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            key,
            KeySpec::new("head", "HEAD", KeyType::Action)
                .with_color("#ffccbc")
                .with_dwell_ms(1500)
                .with_modality(Modality::HeadTracking)
        );
        assert!(key.key_type.is_navigational());
    }
}
