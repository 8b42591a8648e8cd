//! The layout catalog and layout derivation.

use crate::error::{LayoutError, LayoutResult};
use crate::{
    builtin, ids, KeySpec, KeyType, Layout, SentenceBuffer, MAX_SUGGESTIONS, SUGGESTION_COLOR,
    SUGGESTION_FIRST_SLOT,
};
use anyhow::Context;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// On-disk catalog format.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    layouts: Vec<Layout>,
}

/// Pick the rule-based layout id for a list of normalized words.
///
/// First match wins:
/// 1. last three words `i like to play`, or last two `to play`
/// 2. last two words `i like` or `i love`
/// 3. last word `i`
/// 4. anything else
pub fn derive_rule(words: &[String]) -> &'static str {
    let tail = |n: usize| words[words.len().saturating_sub(n)..].join(" ");
    let (one, two, three) = (tail(1), tail(2), tail(3));

    if three == "i like to play" || two == "to play" {
        ids::AFTER_I_LIKE_TO_PLAY
    } else if two == "i like" || two == "i love" {
        ids::AFTER_I_LIKE
    } else if one == "i" {
        ids::AFTER_I
    } else {
        ids::DEFAULT
    }
}

/// Validated set of named layouts.
///
/// Always contains `default` and the three derived layouts, so derivation
/// never fails.
#[derive(Debug, Clone)]
pub struct LayoutCatalog {
    default: Layout,
    layouts: BTreeMap<String, Layout>,
}

impl Default for LayoutCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LayoutCatalog {
    /// The built-in vocabulary.
    pub fn builtin() -> Self {
        let mut layouts: BTreeMap<String, Layout> = builtin::layouts()
            .into_iter()
            .map(|l| (l.id.clone(), l))
            .collect();
        let default = layouts
            .remove(ids::DEFAULT)
            .unwrap_or_else(|| Layout::new(ids::DEFAULT, Vec::new()));
        Self { default, layouts }
    }

    /// Build a catalog from layouts, validating it.
    pub fn from_layouts(layouts: Vec<Layout>) -> LayoutResult<Self> {
        let mut by_id = BTreeMap::new();
        for layout in layouts {
            validate_layout(&layout)?;
            if by_id.contains_key(&layout.id) {
                return Err(LayoutError::DuplicateLayout(layout.id));
            }
            by_id.insert(layout.id.clone(), layout);
        }

        for required in ids::REQUIRED {
            if !by_id.contains_key(required) {
                return Err(LayoutError::MissingLayout(required.to_string()));
            }
        }

        let default = by_id
            .remove(ids::DEFAULT)
            .ok_or_else(|| LayoutError::MissingLayout(ids::DEFAULT.to_string()))?;

        tracing::debug!(layouts = by_id.len() + 1, "layout catalog built");
        Ok(Self {
            default,
            layouts: by_id,
        })
    }

    /// Parse a catalog from YAML.
    pub fn from_yaml(yaml: &str) -> LayoutResult<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::from_layouts(file.layouts)
    }

    /// Load a catalog from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout catalog: {}", path.display()))?;
        let catalog = Self::from_yaml(&content)
            .with_context(|| format!("Invalid layout catalog: {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded layout catalog");
        Ok(catalog)
    }

    pub fn layout_by_id(&self, id: &str) -> Option<&Layout> {
        if id == ids::DEFAULT {
            Some(&self.default)
        } else {
            self.layouts.get(id)
        }
    }

    pub fn default_layout(&self) -> &Layout {
        &self.default
    }

    /// All layout ids, `default` first.
    pub fn layout_ids(&self) -> Vec<&str> {
        std::iter::once(self.default.id.as_str())
            .chain(self.layouts.keys().map(String::as_str))
            .collect()
    }

    /// Layout chosen by the trailing words of `buffer`.
    pub fn derive_rule_based(&self, buffer: &SentenceBuffer) -> &Layout {
        let id = derive_rule(&buffer.words());
        self.layout_by_id(id).unwrap_or(&self.default)
    }

    /// The default layout with slots `6..24` replaced by suggestions.
    ///
    /// Slots before the first suggestion slot are never touched; slots past
    /// the last suggestion keep their default key. Suggestions beyond
    /// [`MAX_SUGGESTIONS`] or past the end of the layout are dropped.
    pub fn derive_suggestion_layout(&self, suggestions: &[String]) -> Layout {
        let mut keys = self.default.keys.clone();
        let slots = keys.iter_mut().skip(SUGGESTION_FIRST_SLOT);
        for (n, (slot, text)) in slots
            .zip(suggestions.iter().take(MAX_SUGGESTIONS))
            .enumerate()
        {
            *slot = KeySpec::new(format!("suggestion_{n}"), text.clone(), KeyType::Suggestion)
                .with_color(SUGGESTION_COLOR);
        }
        Layout::new(ids::SUGGESTIONS, keys)
    }
}

fn validate_layout(layout: &Layout) -> LayoutResult<()> {
    if layout.is_empty() {
        return Err(LayoutError::EmptyLayout(layout.id.clone()));
    }

    let mut seen = HashSet::new();
    for key in &layout.keys {
        let empty = |field| LayoutError::EmptyField {
            layout: layout.id.clone(),
            key: key.id.clone(),
            field,
        };
        if key.id.trim().is_empty() {
            return Err(empty("id"));
        }
        if key.label.trim().is_empty() {
            return Err(empty("label"));
        }
        if key.dwell_ms == Some(0) {
            return Err(LayoutError::ZeroDwell {
                layout: layout.id.clone(),
                key: key.id.clone(),
            });
        }
        if !seen.insert(key.id.as_str()) {
            return Err(LayoutError::DuplicateKey {
                layout: layout.id.clone(),
                key: key.id.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn buffer(tokens: &[&str]) -> SentenceBuffer {
        let mut b = SentenceBuffer::new();
        for t in tokens {
            b.append(*t);
        }
        b
    }

    fn derived(tokens: &[&str]) -> String {
        LayoutCatalog::builtin()
            .derive_rule_based(&buffer(tokens))
            .id
            .clone()
    }

    #[test]
    fn builtin_layouts_are_complete() {
        let catalog = LayoutCatalog::builtin();
        assert_eq!(
            catalog.layout_ids(),
            vec!["default", "afterI", "afterILike", "afterILikeToPlay", "vocab"]
        );
        for id in catalog.layout_ids() {
            let layout = catalog.layout_by_id(id).unwrap();
            assert_eq!(layout.len(), 24, "{id}");
            validate_layout(layout).unwrap();
        }
        assert_eq!(catalog.default_layout().keys[19].label, "don't");
    }

    #[test]
    fn rule_based_derivation() {
        assert_eq!(derived(&[]), "default");
        assert_eq!(derived(&["I"]), "afterI");
        assert_eq!(derived(&["i", "like"]), "afterILike");
        assert_eq!(derived(&["I", "LOVE"]), "afterILike");
        assert_eq!(derived(&["i", "like", "to play"]), "afterILikeToPlay");
        assert_eq!(derived(&["you", "to", "play"]), "afterILikeToPlay");
        assert_eq!(derived(&["you", "like"]), "default");
        assert_eq!(derived(&["i", "eat"]), "default");
        assert_eq!(derived(&["  i  "]), "afterI");
    }

    #[test]
    fn suggestion_layout_splices_slots() {
        let catalog = LayoutCatalog::builtin();
        let suggestions: Vec<String> = ["pizza", "ice cream", "pasta"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let layout = catalog.derive_suggestion_layout(&suggestions);
        let default = catalog.default_layout();

        assert_eq!(layout.id, "suggestions");
        assert_eq!(layout.keys[..6], default.keys[..6]);
        assert_eq!(layout.keys[6].id, "suggestion_0");
        assert_eq!(layout.keys[7].label, "ice cream");
        assert_eq!(layout.keys[8].key_type, KeyType::Suggestion);
        assert_eq!(layout.keys[8].color, "#e3f2fd");
        assert_eq!(layout.keys[9..], default.keys[9..]);
    }

    #[test]
    fn yaml_catalog_round_trip() {
        let yaml = r#"
layouts:
  - id: default
    keys:
      - { id: i, label: i, type: pronoun }
      - { id: clear, label: clear, type: action }
  - id: afterI
    keys: [{ id: am, label: am, type: verb }]
  - id: afterILike
    keys: [{ id: toeat, label: to eat, type: verb }]
  - id: afterILikeToPlay
    keys: [{ id: ball, label: ball, type: noun }]
"#;
        let catalog = LayoutCatalog::from_yaml(yaml).unwrap();
        assert_eq!(catalog.default_layout().len(), 2);
        assert!(catalog.layout_by_id("vocab").is_none());
        assert_eq!(catalog.derive_rule_based(&buffer(&["i"])).keys[0].id, "am");
    }

    #[test]
    fn yaml_catalog_validation() {
        let missing = "layouts:\n  - id: default\n    keys: [{ id: i, label: i, type: pronoun }]\n";
        assert!(matches!(
            LayoutCatalog::from_yaml(missing),
            Err(LayoutError::MissingLayout(id)) if id == "afterI"
        ));

        let mut layouts = builtin::layouts();
        layouts[1].keys[1].id = "would".into();
        assert!(matches!(
            LayoutCatalog::from_layouts(layouts),
            Err(LayoutError::DuplicateKey { .. })
        ));

        let mut layouts = builtin::layouts();
        layouts[0].keys[0].label = " ".into();
        assert!(matches!(
            LayoutCatalog::from_layouts(layouts),
            Err(LayoutError::EmptyField { field: "label", .. })
        ));

        let mut layouts = builtin::layouts();
        layouts.push(layouts[4].clone());
        assert!(matches!(
            LayoutCatalog::from_layouts(layouts),
            Err(LayoutError::DuplicateLayout(_))
        ));

        assert!(matches!(
            LayoutCatalog::from_yaml("layouts: 3"),
            Err(LayoutError::Parse(_))
        ));
    }

    proptest! {
        #[test]
        fn suggestions_never_touch_first_slots(
            suggestions in prop::collection::vec("[a-z]{1,12}", 0..30),
        ) {
            let catalog = LayoutCatalog::builtin();
            let default = catalog.default_layout();
            let layout = catalog.derive_suggestion_layout(&suggestions);

            prop_assert_eq!(layout.len(), default.len());
            prop_assert_eq!(&layout.keys[..6], &default.keys[..6]);

            let replaced = layout
                .keys
                .iter()
                .filter(|k| k.key_type == KeyType::Suggestion)
                .count();
            prop_assert_eq!(replaced, suggestions.len().min(MAX_SUGGESTIONS));
        }
    }
}
