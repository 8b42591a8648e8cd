//! Hit regions and the hit-test function.

use crate::hover::PointerSample;
use crate::{Rect, BACKSPACE_ID, SPEAKER_ID};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a selectable control.
///
/// Backspace and speaker are first-class controls that live outside the key
/// grid; every other target is a key of the visible layout, named by its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetId {
    /// Delete the last sentence token.
    Backspace,
    /// Speak the whole sentence.
    Speaker,
    /// A key of the current layout.
    Key(String),
}

impl TargetId {
    /// Create a key target.
    pub fn key(id: impl Into<String>) -> Self {
        TargetId::Key(id.into())
    }

    /// Region class used for hit precedence.
    pub fn class(&self) -> RegionClass {
        match self {
            TargetId::Backspace => RegionClass::Backspace,
            TargetId::Speaker => RegionClass::Speaker,
            TargetId::Key(_) => RegionClass::Key,
        }
    }

    /// Key id, if this target is a key.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            TargetId::Key(id) => Some(id),
            _ => None,
        }
    }

    /// Check if this is one of the fixed action controls.
    pub fn is_control(&self) -> bool {
        !matches!(self, TargetId::Key(_))
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetId::Backspace => f.write_str(BACKSPACE_ID),
            TargetId::Speaker => f.write_str(SPEAKER_ID),
            TargetId::Key(id) => f.write_str(id),
        }
    }
}

/// Class of a hit region, in precedence order.
///
/// When regions overlap (a degenerate layout), the lower class wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RegionClass {
    Backspace,
    Speaker,
    Key,
}

impl RegionClass {
    /// All classes, highest precedence first.
    pub const PRECEDENCE: [RegionClass; 3] =
        [RegionClass::Backspace, RegionClass::Speaker, RegionClass::Key];
}

/// A rendered, selectable rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRegion {
    /// Control this region selects.
    pub id: TargetId,
    /// Bounding box in viewport coordinates.
    pub bounds: Rect,
}

impl HitRegion {
    pub fn new(id: TargetId, bounds: Rect) -> Self {
        Self { id, bounds }
    }

    /// Region for a layout key.
    pub fn key(id: impl Into<String>, bounds: Rect) -> Self {
        Self::new(TargetId::key(id), bounds)
    }

    /// Region for the backspace control.
    pub fn backspace(bounds: Rect) -> Self {
        Self::new(TargetId::Backspace, bounds)
    }

    /// Region for the speaker control.
    pub fn speaker(bounds: Rect) -> Self {
        Self::new(TargetId::Speaker, bounds)
    }

    pub fn class(&self) -> RegionClass {
        self.id.class()
    }
}

/// Resolve the single region under the pointer.
///
/// Precedence: backspace, then speaker, then keys in rendering order; the
/// first containing region of the highest class wins. Returns `None` when
/// no region contains the sample.
pub fn hit_test(sample: &PointerSample, regions: &[HitRegion]) -> Option<TargetId> {
    RegionClass::PRECEDENCE.iter().find_map(|class| {
        regions
            .iter()
            .filter(|r| r.class() == *class)
            .find(|r| r.bounds.contains(sample.pos))
            .map(|r| r.id.clone())
    })
}
