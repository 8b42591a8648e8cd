//! Raw input events from any source.

use crate::{TargetId, Vec2};
use serde::{Deserialize, Serialize};

/// Raw input event from any source.
///
/// Mouse, gaze and head trackers all produce pointer moves; switch hardware
/// produces `ActiveControl` instead. The first click of a session is the
/// user gesture that unlocks hover sounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawInput {
    // =========================================================================
    // POINTER
    // =========================================================================
    /// Pointer moved to a viewport position.
    PointerMoved { pos: Vec2 },

    /// Pointer button clicked (only used as the audio unlock gesture).
    PointerClicked { pos: Vec2 },

    /// Pointer left the viewport.
    PointerLeft,

    // =========================================================================
    // SWITCH
    // =========================================================================
    /// Switch hardware reports the control it is scanning, or none.
    ActiveControl { target: Option<TargetId> },
}

impl RawInput {
    /// Create a pointer move event.
    pub fn pointer_moved(x: f32, y: f32) -> Self {
        RawInput::PointerMoved {
            pos: Vec2::new(x, y),
        }
    }

    /// Create a click event.
    pub fn clicked(x: f32, y: f32) -> Self {
        RawInput::PointerClicked {
            pos: Vec2::new(x, y),
        }
    }

    /// Create a switch active-control event.
    pub fn active_control(target: Option<TargetId>) -> Self {
        RawInput::ActiveControl { target }
    }

    /// Check if this is a pointer event.
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            RawInput::PointerMoved { .. } | RawInput::PointerClicked { .. } | RawInput::PointerLeft
        )
    }

    /// Check if this is the user gesture that unlocks audio.
    pub fn is_unlock_gesture(&self) -> bool {
        matches!(self, RawInput::PointerClicked { .. })
    }
}
