use serde::{Deserialize, Serialize};

/// Pointer button that produced a click or drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pending user gesture serviced by the continuous interaction loop.
///
/// The slot holds at most one event; new gestures only land in it once the
/// previous one was serviced and reset to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderEvent {
    #[default]
    None,
    Click,
    DragLeft,
    DragRight,
    Scroll,
    MoveToDefault,
}

impl RenderEvent {
    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

/// Horizontal drag direction derived from the pointer delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragDirection {
    Left,
    Right,
}

impl DragDirection {
    /// Returns `None` for purely vertical drags.
    #[must_use]
    pub fn from_delta(delta_x: i32) -> Option<Self> {
        match delta_x {
            dx if dx < 0 => Some(Self::Left),
            dx if dx > 0 => Some(Self::Right),
            _ => None,
        }
    }

    #[must_use]
    pub fn render_event(self) -> RenderEvent {
        match self {
            Self::Left => RenderEvent::DragLeft,
            Self::Right => RenderEvent::DragRight,
        }
    }
}

/// Rotating index over the four corner camera positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CornerIndex(u8);

impl CornerIndex {
    pub const COUNT: u8 = 4;

    #[must_use]
    pub fn new(index: u8) -> Self {
        Self(index % Self::COUNT)
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Leftward drags advance the corner.
    #[must_use]
    pub fn advanced(self) -> Self {
        Self((self.0 + 1) % Self::COUNT)
    }

    /// Rightward drags retreat the corner.
    #[must_use]
    pub fn retreated(self) -> Self {
        Self((self.0 + Self::COUNT - 1) % Self::COUNT)
    }

    #[must_use]
    pub fn after_drag(self, direction: DragDirection) -> Self {
        match direction {
            DragDirection::Left => self.advanced(),
            DragDirection::Right => self.retreated(),
        }
    }
}
