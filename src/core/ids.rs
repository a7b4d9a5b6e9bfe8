use serde::{Deserialize, Serialize};

/// Identity of a pickable shape.
///
/// Identities double as picking colors: the renderer draws each pickable shape
/// with its id packed into RGB and reads the color back under the cursor.
/// `ObjectId::NONE` marks shapes that are never pickable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ObjectId(u32);

impl ObjectId {
    pub const NONE: Self = Self(0);

    /// Largest id representable in a 24-bit picking color.
    pub const MAX_PICKABLE: u32 = 0x00FF_FFFF;

    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn to_picking_rgba(self) -> [u8; 4] {
        let [_, red, green, blue] = (self.0 & Self::MAX_PICKABLE).to_be_bytes();
        [red, green, blue, u8::MAX]
    }

    /// Decodes a picking color. Fully transparent pixels were never covered
    /// by a pickable shape and decode to `NONE`.
    #[must_use]
    pub fn from_picking_rgba(rgba: [u8; 4]) -> Self {
        if rgba[3] == 0 {
            return Self::NONE;
        }
        Self(u32::from_be_bytes([0, rgba[0], rgba[1], rgba[2]]))
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out strictly increasing identities with a fixed stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: u32,
    stride: u32,
}

impl IdAllocator {
    #[must_use]
    pub fn new(first: u32, stride: u32) -> Self {
        Self {
            next: first.max(1),
            stride: stride.max(1),
        }
    }

    pub fn next_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next = self.next.saturating_add(self.stride);
        id
    }

    #[must_use]
    pub fn peek(self) -> ObjectId {
        ObjectId(self.next)
    }
}
