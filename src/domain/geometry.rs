//! Window geometry value object

/// Coordinate reported for a position that is not persisted
pub const UNKNOWN_POSITION: i32 = -1;

/// Window rectangle exchanged with the UI layer.
///
/// Only the size is persisted; geometry read back from settings always
/// carries `x = y = -1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowGeometry {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Geometry with an unknown position
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(UNKNOWN_POSITION, UNKNOWN_POSITION, width, height)
    }

    /// Persisted part of the geometry
    pub const fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub const fn has_position(&self) -> bool {
        self.x != UNKNOWN_POSITION || self.y != UNKNOWN_POSITION
    }
}
