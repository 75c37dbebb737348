use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell on the game grid.
///
/// `x` grows to the east and `y` grows to the south, matching the order rows
/// are written in a text layout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Move by a signed offset. Returns `None` if the result would leave the
    /// non-negative quadrant.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Position> {
        let x = u16::try_from(i32::from(self.x) + dx).ok()?;
        let y = u16::try_from(i32::from(self.y) + dy).ok()?;
        Some(Position { x, y })
    }

    /// Grid distance ignoring walls.
    pub fn manhattan(self, other: Position) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
