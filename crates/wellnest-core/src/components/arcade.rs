//! Components attached to falling pickups.

use serde::{Deserialize, Serialize};
use wellnest_logic::hydration::{BoardPoint, PickupKind};

/// Board position in percent of width/height.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn point(&self) -> BoardPoint {
        BoardPoint::new(self.x, self.y)
    }

    /// Past the bottom edge of the board.
    pub fn is_off_board(&self) -> bool {
        self.y >= 100.0
    }
}

/// Vertical speed, board-height percent per frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Falling {
    pub speed: f32,
}

/// What the player gets for catching this entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pickup {
    pub kind: PickupKind,
}

/// Monotonic spawn counter from `SpawnTimers::take_order`. Keeps catch
/// order stable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpawnOrder(pub u64);
