//! Pure rules of the Hydration Hero arcade game.
//!
//! Per-frame decay, pickup effects, circular collision and pointer mapping.
//! The entity bookkeeping and the frame loop live in the engine crate.

use serde::{Deserialize, Serialize};

use crate::config::HydrationConfig;
use crate::constants::hydration::EDGE_MARGIN;
use crate::notify::Notification;

/// Something falling down the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    WaterDrop,
    Soda,
    Coffee,
}

impl PickupKind {
    pub const HAZARDS: [PickupKind; 2] = [PickupKind::Soda, PickupKind::Coffee];

    pub fn is_hazard(self) -> bool {
        !matches!(self, PickupKind::WaterDrop)
    }

    pub fn label(self) -> &'static str {
        match self {
            PickupKind::WaterDrop => "Water",
            PickupKind::Soda => "Soda",
            PickupKind::Coffee => "Coffee",
        }
    }

    /// Board-height percentage travelled per frame.
    pub fn fall_speed(self, config: &HydrationConfig) -> f32 {
        if self.is_hazard() {
            config.hazard_speed
        } else {
            config.drop_speed
        }
    }
}

/// A point on the board, both axes in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardPoint {
    pub x: f32,
    pub y: f32,
}

impl BoardPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Screen-space rectangle of the board, as reported by the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Map pointer/touch coordinates into board percentages, kept inside the
/// edge margin. `None` for a degenerate rectangle.
pub fn pointer_to_board(client_x: f32, client_y: f32, rect: BoardRect) -> Option<BoardPoint> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let x = (client_x - rect.left) / rect.width * 100.0;
    let y = (client_y - rect.top) / rect.height * 100.0;
    Some(BoardPoint {
        x: x.clamp(EDGE_MARGIN, 100.0 - EDGE_MARGIN),
        y: y.clamp(EDGE_MARGIN, 100.0 - EDGE_MARGIN),
    })
}

/// Score and hydration meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Meter {
    pub score: u32,
    pub hydration: f32,
}

impl Meter {
    pub fn full(config: &HydrationConfig) -> Self {
        Self {
            score: 0,
            hydration: config.max_hydration,
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.hydration <= 0.0
    }

    /// Apply one frame of decay, floored at zero.
    pub fn decay(&mut self, config: &HydrationConfig) {
        self.hydration = (self.hydration - config.decay_per_frame).max(0.0);
    }

    /// Apply the effect of catching `kind`.
    pub fn apply_pickup(&mut self, kind: PickupKind, config: &HydrationConfig) {
        if kind.is_hazard() {
            self.hydration = (self.hydration - config.hazard_penalty).max(0.0);
        } else {
            self.score = self.score.saturating_add(config.drop_score);
            self.hydration = (self.hydration + config.drop_hydration).min(config.max_hydration);
        }
    }
}

/// Whether an item at `item` touches the player at `player`.
pub fn collides(player: BoardPoint, item: BoardPoint, config: &HydrationConfig) -> bool {
    player.distance(&item) < config.player_radius + config.item_radius
}

/// Feedback shown when the player catches `kind`.
pub fn pickup_notification(kind: PickupKind, config: &HydrationConfig) -> Notification {
    if kind.is_hazard() {
        Notification::destructive("Oops!", format!("{} decreases hydration!", kind.label()))
    } else {
        Notification::info(
            format!("+{} points", config.drop_score),
            "Hydration increased!",
        )
    }
}

pub fn game_over_notification(score: u32) -> Notification {
    Notification::destructive(
        "Game Over!",
        format!("You're dehydrated! Final score: {score}"),
    )
}
