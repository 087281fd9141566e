//! Hydration Hero engine - the arcade frame loop

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use wellnest_logic::config::HydrationConfig;
use wellnest_logic::constants::hydration::{PLAYER_START_X, PLAYER_START_Y};
use wellnest_logic::hydration::{
    game_over_notification, pickup_notification, pointer_to_board, BoardPoint, BoardRect, Meter,
    PickupKind,
};
use wellnest_logic::notify::Notification;

use crate::components::*;
use crate::systems::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    NotStarted,
    Running,
    GameOver,
}

/// What happened during one call to [`HydrationGame::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub spawned: Vec<PickupKind>,
    pub caught: Vec<PickupKind>,
    pub despawned: usize,
    pub notifications: Vec<Notification>,
    pub game_over: bool,
}

/// Main Hydration Hero engine
pub struct HydrationGame {
    /// ECS world holding the falling pickups
    pub world: World,
    config: HydrationConfig,
    phase: GamePhase,
    meter: Meter,
    player: BoardPoint,
    timers: SpawnTimers,
    rng: StdRng,
    frames: u64,
}

impl HydrationGame {
    /// Create an idle game. A seed makes spawn columns and hazard picks
    /// reproducible.
    pub fn new(config: HydrationConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            world: World::new(),
            meter: Meter::full(&config),
            config,
            phase: GamePhase::NotStarted,
            player: BoardPoint::new(PLAYER_START_X, PLAYER_START_Y),
            timers: SpawnTimers::default(),
            rng,
            frames: 0,
        }
    }

    /// Reset score, hydration, player and board, and begin running.
    pub fn start(&mut self, now_ms: u64) -> Notification {
        self.world.clear();
        self.meter = Meter::full(&self.config);
        self.player = BoardPoint::new(PLAYER_START_X, PLAYER_START_Y);
        self.timers = SpawnTimers::starting_at(now_ms);
        self.frames = 0;
        self.phase = GamePhase::Running;
        log::info!("Hydration Hero started at {now_ms}ms");
        Notification::info("Game Started!", "Collect water drops to stay hydrated!")
    }

    /// Advance one frame. Does nothing unless the game is running.
    pub fn update(&mut self, now_ms: u64) -> FrameReport {
        let mut report = FrameReport::default();
        if self.phase != GamePhase::Running {
            return report;
        }
        self.frames += 1;

        self.meter.decay(&self.config);
        if self.meter.is_depleted() {
            self.finish(&mut report);
            return report;
        }

        report.spawned = spawn_system(
            &mut self.world,
            &mut self.timers,
            now_ms,
            &mut self.rng,
            &self.config,
        );
        report.despawned = falling_system(&mut self.world);
        report.caught = collision_system(&mut self.world, self.player, &self.config);

        for kind in &report.caught {
            self.meter.apply_pickup(*kind, &self.config);
            report.notifications.push(pickup_notification(*kind, &self.config));
        }

        if self.meter.is_depleted() {
            self.finish(&mut report);
        }
        report
    }

    fn finish(&mut self, report: &mut FrameReport) {
        self.phase = GamePhase::GameOver;
        report.game_over = true;
        report.notifications.push(game_over_notification(self.meter.score));
        log::info!(
            "Hydration Hero over after {} frames, score {}",
            self.frames,
            self.meter.score
        );
    }

    /// Follow a pointer or touch inside `rect`. Ignored unless running.
    pub fn move_pointer(&mut self, client_x: f32, client_y: f32, rect: BoardRect) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        match pointer_to_board(client_x, client_y, rect) {
            Some(point) => {
                self.player = point;
                true
            }
            None => false,
        }
    }

    /// Place a pickup directly on the board.
    pub fn spawn_at(&mut self, kind: PickupKind, x: f32, y: f32) -> Entity {
        spawn_pickup(&mut self.world, &mut self.timers, kind, x, y, &self.config)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn score(&self) -> u32 {
        self.meter.score
    }

    pub fn hydration(&self) -> f32 {
        self.meter.hydration
    }

    pub fn player(&self) -> BoardPoint {
        self.player
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn config(&self) -> &HydrationConfig {
        &self.config
    }

    /// Count pickups currently on the board
    pub fn pickup_count(&self) -> usize {
        self.world.query::<&Pickup>().iter().count()
    }

    /// Count hazards currently on the board
    pub fn hazard_count(&self) -> usize {
        self.world
            .query::<&Pickup>()
            .iter()
            .filter(|(_, pickup)| pickup.kind.is_hazard())
            .count()
    }
}

impl Default for HydrationGame {
    fn default() -> Self {
        Self::new(HydrationConfig::default(), None)
    }
}
