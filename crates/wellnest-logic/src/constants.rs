//! Fixed values shared by the tracker, the games and the storage layer.
//!
//! Plain constants with no storage dependency. Both the engine crate and
//! the headless harness use these.

/// Keys in the local key-value storage.
pub mod storage_keys {
    pub const CYCLE_DATA: &str = "menstrualCycleData";
    pub const POINTS: &str = "menstrualTrackerPoints";
    pub const LOGGED_IN: &str = "isLoggedIn";
    /// Value stored under [`LOGGED_IN`] while a session is active.
    pub const LOGGED_IN_VALUE: &str = "true";
}

/// Points awarded per tracker action.
pub mod points {
    pub const START_CYCLE: u32 = 10;
    pub const END_CYCLE: u32 = 15;
    pub const LOG_SYMPTOM: u32 = 5;
    pub const SET_FLOW: u32 = 3;
}

/// Cycle tracking defaults.
pub mod cycle {
    /// Average cycle length assumed until two cycles have been tracked.
    pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
    /// Symptom entries with this prefix are free-text notes, not symptoms.
    pub const NOTES_PREFIX: &str = "Notes added: ";
    /// Characters of note text kept in the symptom entry.
    pub const NOTES_EXCERPT_CHARS: usize = 20;
    /// How many symptoms the statistics view ranks.
    pub const TOP_SYMPTOMS: usize = 5;
    /// Offset (minutes east of UTC) applied to timestamps in old documents
    /// before they are cut to a calendar date.
    pub const LEGACY_UTC_OFFSET_MINUTES: i32 = 0;
    /// Largest offset any real time zone uses.
    pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;
}

/// Hydration Hero tuning. Positions are percentages of the board.
pub mod hydration {
    pub const MAX_HYDRATION: f32 = 100.0;
    pub const DECAY_PER_FRAME: f32 = 0.2;
    pub const DROP_INTERVAL_MS: u64 = 1500;
    pub const HAZARD_INTERVAL_MS: u64 = 2500;
    pub const DROP_SPEED: f32 = 1.0;
    pub const HAZARD_SPEED: f32 = 0.8;
    pub const PLAYER_RADIUS: f32 = 5.0;
    pub const ITEM_RADIUS: f32 = 3.0;
    pub const DROP_SCORE: u32 = 10;
    pub const DROP_HYDRATION: f32 = 5.0;
    pub const HAZARD_PENALTY: f32 = 15.0;
    /// Spawn and pointer positions are kept inside this margin.
    pub const EDGE_MARGIN: f32 = 5.0;
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 80.0;
}

/// Mini-game sizes.
pub mod games {
    pub const FOOD_SORT_ROUNDS: usize = 10;
    pub const MAZE_WIDTH: usize = 15;
    pub const MAZE_HEIGHT: usize = 15;
    pub const MAZE_MINDFULNESS_SPOTS: usize = 5;
    pub const MAZE_START_STRESS: u32 = 50;
    pub const MAZE_MAX_STRESS: u32 = 100;
    pub const MAZE_WALL_STRESS: u32 = 5;
    pub const MAZE_STEP_STRESS: u32 = 1;
    pub const MAZE_MINDFULNESS_RELIEF: u32 = 15;
}

/// Dashboard goals.
pub mod goals {
    pub const DAILY_STEPS: u32 = 10_000;
    pub const DAILY_WATER_GLASSES: u32 = 8;
}
