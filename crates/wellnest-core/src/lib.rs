//! Wellnest Core - stateful services and games
//!
//! Binds the pure logic in `wellnest_logic` to storage, randomness and a
//! frame loop.
//!
//! # Architecture
//!
//! - **Tracker**: [`tracker::TrackerService`] owns the cycle record and
//!   points, persisting through a [`persistence::KeyValueStorage`]
//! - **Session**: [`session::SessionStore`] keeps the login flag
//! - **Hydration Hero**: an ECS board via `hecs`
//!   - **Components**: pure data on falling pickups (Position, Falling, Pickup)
//!   - **Systems**: spawn, falling and collision passes
//!   - **Engine**: [`engine::HydrationGame`] runs them once per frame
//! - **Games**: food sorting and the mindfulness maze
//!
//! # Example
//!
//! ```rust,no_run
//! use wellnest_core::prelude::*;
//!
//! let mut game = HydrationGame::default();
//! game.start(0);
//!
//! let mut now = 0;
//! while game.is_running() {
//!     now += 16; // ~60 FPS
//!     game.update(now);
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod games;
pub mod persistence;
pub mod session;
pub mod systems;
pub mod tracker;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{AppConfig, LoadPolicy};
    pub use crate::engine::{FrameReport, GamePhase, HydrationGame};
    pub use crate::persistence::{FileStorage, KeyValueStorage, MemoryStorage};
    pub use crate::session::SessionStore;
    pub use crate::tracker::TrackerService;
}
