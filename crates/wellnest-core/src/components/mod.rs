//! Component definitions for the Hydration Hero board.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod arcade;

pub use arcade::*;
