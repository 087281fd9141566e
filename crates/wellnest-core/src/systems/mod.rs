//! Systems - logic that operates on components

mod collision;
mod falling;
mod spawn;

pub use collision::*;
pub use falling::*;
pub use spawn::*;
