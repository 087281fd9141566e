//! Puzzle mini-games with content loaded from bundled JSON data.

pub mod food_sort;
pub mod maze;
