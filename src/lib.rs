//! **tiltmaze** generates the perfect mazes behind a gravity-flip ball game and
//! the level geometry a 2D physics engine needs to stage them.
//!
//! The maze is carved with a randomized depth-first backtracker over a
//! rectangular cell grid, then exported as the pair of boolean passage
//! matrices (vertical / horizontal) that wall placement works from.

pub mod cells;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grids;
pub mod level;
pub mod passages;
pub mod pathing;
pub mod units;
mod utils;
