//! Chain Snake - a terminal snake game with a color-matching chain score.
//!
//! The engine (grid, movement, item placement, chain scoring, tick loop) is
//! independent of the terminal; `term` is one `Renderer` implementation.

pub mod chain;
pub mod config;
pub mod error;
pub mod game;
pub mod grade;
pub mod input;
pub mod placement;
pub mod snake;
pub mod state;
pub mod term;
pub mod tile;

pub type GridInt = u16;
pub type Coords = (u16, u16);
