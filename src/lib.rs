//! Grid Snake - a discrete-time snake simulation with a terminal front end
//!
//! This library provides:
//! - The simulation core: body, food, collisions, scoring (game module)
//! - An injectable tick source (clock module)
//! - Terminal input mapping and rendering (input, render modules)
//! - The interactive keyboard mode (modes module)

pub mod clock;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
