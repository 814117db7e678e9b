//! Core simulation for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal front end drives it through [`Simulation::request_direction`],
//! [`Simulation::update`] and [`Simulation::snapshot`].

pub mod body;
pub mod config;
pub mod direction;
pub mod food;
pub mod grid;
pub mod simulation;

// Re-export commonly used types
pub use body::{Body, Growth};
pub use config::GameConfig;
pub use direction::Direction;
pub use food::Food;
pub use grid::{Grid, Position};
pub use simulation::{EndReason, Simulation, Snapshot, Status, TickReport};
