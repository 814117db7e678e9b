use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::grid::{Grid, Position};

/// Largest grid that still fits a terminal
pub const MAX_GRID_SIZE: usize = 256;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Milliseconds between simulation ticks
    pub tick_interval_ms: u64,
    /// Milliseconds between rendered frames
    pub render_interval_ms: u64,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Seed for food placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            tick_interval_ms: 150,
            render_interval_ms: 33,
            initial_snake_length: 3,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Read a JSON config file. Missing fields fall back to their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_size >= 4,
            "grid size must be at least 4, got {}",
            self.grid_size
        );
        ensure!(
            self.grid_size <= MAX_GRID_SIZE,
            "grid size must be at most {MAX_GRID_SIZE}, got {}",
            self.grid_size
        );
        ensure!(self.tick_interval_ms > 0, "tick interval must be positive");
        ensure!(self.render_interval_ms > 0, "render interval must be positive");
        ensure!(
            self.initial_snake_length >= 1,
            "initial snake length must be at least 1"
        );
        ensure!(
            self.initial_snake_length <= self.grid_size / 4 + 1,
            "initial snake length {} does not fit a grid of size {}",
            self.initial_snake_length,
            self.grid_size
        );
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_size)
    }

    /// Head of the starting body: a quarter across, halfway down
    pub fn initial_head(&self) -> Position {
        let grid = self.grid();
        Position::new(grid.side() / 4, grid.side() / 2)
    }

    pub fn initial_direction(&self) -> Direction {
        Direction::Right
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms)
    }
}
