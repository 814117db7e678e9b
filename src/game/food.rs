use std::collections::HashSet;

use rand::Rng;
use rand::seq::IteratorRandom;

use super::grid::{Grid, Position};

/// The single piece of food on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    position: Position,
}

impl Food {
    pub fn at(position: Position) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Pick a cell uniformly from the free cells of `grid`.
    ///
    /// Samples the complement of `occupied` directly, so it terminates at any occupancy.
    /// Returns `None` when every cell is occupied.
    pub fn randomize<R: Rng + ?Sized>(
        occupied: &HashSet<Position>,
        grid: Grid,
        rng: &mut R,
    ) -> Option<Self> {
        grid.cells()
            .filter(|cell| !occupied.contains(cell))
            .choose(rng)
            .map(Self::at)
    }
}
