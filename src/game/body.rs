use std::collections::{HashSet, VecDeque};

use anyhow::{Result, ensure};

use super::direction::Direction;
use super::grid::Position;

/// Whether the next move keeps the tail in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Growth {
    #[default]
    Idle,
    /// Food was eaten; the next move adds a segment instead of dropping the tail
    Pending,
}

/// The snake's occupied cells, head first
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    cells: VecDeque<Position>,
    direction: Direction,
    growth: Growth,
}

impl Body {
    /// Create a straight body with the head at `head`, trailing opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let cells = (0..length.max(1) as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();

        Self {
            cells,
            direction,
            growth: Growth::Idle,
        }
    }

    /// Build a body from explicit cells, head first.
    ///
    /// The cells must be non-empty, pairwise distinct and edge-connected.
    pub fn from_cells(cells: Vec<Position>, direction: Direction) -> Result<Self> {
        ensure!(!cells.is_empty(), "a body needs at least one cell");

        let unique: HashSet<_> = cells.iter().collect();
        ensure!(
            unique.len() == cells.len(),
            "body cells must be distinct: {cells:?}"
        );

        if let Some(pair) = cells.windows(2).find(|w| !w[0].is_adjacent(w[1])) {
            anyhow::bail!("body cells {:?} and {:?} are not adjacent", pair[0], pair[1]);
        }

        Ok(Self {
            cells: cells.into(),
            direction,
            growth: Growth::Idle,
        })
    }

    pub fn head(&self) -> Position {
        self.cells[0]
    }

    pub fn tail(&self) -> Position {
        self.cells[self.cells.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true for a body built through `new` or `from_cells`
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Current direction of travel
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn growth(&self) -> Growth {
        self.growth
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().copied()
    }

    /// Reversal filter: a body longer than one cell may not turn straight back into its neck
    pub fn can_turn(&self, direction: Direction) -> bool {
        self.len() == 1 || !self.direction.is_opposite(direction)
    }

    /// Prepend the next head in `direction`. Drops the tail unless growth is pending,
    /// in which case the pending state is consumed instead.
    pub fn advance(&mut self, direction: Direction) {
        self.direction = direction;
        let new_head = self.head().moved_in_direction(direction);
        self.cells.push_front(new_head);

        match self.growth {
            Growth::Pending => self.growth = Growth::Idle,
            Growth::Idle => {
                self.cells.pop_back();
            }
        }
    }

    /// Request one extra segment on the next move
    pub fn grow(&mut self) {
        self.growth = Growth::Pending;
    }

    pub fn occupied_set(&self) -> HashSet<Position> {
        self.cells.iter().copied().collect()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.cells.iter().skip(1).any(|&cell| cell == pos)
    }

    pub fn head_hits_body(&self) -> bool {
        self.collides_with_body(self.head())
    }
}
