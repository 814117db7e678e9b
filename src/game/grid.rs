use super::direction::Direction;

/// A cell coordinate. May lie outside the grid right after a move into a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// True when the two cells share an edge
    pub fn is_adjacent(&self, other: Position) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Square playing field of `size` x `size` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: usize,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Side length as a coordinate bound. Saturates at `i32::MAX`, so no cell is ever lost.
    pub fn side(&self) -> i32 {
        i32::try_from(self.size).unwrap_or(i32::MAX)
    }

    /// Number of cells on the grid
    pub fn capacity(&self) -> usize {
        self.size.saturating_mul(self.size)
    }

    pub fn contains(&self, pos: Position) -> bool {
        let size = self.side();
        (0..size).contains(&pos.x) && (0..size).contains(&pos.y)
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let size = self.side();
        (0..size).flat_map(move |y| (0..size).map(move |x| Position::new(x, y)))
    }
}
