use anyhow::{Context, Result, ensure};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    body::Body,
    config::GameConfig,
    direction::Direction,
    food::Food,
    grid::{Grid, Position},
};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Head left the grid
    Wall,
    /// Head ran into another segment
    SelfCollision,
    /// The body covers every cell, so no food can be placed. This is the win condition.
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// Terminal; a session never returns to `Running`
    Over(EndReason),
}

/// Read-only view handed to the presenter once per frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Head first
    pub body_cells: Vec<Position>,
    /// `None` only once the board is full
    pub food_cell: Option<Position>,
    pub score: u32,
    pub steps: u32,
    pub status: Status,
}

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub ate_food: bool,
    pub status: Status,
}

impl TickReport {
    pub fn terminated(&self) -> bool {
        matches!(self.status, Status::Over(_))
    }
}

/// One snake session: body, food, score and the tick state machine
#[derive(Debug, Clone)]
pub struct Simulation<R = StdRng> {
    grid: Grid,
    body: Body,
    food: Option<Food>,
    pending: Option<Direction>,
    score: u32,
    steps: u32,
    status: Status,
    rng: R,
}

impl Simulation<StdRng> {
    /// Start a session from `config`, seeding food placement from `config.seed` when set
    pub fn new(config: &GameConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    pub fn with_rng(config: &GameConfig, mut rng: R) -> Result<Self> {
        config.validate()?;

        let grid = config.grid();
        let body = Body::new(
            config.initial_head(),
            config.initial_direction(),
            config.initial_snake_length,
        );
        let food = Food::randomize(&body.occupied_set(), grid, &mut rng)
            .context("No free cell for the initial food")?;

        Ok(Self::assemble(grid, body, food, rng))
    }

    /// Start a session from an explicit layout.
    ///
    /// The body must lie inside the grid and the food must be a free cell.
    pub fn from_parts(grid: Grid, body: Body, food: Position, rng: R) -> Result<Self> {
        ensure!(
            body.cells().all(|cell| grid.contains(cell)),
            "body does not fit a grid of size {}",
            grid.size()
        );
        ensure!(grid.contains(food), "food {food:?} is outside the grid");
        ensure!(!body.contains(food), "food {food:?} overlaps the body");

        Ok(Self::assemble(grid, body, Food::at(food), rng))
    }

    fn assemble(grid: Grid, body: Body, food: Food, rng: R) -> Self {
        Self {
            grid,
            body,
            food: Some(food),
            pending: None,
            score: 0,
            steps: 0,
            status: Status::Running,
            rng,
        }
    }

    /// Queue a turn for the next tick.
    ///
    /// A reversal into the neck is ignored and leaves any earlier accepted turn queued.
    /// Returns whether the request was accepted.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if !self.is_running() || !self.body.can_turn(direction) {
            return false;
        }
        self.pending = Some(direction);
        true
    }

    /// Like [`Simulation::request_direction`], for a raw offset vector.
    /// Offsets that are not cardinal unit vectors are ignored.
    pub fn request_offset(&mut self, dx: i32, dy: i32) -> bool {
        Direction::from_delta(dx, dy).is_some_and(|direction| self.request_direction(direction))
    }

    /// Advance one tick. A no-op once the session is over.
    pub fn update(&mut self) -> TickReport {
        if !self.is_running() {
            return TickReport {
                ate_food: false,
                status: self.status,
            };
        }

        let direction = self
            .pending
            .take()
            .filter(|&d| self.body.can_turn(d))
            .unwrap_or(self.body.direction());
        self.body.advance(direction);
        self.steps += 1;

        let head = self.body.head();
        let ate_food = self.food.is_some_and(|food| food.position() == head);

        if ate_food {
            // placement sees the body before the deferred growth lands
            self.food = Food::randomize(&self.body.occupied_set(), self.grid, &mut self.rng);
            self.body.grow();
            self.score += 1;
            debug!("Ate food at {head:?}, score {}", self.score);

            if self.food.is_none() {
                self.finish(EndReason::BoardFull);
            }
        }

        if !self.grid.contains(head) {
            self.finish(EndReason::Wall);
        } else if self.body.head_hits_body() {
            self.finish(EndReason::SelfCollision);
        }

        TickReport {
            ate_food,
            status: self.status,
        }
    }

    fn finish(&mut self, reason: EndReason) {
        if self.is_running() {
            info!(
                "Session over after {} steps: {reason:?}, score {}",
                self.steps, self.score
            );
            self.status = Status::Over(reason);
            self.pending = None;
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            body_cells: self.body.cells().collect(),
            food_cell: self.food_position(),
            score: self.score,
            steps: self.steps,
            status: self.status,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn food_position(&self) -> Option<Position> {
        self.food.map(|food| food.position())
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn body(cells: &[(i32, i32)], direction: Direction) -> Body {
        Body::from_cells(cells.iter().map(|&c| c.into()).collect(), direction).unwrap()
    }

    fn sim(
        size: usize,
        cells: &[(i32, i32)],
        direction: Direction,
        food: (i32, i32),
    ) -> Simulation {
        Simulation::from_parts(
            Grid::new(size),
            body(cells, direction),
            food.into(),
            StdRng::seed_from_u64(3),
        )
        .unwrap()
    }

    fn cells(snapshot: &Snapshot) -> Vec<(i32, i32)> {
        snapshot.body_cells.iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn test_new_session() {
        let sim = Simulation::new(&GameConfig::default()).unwrap();
        let snapshot = sim.snapshot();

        assert_eq!(cells(&snapshot), vec![(5, 10), (4, 10), (3, 10)]);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.steps, 0);
        assert_eq!(snapshot.status, Status::Running);

        let food = snapshot.food_cell.unwrap();
        assert!(sim.grid().contains(food));
        assert!(!snapshot.body_cells.contains(&food));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(Simulation::new(&GameConfig::new(2)).is_err());
    }

    #[test]
    fn test_from_parts_validation() {
        let grid = Grid::new(10);
        let rng = || StdRng::seed_from_u64(0);
        let straight = || body(&[(5, 5), (4, 5)], Direction::Right);

        assert!(Simulation::from_parts(grid, straight(), (4, 5).into(), rng()).is_err());
        assert!(Simulation::from_parts(grid, straight(), (10, 5).into(), rng()).is_err());
        let outside = body(&[(0, 0), (-1, 0)], Direction::Right);
        assert!(Simulation::from_parts(grid, outside, (5, 5).into(), rng()).is_err());
    }

    #[test]
    fn test_plain_move() {
        let mut sim = sim(20, &[(5, 10), (4, 10), (3, 10)], Direction::Right, (0, 0));

        let report = sim.update();

        assert!(!report.ate_food);
        assert!(!report.terminated());
        let snapshot = sim.snapshot();
        assert_eq!(cells(&snapshot), vec![(6, 10), (5, 10), (4, 10)]);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.status, Status::Running);
        assert_eq!(snapshot.steps, 1);
    }

    #[test]
    fn test_food_consumption_and_deferred_growth() {
        let mut sim = sim(20, &[(5, 10), (4, 10), (3, 10)], Direction::Right, (6, 10));

        let report = sim.update();

        assert!(report.ate_food);
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.score, 1);
        assert_eq!(snapshot.status, Status::Running);
        assert_eq!(snapshot.body_cells.len(), 3);
        let food = snapshot.food_cell.unwrap();
        assert!(![(6, 10), (5, 10), (4, 10)].contains(&(food.x, food.y)));
        assert!(sim.grid().contains(food));

        sim.update();
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.body_cells.len(), 4);
        assert_eq!(cells(&snapshot), vec![(7, 10), (6, 10), (5, 10), (4, 10)]);
    }

    #[test]
    fn test_wall_collision() {
        let mut sim = sim(20, &[(0, 10), (1, 10)], Direction::Left, (5, 5));

        let report = sim.update();

        assert!(report.terminated());
        assert_eq!(sim.status(), Status::Over(EndReason::Wall));
        assert_eq!(sim.body().head(), Position::new(-1, 10));
    }

    #[test]
    fn test_wall_collision_on_far_edges() {
        let mut down = sim(4, &[(1, 3), (1, 2)], Direction::Down, (0, 0));
        down.update();
        assert_eq!(down.status(), Status::Over(EndReason::Wall));

        let mut right = sim(4, &[(3, 1), (2, 1)], Direction::Right, (0, 0));
        right.update();
        assert_eq!(right.status(), Status::Over(EndReason::Wall));
    }

    #[test]
    fn test_self_collision_in_loop() {
        // Travelling left; turning down lands on (4,6), which is not the vacating tail
        let mut sim = sim(
            10,
            &[(4, 5), (5, 5), (5, 6), (4, 6), (3, 6)],
            Direction::Left,
            (8, 8),
        );

        assert!(sim.request_direction(Direction::Down));
        let report = sim.update();

        assert!(report.terminated());
        assert_eq!(sim.status(), Status::Over(EndReason::SelfCollision));
        assert_eq!(sim.score(), 0);
    }

    #[test]
    fn test_stepping_into_vacating_tail_is_safe() {
        let layout = [(5, 5), (4, 5), (4, 6), (5, 6)];

        let mut sim_a = sim(10, &layout, Direction::Right, (8, 8));
        sim_a.request_direction(Direction::Down);
        sim_a.update();
        assert_eq!(sim_a.status(), Status::Running);
        assert_eq!(sim_a.body().head(), Position::new(5, 6));

        // with growth pending the tail stays put and the same move is fatal
        let mut sim_b = sim(10, &layout, Direction::Right, (8, 8));
        sim_b.body.grow();
        sim_b.request_direction(Direction::Down);
        sim_b.update();
        assert_eq!(sim_b.status(), Status::Over(EndReason::SelfCollision));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut sim = sim(20, &[(5, 10), (4, 10), (3, 10)], Direction::Right, (0, 0));

        assert!(!sim.request_direction(Direction::Left));
        sim.update();

        assert_eq!(sim.body().direction(), Direction::Right);
        assert_eq!(sim.body().head(), Position::new(6, 10));
        assert_eq!(sim.status(), Status::Running);
    }

    #[test]
    fn test_single_segment_may_reverse() {
        let mut sim = sim(10, &[(5, 5)], Direction::Right, (0, 0));

        assert!(sim.request_direction(Direction::Left));
        sim.update();

        assert_eq!(sim.body().head(), Position::new(4, 5));
        assert_eq!(sim.status(), Status::Running);
    }

    #[test]
    fn test_last_valid_request_wins() {
        let mut sim = sim(20, &[(5, 10), (4, 10), (3, 10)], Direction::Right, (0, 0));

        assert!(sim.request_direction(Direction::Up));
        assert!(sim.request_direction(Direction::Down));
        // a reversal does not clear the earlier accepted turn
        assert!(!sim.request_direction(Direction::Left));
        assert_eq!(sim.pending_direction(), Some(Direction::Down));

        sim.update();
        assert_eq!(sim.body().head(), Position::new(5, 11));
        assert_eq!(sim.pending_direction(), None);

        // pending turns are consumed by one tick only
        sim.update();
        assert_eq!(sim.body().head(), Position::new(5, 12));
    }

    #[test]
    fn test_quick_double_turn_cannot_reverse() {
        let mut sim = sim(20, &[(5, 10), (4, 10), (3, 10)], Direction::Right, (0, 0));

        // Up then Left between ticks: Left is still judged against travel (Right)
        sim.request_direction(Direction::Up);
        assert!(!sim.request_direction(Direction::Left));
        sim.update();

        assert_eq!(sim.body().head(), Position::new(5, 9));
        assert_eq!(sim.status(), Status::Running);
    }

    #[test]
    fn test_non_cardinal_offsets_are_ignored() {
        let mut sim = sim(20, &[(5, 10), (4, 10), (3, 10)], Direction::Right, (0, 0));

        assert!(!sim.request_offset(1, 1));
        assert!(!sim.request_offset(0, 0));
        assert_eq!(sim.pending_direction(), None);

        assert!(sim.request_offset(0, 1));
        assert_eq!(sim.pending_direction(), Some(Direction::Down));
    }

    #[test]
    fn test_update_after_over_is_noop() {
        let mut sim = sim(20, &[(0, 10), (1, 10)], Direction::Left, (5, 5));
        sim.update();
        let frozen = sim.snapshot();

        let report = sim.update();

        assert!(report.terminated());
        assert!(!report.ate_food);
        assert_eq!(sim.snapshot(), frozen);
        assert!(!sim.request_direction(Direction::Up));
    }

    #[test]
    fn test_board_full_is_a_win() {
        // 2x2 grid, one free cell at (0,0) holding the food
        let mut sim = sim(2, &[(0, 1), (1, 1), (1, 0)], Direction::Left, (0, 0));

        sim.request_direction(Direction::Up);
        let report = sim.update();
        assert!(report.ate_food);
        assert_eq!(sim.status(), Status::Running);
        assert_eq!(sim.food_position(), Some(Position::new(1, 0)));

        sim.request_direction(Direction::Right);
        let report = sim.update();
        assert!(report.ate_food);
        assert_eq!(report.status, Status::Over(EndReason::BoardFull));
        assert_eq!(sim.score(), 2);
        assert_eq!(sim.body().len(), 4);
        assert_eq!(sim.snapshot().food_cell, None);
    }

    #[test]
    fn test_invariants_hold_under_random_play() {
        let mut driver = StdRng::seed_from_u64(11);

        for game in 0..20 {
            let config = GameConfig {
                grid_size: 8,
                seed: Some(game),
                ..Default::default()
            };
            let mut sim = Simulation::new(&config).unwrap();
            let mut last_score = 0;
            let mut grow_next = false;

            while sim.is_running() && sim.steps() < 500 {
                let direction = Direction::ALL[driver.gen_range(0..4)];
                let reversal = sim.body().len() > 1 && sim.body().direction().is_opposite(direction);
                let accepted = sim.request_direction(direction);
                assert_eq!(accepted, !reversal);

                let before = sim.body().len();
                let report = sim.update();
                let snapshot = sim.snapshot();

                let expected_len = if grow_next { before + 1 } else { before };
                assert_eq!(snapshot.body_cells.len(), expected_len);
                grow_next = report.ate_food;

                assert!(snapshot.score >= last_score);
                assert_eq!(snapshot.score - last_score, u32::from(report.ate_food));
                last_score = snapshot.score;

                if snapshot.status == Status::Running {
                    let unique: HashSet<_> = snapshot.body_cells.iter().collect();
                    assert_eq!(unique.len(), snapshot.body_cells.len());
                    assert!(
                        snapshot
                            .body_cells
                            .windows(2)
                            .all(|w| w[0].is_adjacent(w[1]))
                    );

                    let food = snapshot.food_cell.unwrap();
                    assert!(sim.grid().contains(food));
                    assert!(!snapshot.body_cells.contains(&food));
                }
            }
        }
    }
}
