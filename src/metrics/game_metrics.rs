use std::time::{Duration, Instant};

use crate::game::{EndReason, Status};

/// Per-process play statistics. Nothing here outlives the process.
pub struct GameMetrics {
    session_start: Instant,
    paused_since: Option<Instant>,
    paused_total: Duration,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
    pub wins: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            session_start: Instant::now(),
            paused_since: None,
            paused_total: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
            wins: 0,
        }
    }

    /// Refresh the elapsed play time. Time spent paused does not count.
    pub fn update(&mut self, status: Status) {
        if status != Status::Running || self.paused_since.is_some() {
            return;
        }
        self.elapsed_time = self.session_start.elapsed().saturating_sub(self.paused_total);
    }

    pub fn on_game_start(&mut self) {
        self.session_start = Instant::now();
        self.paused_since = None;
        self.paused_total = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_pause(&mut self) {
        self.paused_since.get_or_insert_with(Instant::now);
    }

    pub fn on_resume(&mut self) {
        if let Some(since) = self.paused_since.take() {
            self.paused_total += since.elapsed();
        }
    }

    pub fn on_game_over(&mut self, final_score: u32, reason: EndReason) {
        self.games_played += 1;
        self.best_score = self.best_score.max(final_score);
        if reason == EndReason::BoardFull {
            self.wins += 1;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
