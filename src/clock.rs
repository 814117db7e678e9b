//! Tick source for the simulation
//!
//! The simulation has no notion of time; whoever drives it owns a [`TickClock`]
//! and calls `update()` each time the clock fires.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

pub struct TickClock {
    period: Duration,
    interval: Interval,
}

impl TickClock {
    /// A clock firing every `period`, first fire one period from now.
    /// Ticks missed while the driver was busy are skipped, not replayed.
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { period, interval }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    /// Restart the cadence so the next tick is a full period away
    pub fn reset(&mut self) {
        self.interval.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_at_fixed_period() {
        let mut clock = TickClock::new(Duration::from_millis(150));
        let start = Instant::now();

        clock.tick().await;
        let first = start.elapsed();
        assert!(first >= Duration::from_millis(150) && first < Duration::from_millis(160));

        clock.tick().await;
        let second = start.elapsed();
        assert!(second >= Duration::from_millis(300) && second < Duration::from_millis(310));
        assert_eq!(clock.period(), Duration::from_millis(150));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_delays_next_tick() {
        let mut clock = TickClock::new(Duration::from_millis(100));
        tokio::time::advance(Duration::from_millis(60)).await;

        clock.reset();
        let start = Instant::now();
        clock.tick().await;

        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
