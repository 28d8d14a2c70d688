//! Search time management. The soft limit stops iterative deepening from
//! starting another iteration; the hard limit aborts the search mid-tree.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TimeManager {
    start: Instant,
    soft_limit: Option<Duration>,
    hard_limit: Option<Duration>,
}

/// Fraction of the allocation after which no new iteration starts.
const SOFT_RATIO: (u32, u32) = (3, 4);

impl TimeManager {
    /// No time limits; the search runs until its depth cap.
    pub fn infinite() -> TimeManager {
        TimeManager {
            start: Instant::now(),
            soft_limit: None,
            hard_limit: None,
        }
    }

    /// Exactly `millis` of thinking time.
    pub fn fixed(millis: u64) -> TimeManager {
        let limit = Duration::from_millis(millis);
        TimeManager {
            start: Instant::now(),
            soft_limit: Some(limit),
            hard_limit: Some(limit),
        }
    }

    /// Budget for one move out of `remaining_millis` on the clock with
    /// `increment_millis` added per move.
    pub fn from_clock(remaining_millis: u64, increment_millis: u64) -> TimeManager {
        let allocation = remaining_millis / 30 + increment_millis * 3 / 4;
        // Never budget more than half the remaining clock.
        let allocation = allocation.min(remaining_millis / 2).max(1);

        let soft = allocation * SOFT_RATIO.0 as u64 / SOFT_RATIO.1 as u64;
        let hard = (allocation * 3).min(remaining_millis / 2).max(1);

        TimeManager {
            start: Instant::now(),
            soft_limit: Some(Duration::from_millis(soft.max(1))),
            hard_limit: Some(Duration::from_millis(hard)),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn soft_limit_reached(&self) -> bool {
        self.soft_limit
            .map_or(false, |limit| self.start.elapsed() >= limit)
    }

    pub fn hard_limit_reached(&self) -> bool {
        self.hard_limit
            .map_or(false, |limit| self.start.elapsed() >= limit)
    }
}
