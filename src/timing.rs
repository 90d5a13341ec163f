//! Gravity timer and held-key repeat limiter
//!
//! Both are driven by the host's frame loop: it passes the current instant
//! in and gets back whether anything is due. Neither owns a thread.

use crate::game::Action;
use crate::score::gravity_interval;
use std::time::{Duration, Instant};

/// Periodic gravity tick whose period follows the level
#[derive(Debug, Clone)]
pub struct GravityTimer {
    level: u32,
    period: Duration,
    last_tick: Instant,
}

impl GravityTimer {
    pub fn new(level: u32, now: Instant) -> Self {
        Self {
            level,
            period: gravity_interval(level),
            last_tick: now,
        }
    }

    #[cfg(test)]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Rebuild the timer if the level moved since it was armed
    /// The new period starts counting from `now`.
    pub fn sync(&mut self, level: u32, now: Instant) {
        if level != self.level {
            tracing::debug!(level, period_ms = gravity_interval(level).as_millis() as u64, "gravity timer rebuilt");
            *self = Self::new(level, now);
        }
    }

    /// True when a gravity tick is due; re-arms for the next period
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) >= self.period {
            self.last_tick = now;
            true
        } else {
            false
        }
    }
}

/// Actions that auto-repeat while their key is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatAction {
    Left,
    Right,
    Down,
    Rotate,
}

impl RepeatAction {
    pub const ALL: [RepeatAction; 4] = [
        RepeatAction::Left,
        RepeatAction::Right,
        RepeatAction::Down,
        RepeatAction::Rotate,
    ];

    pub fn index(self) -> usize {
        match self {
            RepeatAction::Left => 0,
            RepeatAction::Right => 1,
            RepeatAction::Down => 2,
            RepeatAction::Rotate => 3,
        }
    }

    /// Game action fired on each repeat
    pub fn action(self) -> Action {
        match self {
            RepeatAction::Left => Action::MoveLeft,
            RepeatAction::Right => Action::MoveRight,
            RepeatAction::Down => Action::SoftDrop,
            RepeatAction::Rotate => Action::Rotate,
        }
    }
}

/// Minimum spacing between two firings of the same held action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatIntervals {
    pub left: Duration,
    pub right: Duration,
    pub down: Duration,
    pub rotate: Duration,
}

impl Default for RepeatIntervals {
    fn default() -> Self {
        Self {
            left: Duration::from_millis(100),
            right: Duration::from_millis(100),
            down: Duration::from_millis(50),
            rotate: Duration::from_millis(200),
        }
    }
}

impl RepeatIntervals {
    fn get(&self, action: RepeatAction) -> Duration {
        match action {
            RepeatAction::Left => self.left,
            RepeatAction::Right => self.right,
            RepeatAction::Down => self.down,
            RepeatAction::Rotate => self.rotate,
        }
    }
}

/// Held keys plus the ledger of when each action last fired
#[derive(Debug, Clone, Default)]
pub struct KeyRepeat {
    held: [bool; 4],
    last_fired: [Option<Instant>; 4],
    intervals: RepeatIntervals,
}

impl KeyRepeat {
    pub fn new(intervals: RepeatIntervals) -> Self {
        Self {
            held: [false; 4],
            last_fired: [None; 4],
            intervals,
        }
    }

    pub fn press(&mut self, action: RepeatAction) {
        self.held[action.index()] = true;
    }

    pub fn release(&mut self, action: RepeatAction) {
        self.held[action.index()] = false;
    }

    #[cfg(test)]
    pub fn is_held(&self, action: RepeatAction) -> bool {
        self.held[action.index()]
    }

    /// Actions due this poll, in left/right/down/rotate order
    ///
    /// A held action fires if it never fired before or if strictly more than
    /// its interval has passed since it last did; firing stamps `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<Action> {
        let mut actions = Vec::new();
        for repeat in RepeatAction::ALL {
            let i = repeat.index();
            if !self.held[i] {
                continue;
            }
            let due = match self.last_fired[i] {
                None => true,
                Some(last) => now.saturating_duration_since(last) > self.intervals.get(repeat),
            };
            if due {
                self.last_fired[i] = Some(now);
                actions.push(repeat.action());
            }
        }
        actions
    }

    /// Forget held keys and the ledger together
    pub fn clear(&mut self) {
        self.held = [false; 4];
        self.last_fired = [None; 4];
    }
}
