//! Scoring, levels and gravity speed

use std::time::Duration;

/// Points per cleared line, multiplied by the level at the time of the clear
pub const SCORE_PER_LINE: u64 = 100;
pub const LINES_PER_LEVEL: u32 = 10;

/// Gravity period at level 1
pub const BASE_DROP_SPEED: Duration = Duration::from_millis(1000);
/// Fastest gravity period
pub const MIN_DROP_SPEED: Duration = Duration::from_millis(100);
/// Period shaved off per level
pub const SPEED_INCREMENT: Duration = Duration::from_millis(50);

/// Score tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, starts at 1
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
        }
    }

    /// Account for a commit that removed `cleared` lines
    /// Points use the level from before this clear. Returns true on level up.
    pub fn add_clear(&mut self, cleared: u32) -> bool {
        self.points += cleared as u64 * SCORE_PER_LINE * self.level as u64;
        self.lines += cleared;

        let previous = self.level;
        self.level = self.lines / LINES_PER_LEVEL + 1;
        self.level != previous
    }
}

/// `max(MIN, BASE - (level - 1) * INCREMENT)`
pub fn gravity_interval(level: u32) -> Duration {
    let steps = level.saturating_sub(1);
    SPEED_INCREMENT
        .checked_mul(steps)
        .and_then(|faster| BASE_DROP_SPEED.checked_sub(faster))
        .map_or(MIN_DROP_SPEED, |period| period.max(MIN_DROP_SPEED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_clear() {
        let mut score = Score::new();
        score.add_clear(1);
        assert_eq!(score.points, 100);
        assert_eq!(score.lines, 1);
        assert_eq!(score.level, 1);
    }

    #[test]
    fn test_no_clear_scores_nothing() {
        let mut score = Score::new();
        assert!(!score.add_clear(0));
        assert_eq!(score, Score::new());
    }

    #[test]
    fn test_points_use_level_before_update() {
        let mut score = Score {
            points: 0,
            level: 1,
            lines: 9,
        };
        // Crosses into level 2, but is paid at level 1
        assert!(score.add_clear(4));
        assert_eq!(score.points, 400);
        assert_eq!(score.lines, 13);
        assert_eq!(score.level, 2);

        score.add_clear(2);
        assert_eq!(score.points, 400 + 2 * 100 * 2);
    }

    #[test]
    fn test_level_up() {
        let mut score = Score::new();
        for _ in 0..10 {
            score.add_clear(1);
        }
        assert_eq!(score.level, 2);
        for _ in 0..15 {
            score.add_clear(2);
        }
        assert_eq!(score.lines, 40);
        assert_eq!(score.level, 5);
    }

    #[test]
    fn test_gravity_interval() {
        assert_eq!(gravity_interval(1), Duration::from_millis(1000));
        assert_eq!(gravity_interval(5), Duration::from_millis(800));
        assert_eq!(gravity_interval(19), Duration::from_millis(100));
        assert_eq!(gravity_interval(20), Duration::from_millis(100));
        assert_eq!(gravity_interval(u32::MAX), Duration::from_millis(100));
    }
}
