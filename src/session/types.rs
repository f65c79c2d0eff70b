//! Game session data structures.

use std::collections::VecDeque;

/// Countdown length after resuming from pause.
pub const COUNTDOWN_STEPS: u32 = 3;
/// Interval between countdown steps.
pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;
/// Delay between the last countdown step and play resuming.
pub const COUNTDOWN_HANDOFF_MS: u64 = 50;
/// Bird positions kept for the trail effect.
pub const TRAIL_LENGTH: usize = 5;

/// Play-session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Waiting for the first input.
    Start,
    /// Resuming from pause; input is ignored.
    CountingDown,
    Playing,
    Paused,
    GameOver,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::CountingDown => "Counting down",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::GameOver => "Game over",
        }
    }
}

/// Discrete events that drive the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The single player action: start, flap or restart depending on state.
    PrimaryInput,
    PauseRequest,
    ResumeRequest,
    /// The bird left the world vertically.
    OutOfBounds,
    /// The bird hit an obstacle.
    Collision,
    /// One countdown step elapsed.
    CountdownTick,
    /// The countdown handoff delay elapsed.
    CountdownComplete,
}

/// Tags carried by the session's scheduled timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTag {
    CountdownTick,
    CountdownComplete,
}

impl From<TimerTag> for GameEvent {
    fn from(tag: TimerTag) -> Self {
        match tag {
            TimerTag::CountdownTick => GameEvent::CountdownTick,
            TimerTag::CountdownComplete => GameEvent::CountdownComplete,
        }
    }
}

/// Bird state captured when play was paused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PauseSnapshot {
    pub x: f64,
    pub y: f64,
    pub velocity_y: f64,
}

/// Recent bird positions, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrailHistory {
    points: VecDeque<(f64, f64)>,
}

impl TrailHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, x: f64, y: f64) {
        self.points.push_front((x, y));
        self.points.truncate(TRAIL_LENGTH);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_keeps_newest_points() {
        let mut trail = TrailHistory::new();
        for i in 0..8 {
            trail.record(i as f64, 0.0);
        }
        assert_eq!(trail.len(), TRAIL_LENGTH);
        let xs: Vec<f64> = trail.points().map(|p| p.0).collect();
        assert_eq!(xs, vec![7.0, 6.0, 5.0, 4.0, 3.0]);
    }

    #[test]
    fn test_timer_tags_map_to_events() {
        assert_eq!(
            GameEvent::from(TimerTag::CountdownTick),
            GameEvent::CountdownTick
        );
        assert_eq!(
            GameEvent::from(TimerTag::CountdownComplete),
            GameEvent::CountdownComplete
        );
    }
}
