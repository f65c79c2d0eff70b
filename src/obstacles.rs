//! Pipe obstacles: spawning, scrolling, passage detection and collision.
//!
//! Pipes scroll left at `pipe_speed` (scaled by the difficulty multiplier).
//! The gap size is read from settings when a pipe spawns, so changes apply to
//! the next pipe rather than the ones already on screen.

use crate::engine::physics::{BIRD_RADIUS, WORLD_HEIGHT, WORLD_WIDTH};
use crate::settings::Settings;
use rand::Rng;

/// Pipe width in pixels.
pub const PIPE_WIDTH: f64 = 60.0;
/// Horizontal distance between consecutive pipes.
pub const PIPE_SPACING: f64 = 220.0;
/// Pixels per second for each point of the `pipe_speed` setting.
pub const PIPE_SPEED_SCALE: f64 = 2.0;
/// Minimum distance between a gap and the top or bottom of the world.
pub const GAP_MARGIN: f64 = 60.0;

/// A top + bottom pipe pair with a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge.
    pub x: f64,
    pub gap_center: f64,
    pub gap_size: f64,
    /// Whether the bird has already scored this pipe.
    pub passed: bool,
}

impl Pipe {
    pub fn gap_top(&self) -> f64 {
        self.gap_center - self.gap_size / 2.0
    }

    pub fn gap_bottom(&self) -> f64 {
        self.gap_center + self.gap_size / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + PIPE_WIDTH
    }

    /// Whether a circle at (`x`, `y`) with `radius` overlaps the pipe body.
    pub fn hits(&self, x: f64, y: f64, radius: f64) -> bool {
        let overlaps_column = x + radius > self.x && x - radius < self.right();
        overlaps_column && (y - radius < self.gap_top() || y + radius > self.gap_bottom())
    }
}

/// What happened during one [`PipeField::advance`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObstacleReport {
    /// Pipes whose right edge moved behind the bird.
    pub passed: u32,
    pub collided: bool,
}

/// The pipes currently in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeField {
    pub pipes: Vec<Pipe>,
    /// Distance left to scroll before the next spawn.
    pub until_next_spawn: f64,
}

impl Default for PipeField {
    fn default() -> Self {
        Self::new()
    }
}

impl PipeField {
    pub fn new() -> Self {
        Self {
            pipes: Vec::new(),
            until_next_spawn: 0.0,
        }
    }

    /// Scroll speed in px/s for these settings.
    pub fn speed(settings: &Settings) -> f64 {
        settings.pipe_speed as f64 * PIPE_SPEED_SCALE * settings.profile().pipe_speed_multiplier
    }

    /// Spawn a pipe at the right edge with a random gap position.
    pub fn spawn<R: Rng>(&mut self, settings: &Settings, rng: &mut R) {
        let gap_size = settings.gap_size as f64;
        let half = gap_size / 2.0;
        let min_center = GAP_MARGIN + half;
        let max_center = (WORLD_HEIGHT - GAP_MARGIN - half).max(min_center);
        let gap_center = if max_center > min_center {
            rng.gen_range(min_center..=max_center)
        } else {
            min_center
        };

        self.pipes.push(Pipe {
            x: WORLD_WIDTH,
            gap_center,
            gap_size,
            passed: false,
        });
        self.until_next_spawn = PIPE_SPACING;
    }

    /// Scroll by `dt` seconds, spawn, score and test the bird for collision.
    pub fn advance<R: Rng>(
        &mut self,
        dt: f64,
        settings: &Settings,
        bird: (f64, f64),
        rng: &mut R,
    ) -> ObstacleReport {
        let distance = Self::speed(settings) * dt.max(0.0);
        for pipe in &mut self.pipes {
            pipe.x -= distance;
        }
        self.pipes.retain(|p| p.right() >= 0.0);

        self.until_next_spawn -= distance;
        if self.until_next_spawn <= 0.0 {
            self.spawn(settings, rng);
        }

        let (bird_x, bird_y) = bird;
        let mut report = ObstacleReport::default();
        for pipe in &mut self.pipes {
            if !pipe.passed && pipe.right() < bird_x - BIRD_RADIUS {
                pipe.passed = true;
                report.passed += 1;
            }
            if pipe.hits(bird_x, bird_y, BIRD_RADIUS) {
                report.collided = true;
            }
        }
        report
    }

    pub fn clear(&mut self) {
        self.pipes.clear();
        self.until_next_spawn = 0.0;
    }
}
