//! Physics-body collaborator and a simple arcade implementation.
//!
//! Only vertical motion is simulated; the bird's column never changes.

/// World size in pixels.
pub const WORLD_WIDTH: f64 = 390.0;
pub const WORLD_HEIGHT: f64 = 844.0;

/// Where the bird spawns and is reset to.
pub const BIRD_START_X: f64 = 150.0;
pub const BIRD_START_Y: f64 = WORLD_HEIGHT / 2.0;
pub const BIRD_RADIUS: f64 = 15.0;

/// Vertical speed cap, px/s.
pub const MAX_VELOCITY_Y: f64 = 1000.0;

/// The physics operations the game session drives.
pub trait PhysicsBody {
    fn set_gravity(&mut self, gravity: f64);
    fn gravity(&self) -> f64;
    fn set_velocity_y(&mut self, velocity: f64);
    fn velocity_y(&self) -> f64;
    fn position(&self) -> (f64, f64);
    fn set_position(&mut self, x: f64, y: f64);
    /// Suspend motion integration.
    fn pause(&mut self);
    fn resume(&mut self);
    fn is_paused(&self) -> bool;
    /// Whether the body has left the vertical extent of the world.
    fn is_out_of_bounds(&self) -> bool;
}

/// Fixed-step vertical integrator with a velocity cap.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcadeBody {
    pub x: f64,
    pub y: f64,
    pub velocity_y: f64,
    pub gravity: f64,
    pub paused: bool,
    pub world_height: f64,
}

impl Default for ArcadeBody {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadeBody {
    /// A body at the spawn point with no gravity, paused.
    pub fn new() -> Self {
        Self {
            x: BIRD_START_X,
            y: BIRD_START_Y,
            velocity_y: 0.0,
            gravity: 0.0,
            paused: true,
            world_height: WORLD_HEIGHT,
        }
    }

    /// Advance the simulation by `dt` seconds. Does nothing while paused.
    pub fn step(&mut self, dt: f64) {
        if self.paused || dt <= 0.0 {
            return;
        }
        self.velocity_y =
            (self.velocity_y + self.gravity * dt).clamp(-MAX_VELOCITY_Y, MAX_VELOCITY_Y);
        self.y += self.velocity_y * dt;
    }
}

impl PhysicsBody for ArcadeBody {
    fn set_gravity(&mut self, gravity: f64) {
        self.gravity = gravity;
    }

    fn gravity(&self) -> f64 {
        self.gravity
    }

    fn set_velocity_y(&mut self, velocity: f64) {
        self.velocity_y = velocity.clamp(-MAX_VELOCITY_Y, MAX_VELOCITY_Y);
    }

    fn velocity_y(&self) -> f64 {
        self.velocity_y
    }

    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn is_out_of_bounds(&self) -> bool {
        self.y < 0.0 || self.y > self.world_height
    }
}
