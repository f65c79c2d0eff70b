//! Engine collaborators: the physics body and the timer the session drives.

pub mod physics;
pub mod timer;

pub use physics::{ArcadeBody, PhysicsBody};
pub use timer::{Fired, Timer, TimerHandle, TimerQueue};
