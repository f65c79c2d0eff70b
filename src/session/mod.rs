//! Game session: the play-attempt lifecycle and its physics parameters.
//!
//! A session starts waiting for input, runs while the player flaps, can be
//! paused and resumed through a three-step countdown, and ends when the bird
//! leaves the world or hits a pipe.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
