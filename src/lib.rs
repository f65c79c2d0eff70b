//! Flap Attack - a Flappy-Bird-style arcade game for the terminal.
//!
//! The library holds the game core (settings store, session state machine,
//! physics and timer collaborators, obstacles) and the terminal rendering
//! adapter used by the binary.

pub mod audio;
pub mod engine;
pub mod error;
pub mod input;
pub mod obstacles;
pub mod scene;
pub mod session;
pub mod settings;
pub mod ui;
pub mod utils;

pub use error::{CoreError, CoreResult};
pub use scene::{ArcadeSession, FrameReport, PlayScene};
pub use session::{GameEvent, GameSession, SessionState};
pub use settings::{Difficulty, Settings, SettingsPatch, SettingsStore};
