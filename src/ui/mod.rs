//! Terminal rendering adapter: maps game and settings state onto ratatui
//! widgets. Holds no game rules.

pub mod menu;
pub mod play_scene;
pub mod settings_scene;

pub use menu::{draw_home, draw_pause, HomeItem, MenuCursor, PauseItem};
pub use play_scene::draw_play;
pub use settings_scene::{SettingsField, SettingsScreen};
