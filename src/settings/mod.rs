//! Player settings: canonical values, persistence and change notification.

pub mod persistence;
pub mod store;
pub mod types;

pub use persistence::{KeyValueStore, MemoryStore};
pub use store::{SettingsStore, SubscriptionId};
pub use types::{Difficulty, DifficultyProfile, Settings, SettingsPatch};
