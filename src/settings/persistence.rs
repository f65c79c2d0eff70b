//! Settings persistence over a string key-value backend.
//!
//! Record layout (one record per installation):
//!
//! | key                  | value                                          |
//! |----------------------|------------------------------------------------|
//! | `difficulty`         | `"Easy"` / `"Normal"` / `"Hard"` (index on read) |
//! | `musicVolume`        | integer text 0-100                             |
//! | `sfxVolume`          | integer text 0-100                             |
//! | `music`, `sound`     | `"0"` = on, `"1"` = off                        |
//! | `flappyBirdSettings` | JSON blob with the remaining toggles           |
//! | `settingsFormat`     | `"2"`                                          |
//!
//! Records without `settingsFormat` were written by older versions, which
//! stored volumes as 0-1 fractions.
//!
//! Reads are lenient: a malformed value falls back to that field's default.

use super::types::{Difficulty, Settings};
use crate::error::CoreResult;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const KEY_DIFFICULTY: &str = "difficulty";
pub const KEY_MUSIC_VOLUME: &str = "musicVolume";
pub const KEY_SFX_VOLUME: &str = "sfxVolume";
pub const KEY_MUSIC: &str = "music";
pub const KEY_SOUND: &str = "sound";
pub const KEY_BLOB: &str = "flappyBirdSettings";
pub const KEY_FORMAT: &str = "settingsFormat";

/// Current record format. Volumes are on the 0-100 scale.
pub const FORMAT_VERSION: &str = "2";

const BLOB_MUTE_AUDIO: &str = "muteAudio";
const BLOB_PIPE_SPEED: &str = "pipeSpeed";
const BLOB_GAP_SIZE: &str = "gapSize";
const BLOB_SHOW_TRAIL: &str = "showTrail";
const BLOB_SCREEN_SHAKE: &str = "screenShake";
const BLOB_NIGHT_MODE: &str = "nightMode";

const FLAG_ON: &str = "0";
const FLAG_OFF: &str = "1";

/// A string-keyed, string-valued store such as browser local storage or a
/// JSON file on disk.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> CoreResult<()>;

    fn remove(&mut self, key: &str) -> CoreResult<()>;

    /// Write several entries. Backends with expensive writes override this to
    /// commit once.
    fn set_many(&mut self, entries: &[(&str, String)]) -> CoreResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> CoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> CoreResult<()> {
        (**self).remove(key)
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> CoreResult<()> {
        (**self).set_many(entries)
    }
}

/// In-memory backend. Used for `--memory` runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> CoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Toggles and tuning values written under [`KEY_BLOB`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsBlob {
    mute_audio: bool,
    pipe_speed: u32,
    gap_size: u32,
    show_trail: bool,
    screen_shake: bool,
    night_mode: bool,
}

impl From<&Settings> for SettingsBlob {
    fn from(s: &Settings) -> Self {
        Self {
            mute_audio: s.mute_audio,
            pipe_speed: s.pipe_speed,
            gap_size: s.gap_size,
            show_trail: s.show_trail,
            screen_shake: s.screen_shake,
            night_mode: s.night_mode,
        }
    }
}

/// Read the settings record from `store`.
///
/// Errors only when the backend itself fails; malformed values degrade to
/// defaults field by field.
pub fn read_settings(store: &dyn KeyValueStore) -> CoreResult<Settings> {
    let mut settings = Settings::default();
    let legacy = store.get(KEY_FORMAT)?.is_none();
    let blob = read_blob(store)?;

    if let Some(v) = blob_bool(&blob, BLOB_MUTE_AUDIO) {
        settings.mute_audio = v;
    }
    if let Some(v) = blob_number(&blob, BLOB_PIPE_SPEED) {
        settings.pipe_speed = round_non_negative(v);
    }
    if let Some(v) = blob_number(&blob, BLOB_GAP_SIZE) {
        settings.gap_size = round_non_negative(v);
    }
    if let Some(v) = blob_bool(&blob, BLOB_SHOW_TRAIL) {
        settings.show_trail = v;
    }
    if let Some(v) = blob_bool(&blob, BLOB_SCREEN_SHAKE) {
        settings.screen_shake = v;
    }
    if let Some(v) = blob_bool(&blob, BLOB_NIGHT_MODE) {
        settings.night_mode = v;
    }

    // Older blobs also carried difficulty and volumes; the dedicated keys win.
    let difficulty = store
        .get(KEY_DIFFICULTY)?
        .and_then(|raw| Difficulty::parse(&raw))
        .or_else(|| blob_text(&blob, KEY_DIFFICULTY).and_then(|raw| Difficulty::parse(&raw)));
    if let Some(d) = difficulty {
        settings.difficulty = d;
    }

    if let Some(v) = store
        .get(KEY_MUSIC_VOLUME)?
        .and_then(|raw| parse_volume(&raw, legacy))
        .or_else(|| blob_number(&blob, KEY_MUSIC_VOLUME).and_then(|v| scale_volume(v, legacy)))
    {
        settings.music_volume = v;
    }
    if let Some(v) = store
        .get(KEY_SFX_VOLUME)?
        .and_then(|raw| parse_volume(&raw, legacy))
        .or_else(|| blob_number(&blob, KEY_SFX_VOLUME).and_then(|v| scale_volume(v, legacy)))
    {
        settings.sfx_volume = v;
    }

    if let Some(on) = store.get(KEY_MUSIC)?.and_then(|raw| parse_flag(&raw)) {
        settings.music_on = on;
    }
    if let Some(on) = store.get(KEY_SOUND)?.and_then(|raw| parse_flag(&raw)) {
        settings.sound_on = on;
    }

    settings.clamp();
    Ok(settings)
}

/// Write the full settings record to `store` in the canonical encoding.
///
/// Every key is overwritten, so this also replaces any older record.
pub fn write_settings(store: &mut dyn KeyValueStore, settings: &Settings) -> CoreResult<()> {
    let blob = serde_json::to_string(&SettingsBlob::from(settings))?;
    store.set_many(&[
        (KEY_DIFFICULTY, settings.difficulty.name().to_string()),
        (KEY_MUSIC_VOLUME, settings.music_volume.to_string()),
        (KEY_SFX_VOLUME, settings.sfx_volume.to_string()),
        (KEY_MUSIC, encode_flag(settings.music_on).to_string()),
        (KEY_SOUND, encode_flag(settings.sound_on).to_string()),
        (KEY_BLOB, blob),
        (KEY_FORMAT, FORMAT_VERSION.to_string()),
    ])
}

/// Parse a persisted volume into the canonical 0-100 scale. `legacy` records
/// store 0-1 fractions, so `"1"` there means full volume.
pub fn parse_volume(raw: &str, legacy: bool) -> Option<u32> {
    let value: f64 = raw.trim().parse().ok()?;
    scale_volume(value, legacy)
}

fn scale_volume(value: f64, legacy: bool) -> Option<u32> {
    if !value.is_finite() {
        return None;
    }
    let scaled = if legacy && value <= 1.0 {
        value * 100.0
    } else {
        value
    };
    Some(scaled.round().clamp(0.0, 100.0) as u32)
}

/// `"0"` means on and `"1"` means off.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        FLAG_ON => Some(true),
        FLAG_OFF => Some(false),
        _ => None,
    }
}

pub fn encode_flag(on: bool) -> &'static str {
    if on {
        FLAG_ON
    } else {
        FLAG_OFF
    }
}

/// The blob as a JSON object. Anything else reads as empty.
fn read_blob(store: &dyn KeyValueStore) -> CoreResult<Map<String, Value>> {
    let Some(raw) = store.get(KEY_BLOB)? else {
        return Ok(Map::new());
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => {
            log::debug!("ignoring settings blob that is not an object: {}", other);
            Ok(Map::new())
        }
        Err(e) => {
            log::debug!("ignoring malformed settings blob: {}", e);
            Ok(Map::new())
        }
    }
}

fn blob_bool(blob: &Map<String, Value>, key: &str) -> Option<bool> {
    let parsed = match blob.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if parsed.is_none() {
        log::debug!("ignoring malformed blob field {}", key);
    }
    parsed
}

fn blob_number(blob: &Map<String, Value>, key: &str) -> Option<f64> {
    let parsed = match blob.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite());
    if parsed.is_none() {
        log::debug!("ignoring malformed blob field {}", key);
    }
    parsed
}

fn blob_text(blob: &Map<String, Value>, key: &str) -> Option<String> {
    match blob.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn round_non_negative(value: f64) -> u32 {
    value.round().clamp(0.0, u32::MAX as f64) as u32
}
