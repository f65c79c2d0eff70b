//! Player settings data structures.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const VOLUME_RANGE: RangeInclusive<u32> = 0..=100;
pub const PIPE_SPEED_RANGE: RangeInclusive<u32> = 50..=200;
pub const GAP_SIZE_RANGE: RangeInclusive<u32> = 100..=200;

/// Difficulty levels selectable from the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Normal => 1,
            Self::Hard => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
        }
    }

    /// Parse a persisted difficulty. Accepts the variant name (any case) or a
    /// numeric index, since both encodings have been written in the past.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(index) = raw.parse::<usize>() {
            return Self::from_index(index);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(raw))
    }

    /// Next difficulty, wrapping around.
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Physics parameters for this difficulty.
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile {
                impulse_velocity: -300.0,
                gravity: 1000.0,
                pipe_speed_multiplier: 0.8,
            },
            Self::Normal => DifficultyProfile {
                impulse_velocity: -400.0,
                gravity: 1500.0,
                pipe_speed_multiplier: 1.0,
            },
            Self::Hard => DifficultyProfile {
                impulse_velocity: -500.0,
                gravity: 2000.0,
                pipe_speed_multiplier: 1.2,
            },
        }
    }
}

/// Read-only physics snapshot derived from a [`Difficulty`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Vertical velocity set on each flap, px/s (negative = upward).
    pub impulse_velocity: f64,
    /// Downward acceleration while playing, px/s².
    pub gravity: f64,
    /// Scales the `pipe_speed` setting.
    pub pipe_speed_multiplier: f64,
}

/// Canonical player settings.
///
/// Volumes are integers in 0..=100. Every numeric field is kept inside its
/// range by [`Settings::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub music_volume: u32,
    pub sfx_volume: u32,
    pub mute_audio: bool,
    pub music_on: bool,
    pub sound_on: bool,
    pub pipe_speed: u32,
    pub gap_size: u32,
    pub show_trail: bool,
    pub screen_shake: bool,
    pub night_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            music_volume: 70,
            sfx_volume: 80,
            mute_audio: false,
            music_on: true,
            sound_on: true,
            pipe_speed: 100,
            gap_size: 150,
            show_trail: true,
            screen_shake: true,
            night_mode: false,
        }
    }
}

impl Settings {
    pub fn profile(&self) -> DifficultyProfile {
        self.difficulty.profile()
    }

    /// Merge a patch into these settings, clamping every numeric field.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(d) = patch.difficulty {
            self.difficulty = d;
        }
        if let Some(v) = patch.music_volume {
            self.music_volume = clamp_to(v, &VOLUME_RANGE);
        }
        if let Some(v) = patch.sfx_volume {
            self.sfx_volume = clamp_to(v, &VOLUME_RANGE);
        }
        if let Some(v) = patch.mute_audio {
            self.mute_audio = v;
        }
        if let Some(v) = patch.music_on {
            self.music_on = v;
        }
        if let Some(v) = patch.sound_on {
            self.sound_on = v;
        }
        if let Some(v) = patch.pipe_speed {
            self.pipe_speed = clamp_to(v, &PIPE_SPEED_RANGE);
        }
        if let Some(v) = patch.gap_size {
            self.gap_size = clamp_to(v, &GAP_SIZE_RANGE);
        }
        if let Some(v) = patch.show_trail {
            self.show_trail = v;
        }
        if let Some(v) = patch.screen_shake {
            self.screen_shake = v;
        }
        if let Some(v) = patch.night_mode {
            self.night_mode = v;
        }
        self.clamp();
    }

    /// Pull every numeric field back into range.
    pub fn clamp(&mut self) {
        self.music_volume = clamp_to(self.music_volume as i64, &VOLUME_RANGE);
        self.sfx_volume = clamp_to(self.sfx_volume as i64, &VOLUME_RANGE);
        self.pipe_speed = clamp_to(self.pipe_speed as i64, &PIPE_SPEED_RANGE);
        self.gap_size = clamp_to(self.gap_size as i64, &GAP_SIZE_RANGE);
    }

    /// Effective music volume as a 0.0..=1.0 gain, honoring mute.
    pub fn music_gain(&self) -> f32 {
        if self.mute_audio || !self.music_on {
            0.0
        } else {
            self.music_volume as f32 / 100.0
        }
    }

    pub fn sfx_gain(&self) -> f32 {
        if self.mute_audio || !self.sound_on {
            0.0
        } else {
            self.sfx_volume as f32 / 100.0
        }
    }
}

/// A partial settings update. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub difficulty: Option<Difficulty>,
    pub music_volume: Option<i64>,
    pub sfx_volume: Option<i64>,
    pub mute_audio: Option<bool>,
    pub music_on: Option<bool>,
    pub sound_on: Option<bool>,
    pub pipe_speed: Option<i64>,
    pub gap_size: Option<i64>,
    pub show_trail: Option<bool>,
    pub screen_shake: Option<bool>,
    pub night_mode: Option<bool>,
}

impl SettingsPatch {
    pub fn difficulty(d: Difficulty) -> Self {
        Self {
            difficulty: Some(d),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn clamp_to(value: i64, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start() as i64, *range.end() as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.difficulty, Difficulty::Normal);
        assert_eq!(s.music_volume, 70);
        assert_eq!(s.sfx_volume, 80);
        assert_eq!(s.pipe_speed, 100);
        assert_eq!(s.gap_size, 150);
        assert!(s.show_trail);
        assert!(s.screen_shake);
        assert!(!s.night_mode);
        assert!(!s.mute_audio);
    }

    #[test]
    fn test_difficulty_profiles() {
        let easy = Difficulty::Easy.profile();
        assert_eq!(easy.impulse_velocity, -300.0);
        assert_eq!(easy.gravity, 1000.0);

        let normal = Difficulty::Normal.profile();
        assert_eq!(normal.impulse_velocity, -400.0);
        assert_eq!(normal.gravity, 1500.0);
        assert_eq!(normal.pipe_speed_multiplier, 1.0);

        let hard = Difficulty::Hard.profile();
        assert_eq!(hard.impulse_velocity, -500.0);
        assert_eq!(hard.gravity, 2000.0);
    }

    #[test]
    fn test_difficulty_parse_accepts_names_and_indices() {
        assert_eq!(Difficulty::parse("Hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("1"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::parse("7"), None);
        assert_eq!(Difficulty::parse("Nightmare"), None);
    }

    #[test]
    fn test_difficulty_cycle_wraps() {
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
        assert_eq!(Difficulty::Easy.prev(), Difficulty::Hard);
        assert_eq!(Difficulty::Normal.next(), Difficulty::Hard);
    }

    #[test]
    fn test_apply_clamps_out_of_range_values() {
        let mut s = Settings::default();
        s.apply(&SettingsPatch {
            music_volume: Some(250),
            sfx_volume: Some(-10),
            pipe_speed: Some(10),
            gap_size: Some(9000),
            ..SettingsPatch::default()
        });
        assert_eq!(s.music_volume, 100);
        assert_eq!(s.sfx_volume, 0);
        assert_eq!(s.pipe_speed, 50);
        assert_eq!(s.gap_size, 200);
    }

    #[test]
    fn test_apply_empty_patch_is_noop() {
        let mut s = Settings::default();
        s.apply(&SettingsPatch::default());
        assert_eq!(s, Settings::default());
        assert!(SettingsPatch::default().is_empty());
    }

    #[test]
    fn test_mute_silences_gains() {
        let mut s = Settings::default();
        assert!((s.music_gain() - 0.7).abs() < f32::EPSILON);
        s.mute_audio = true;
        assert_eq!(s.music_gain(), 0.0);
        assert_eq!(s.sfx_gain(), 0.0);
    }
}
