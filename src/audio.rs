//! Audio control: maps settings onto an injected audio sink.

use crate::settings::Settings;

/// Short sound effects triggered by gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Flap,
    Score,
    Hit,
}

/// Audio backend operations.
pub trait AudioSink {
    fn set_music_playing(&mut self, playing: bool);
    /// Gain in 0.0..=1.0.
    fn set_music_volume(&mut self, gain: f32);
    fn set_sfx_volume(&mut self, gain: f32);
    fn play(&mut self, cue: SoundCue);
}

/// Keeps an [`AudioSink`] in line with the current settings.
#[derive(Debug)]
pub struct AudioController<S> {
    sink: S,
    music_playing: bool,
    sfx_enabled: bool,
}

impl<S: AudioSink> AudioController<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        let mut controller = Self {
            sink,
            music_playing: false,
            sfx_enabled: false,
        };
        controller.apply(settings);
        controller
    }

    /// Push volumes and the music on/off state to the sink.
    pub fn apply(&mut self, settings: &Settings) {
        let music_gain = settings.music_gain();
        let sfx_gain = settings.sfx_gain();
        self.sink.set_music_volume(music_gain);
        self.sink.set_sfx_volume(sfx_gain);
        self.sfx_enabled = sfx_gain > 0.0;

        let should_play = music_gain > 0.0;
        if should_play != self.music_playing {
            self.sink.set_music_playing(should_play);
            self.music_playing = should_play;
        }
    }

    /// Play a cue unless effects are muted or off.
    pub fn cue(&mut self, cue: SoundCue) {
        if self.sfx_enabled {
            self.sink.play(cue);
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Sink that only logs; the terminal front end has no mixer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn set_music_playing(&mut self, playing: bool) {
        log::debug!("music {}", if playing { "on" } else { "off" });
    }

    fn set_music_volume(&mut self, gain: f32) {
        log::trace!("music volume {:.2}", gain);
    }

    fn set_sfx_volume(&mut self, gain: f32) {
        log::trace!("sfx volume {:.2}", gain);
    }

    fn play(&mut self, cue: SoundCue) {
        log::trace!("sfx {:?}", cue);
    }
}
