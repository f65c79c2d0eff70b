//! Settings screen: a list of fields adjusted with left/right.

use crate::settings::{Settings, SettingsPatch};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Step used by left/right on volume and tuning sliders.
const VOLUME_STEP: i64 = 5;
const TUNING_STEP: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Difficulty,
    Music,
    MusicVolume,
    Sound,
    SfxVolume,
    Mute,
    PipeSpeed,
    GapSize,
    Trail,
    ScreenShake,
    NightMode,
    Back,
}

impl SettingsField {
    pub const ALL: [SettingsField; 12] = [
        SettingsField::Difficulty,
        SettingsField::Music,
        SettingsField::MusicVolume,
        SettingsField::Sound,
        SettingsField::SfxVolume,
        SettingsField::Mute,
        SettingsField::PipeSpeed,
        SettingsField::GapSize,
        SettingsField::Trail,
        SettingsField::ScreenShake,
        SettingsField::NightMode,
        SettingsField::Back,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Difficulty => "Difficulty",
            Self::Music => "Music",
            Self::MusicVolume => "Music volume",
            Self::Sound => "Sound",
            Self::SfxVolume => "Effects volume",
            Self::Mute => "Mute all",
            Self::PipeSpeed => "Pipe speed",
            Self::GapSize => "Gap size",
            Self::Trail => "Bird trail",
            Self::ScreenShake => "Screen shake",
            Self::NightMode => "Night mode",
            Self::Back => "Back",
        }
    }

    /// Display value for this field.
    pub fn value(&self, s: &Settings) -> String {
        match self {
            Self::Difficulty => s.difficulty.name().to_string(),
            Self::Music => on_off(s.music_on),
            Self::MusicVolume => format!("{}%", s.music_volume),
            Self::Sound => on_off(s.sound_on),
            Self::SfxVolume => format!("{}%", s.sfx_volume),
            Self::Mute => on_off(s.mute_audio),
            Self::PipeSpeed => s.pipe_speed.to_string(),
            Self::GapSize => s.gap_size.to_string(),
            Self::Trail => on_off(s.show_trail),
            Self::ScreenShake => on_off(s.screen_shake),
            Self::NightMode => on_off(s.night_mode),
            Self::Back => String::new(),
        }
    }

    /// Patch that moves this field one step. `forward` is right/increase.
    /// Toggles flip in either direction. `Back` yields `None`.
    pub fn adjust(&self, s: &Settings, forward: bool) -> Option<SettingsPatch> {
        let step = |value: u32, by: i64| {
            let delta = if forward { by } else { -by };
            Some(value as i64 + delta)
        };
        let mut patch = SettingsPatch::default();
        match self {
            Self::Difficulty => {
                patch.difficulty = Some(if forward {
                    s.difficulty.next()
                } else {
                    s.difficulty.prev()
                })
            }
            Self::Music => patch.music_on = Some(!s.music_on),
            Self::MusicVolume => patch.music_volume = step(s.music_volume, VOLUME_STEP),
            Self::Sound => patch.sound_on = Some(!s.sound_on),
            Self::SfxVolume => patch.sfx_volume = step(s.sfx_volume, VOLUME_STEP),
            Self::Mute => patch.mute_audio = Some(!s.mute_audio),
            Self::PipeSpeed => patch.pipe_speed = step(s.pipe_speed, TUNING_STEP),
            Self::GapSize => patch.gap_size = step(s.gap_size, TUNING_STEP),
            Self::Trail => patch.show_trail = Some(!s.show_trail),
            Self::ScreenShake => patch.screen_shake = Some(!s.screen_shake),
            Self::NightMode => patch.night_mode = Some(!s.night_mode),
            Self::Back => return None,
        }
        Some(patch)
    }
}

fn on_off(on: bool) -> String {
    String::from(if on { "ON" } else { "OFF" })
}

/// Cursor over [`SettingsField::ALL`].
#[derive(Debug, Clone, Default)]
pub struct SettingsScreen {
    pub selected: usize,
}

impl SettingsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self) -> SettingsField {
        SettingsField::ALL[self.selected]
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        if self.selected + 1 < SettingsField::ALL.len() {
            self.selected += 1;
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, settings: &Settings) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Settings ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(2)])
            .split(inner);

        let mut lines = vec![Line::from("")];
        for (i, field) in SettingsField::ALL.iter().enumerate() {
            let selected = i == self.selected;
            let marker = if selected { "▶ " } else { "  " };
            let label_style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let value = field.value(settings);
            let value_span = if value.is_empty() {
                Span::raw("")
            } else {
                Span::styled(format!("◀ {} ▶", value), Style::default().fg(Color::Cyan))
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{}{:<16}", marker, field.label()), label_style),
                value_span,
            ]));
        }
        frame.render_widget(Paragraph::new(lines), chunks[0]);

        let help = Line::from(vec![
            Span::styled("[↑/↓]", Style::default().fg(Color::White)),
            Span::styled(" Select  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[←/→]", Style::default().fg(Color::White)),
            Span::styled(" Change  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[R]", Style::default().fg(Color::White)),
            Span::styled(" Defaults  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Esc]", Style::default().fg(Color::White)),
            Span::styled(" Back", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(
            Paragraph::new(help).alignment(Alignment::Center),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut screen = SettingsScreen::new();
        screen.navigate_up();
        assert_eq!(screen.selected, 0);
        for _ in 0..50 {
            screen.navigate_down();
        }
        assert_eq!(screen.field(), SettingsField::Back);
    }

    #[test]
    fn test_difficulty_cycles() {
        let s = Settings::default();
        let patch = SettingsField::Difficulty.adjust(&s, true).unwrap();
        assert_eq!(patch.difficulty, Some(Difficulty::Hard));
        let patch = SettingsField::Difficulty.adjust(&s, false).unwrap();
        assert_eq!(patch.difficulty, Some(Difficulty::Easy));
    }

    #[test]
    fn test_volume_step_may_overshoot_and_gets_clamped() {
        let mut s = Settings {
            music_volume: 98,
            ..Settings::default()
        };
        let patch = SettingsField::MusicVolume.adjust(&s, true).unwrap();
        assert_eq!(patch.music_volume, Some(103));
        s.apply(&patch);
        assert_eq!(s.music_volume, 100);
    }

    #[test]
    fn test_toggle_flips() {
        let s = Settings::default();
        let patch = SettingsField::NightMode.adjust(&s, false).unwrap();
        assert_eq!(patch.night_mode, Some(true));
        assert!(SettingsField::Back.adjust(&s, true).is_none());
    }

    #[test]
    fn test_values_render() {
        let s = Settings::default();
        assert_eq!(SettingsField::Difficulty.value(&s), "Normal");
        assert_eq!(SettingsField::MusicVolume.value(&s), "70%");
        assert_eq!(SettingsField::Music.value(&s), "ON");
        assert_eq!(SettingsField::NightMode.value(&s), "OFF");
    }
}
