//! Home and pause menus.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeItem {
    Play,
    Settings,
    Quit,
}

impl HomeItem {
    pub const ALL: [HomeItem; 3] = [HomeItem::Play, HomeItem::Settings, HomeItem::Quit];

    fn label(&self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Settings => "Settings",
            Self::Quit => "Quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseItem {
    Resume,
    Settings,
    Restart,
    MainMenu,
}

impl PauseItem {
    pub const ALL: [PauseItem; 4] = [
        PauseItem::Resume,
        PauseItem::Settings,
        PauseItem::Restart,
        PauseItem::MainMenu,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Resume => "Resume",
            Self::Settings => "Settings",
            Self::Restart => "Restart",
            Self::MainMenu => "Main Menu",
        }
    }
}

/// Vertical menu cursor.
#[derive(Debug, Clone, Copy, Default)]
pub struct MenuCursor {
    pub selected: usize,
}

impl MenuCursor {
    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn navigate_down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn home_item(&self) -> HomeItem {
        HomeItem::ALL[self.selected.min(HomeItem::ALL.len() - 1)]
    }

    pub fn pause_item(&self) -> PauseItem {
        PauseItem::ALL[self.selected.min(PauseItem::ALL.len() - 1)]
    }
}

const TITLE: [&str; 3] = [
    "╔═╗╦  ╔═╗╔═╗  ╔═╗╔╦╗╔╦╗╔═╗╔═╗╦╔═",
    "╠╣ ║  ╠═╣╠═╝  ╠═╣ ║  ║ ╠═╣║  ╠╩╗",
    "╚  ╩═╝╩ ╩╩    ╩ ╩ ╩  ╩ ╩ ╩╚═╝╩ ╩",
];

pub fn draw_home(frame: &mut Frame, area: Rect, cursor: &MenuCursor) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(""), Line::from("")];
    for row in TITLE {
        lines.push(Line::from(Span::styled(
            row,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(""));
    lines.extend(item_lines(
        HomeItem::ALL.iter().map(|i| i.label()),
        cursor.selected,
    ));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[↑/↓] Select  [Enter] Confirm  [Q] Quit",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Pause menu drawn over the play area.
pub fn draw_pause(frame: &mut Frame, area: Rect, cursor: &MenuCursor) {
    let width = 30.min(area.width);
    let height = 10.min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" PAUSED ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = vec![Line::from("")];
    lines.extend(item_lines(
        PauseItem::ALL.iter().map(|i| i.label()),
        cursor.selected,
    ));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn item_lines<'a>(labels: impl Iterator<Item = &'a str>, selected: usize) -> Vec<Line<'a>> {
    labels
        .enumerate()
        .map(|(i, label)| {
            if i == selected {
                Line::from(Span::styled(
                    format!("▶ {} ◀", label),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(label, Style::default().fg(Color::White)))
            }
        })
        .collect()
}
