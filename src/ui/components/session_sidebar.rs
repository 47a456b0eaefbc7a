use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::policy::RevealToggles;
use crate::session::SessionView;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioState {
    /// TTS turned off or unavailable.
    Off,
    /// Nothing generated for this sentence yet.
    Idle,
    /// A clip for this sentence exists.
    Ready,
}

pub struct SessionSidebar<'a> {
    view: &'a SessionView<'a>,
    toggles: RevealToggles,
    audio: AudioState,
    theme: &'a Theme,
}

impl<'a> SessionSidebar<'a> {
    pub fn new(
        view: &'a SessionView<'a>,
        toggles: RevealToggles,
        audio: AudioState,
        theme: &'a Theme,
    ) -> Self {
        Self {
            view,
            toggles,
            audio,
            theme,
        }
    }
}

fn checkbox(on: bool) -> &'static str {
    if on { "[x]" } else { "[ ]" }
}

impl Widget for SessionSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let view = self.view;

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(8)])
            .split(area);

        // Session counters
        {
            let label = Style::default().fg(colors.fg());
            let value = Style::default().fg(colors.accent());
            let lines = vec![
                Line::from(vec![
                    Span::styled(format!("{} ", t!("sidebar.sentence")), label),
                    Span::styled(format!("{} / {}", view.index + 1, view.total), value),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::styled(format!("{} ", t!("sidebar.words")), label),
                    Span::styled(format!("{} / {}", view.revealed_words, view.word_count), value),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::styled(format!("{} ", t!("sidebar.solved")), label),
                    Span::styled(
                        format!("{} / {}", view.solved_count, view.total),
                        Style::default().fg(colors.success()),
                    ),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::styled(format!("{} ", t!("sidebar.hint")), label),
                    Span::styled(
                        format!("{} / {}", view.hint_level, view.max_hint_level),
                        Style::default().fg(colors.text_hint()),
                    ),
                ]),
            ];

            let block = Block::bordered()
                .title(format!(" {} ", t!("sidebar.session")))
                .border_style(Style::default().fg(colors.border()))
                .style(Style::default().bg(colors.bg()));
            Paragraph::new(lines).block(block).render(sections[0], buf);
        }

        // Reveal options as the user set them; the effective policy may differ
        {
            let row = |key: &str, on: bool, text: String| {
                let style = if on {
                    Style::default().fg(colors.accent())
                } else {
                    Style::default().fg(colors.text_masked())
                };
                Line::from(vec![
                    Span::styled(format!("{key:<3} "), Style::default().fg(colors.accent_dim())),
                    Span::styled(format!("{} {text}", checkbox(on)), style),
                ])
            };

            let (audio_text, audio_color) = match self.audio {
                AudioState::Off => (t!("sidebar.audio_off"), colors.text_masked()),
                AudioState::Idle => (t!("sidebar.audio_idle"), colors.fg()),
                AudioState::Ready => (t!("sidebar.audio_ready"), colors.success()),
            };

            let lines = vec![
                row("F2", self.toggles.reveal_all, t!("options.reveal_all").to_string()),
                row("F3", self.toggles.hide_all, t!("options.hide_all").to_string()),
                row("F4", self.toggles.show_punctuation, t!("options.punctuation").to_string()),
                row("F5", self.toggles.show_numbers, t!("options.numbers").to_string()),
                Line::from(""),
                Line::from(vec![
                    Span::styled(
                        format!("{} ", t!("sidebar.audio")),
                        Style::default().fg(colors.fg()),
                    ),
                    Span::styled(audio_text.to_string(), Style::default().fg(audio_color)),
                ]),
            ];

            let block = Block::bordered()
                .title(format!(" {} ", t!("sidebar.options")))
                .border_style(Style::default().fg(colors.border()))
                .style(Style::default().bg(colors.bg()));
            Paragraph::new(lines).block(block).render(sections[1], buf);
        }
    }
}
