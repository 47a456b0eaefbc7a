use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::engine::MASK_GLYPH;
use crate::session::SessionView;
use crate::ui::theme::Theme;

pub struct SentenceArea<'a> {
    view: &'a SessionView<'a>,
    theme: &'a Theme,
}

impl<'a> SentenceArea<'a> {
    pub fn new(view: &'a SessionView<'a>, theme: &'a Theme) -> Self {
        Self { view, theme }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shown {
    /// Whole word answered.
    Word,
    /// A letter or symbol the reveal policy exposes inside an unanswered word.
    Partial,
    Hidden,
    Space,
}

struct RenderToken {
    display: char,
    shown: Shown,
}

/// Classify each displayed char of `masked` against its `original` word.
fn build_render_tokens(masked: &str, original: &str) -> Vec<RenderToken> {
    let mut tokens = Vec::new();
    let originals: Vec<&str> = original.split_whitespace().collect();

    for (i, word) in masked.split_whitespace().enumerate() {
        if i > 0 {
            tokens.push(RenderToken {
                display: ' ',
                shown: Shown::Space,
            });
        }
        let target = originals.get(i).copied().unwrap_or("");
        if word == target {
            tokens.extend(word.chars().map(|ch| RenderToken {
                display: ch,
                shown: Shown::Word,
            }));
            continue;
        }
        for (ch, target_ch) in word.chars().zip(target.chars().chain(std::iter::repeat('\0'))) {
            let shown = if ch == MASK_GLYPH && target_ch != MASK_GLYPH {
                Shown::Hidden
            } else {
                Shown::Partial
            };
            tokens.push(RenderToken { display: ch, shown });
        }
    }

    tokens
}

impl Widget for SentenceArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let view = self.view;

        let spans: Vec<Span> = build_render_tokens(view.masked, &view.entry.english)
            .into_iter()
            .map(|token| {
                let style = match token.shown {
                    Shown::Word => Style::default()
                        .fg(colors.text_revealed())
                        .add_modifier(Modifier::BOLD),
                    Shown::Partial => Style::default().fg(colors.text_hint()),
                    Shown::Hidden | Shown::Space => Style::default().fg(colors.text_masked()),
                };
                Span::styled(token.display.to_string(), style)
            })
            .collect();

        let mut lines = vec![
            Line::from(Span::styled(
                view.entry.korean.clone(),
                Style::default().fg(colors.text_korean()),
            )),
            Line::from(""),
            Line::from(spans),
            Line::from(""),
        ];

        if view.solved {
            lines.push(Line::from(Span::styled(
                t!("dictation.solved").to_string(),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )));
        }

        let title = if view.entry.id.is_empty() {
            format!(" {} / {} ", view.index + 1, view.total)
        } else {
            format!(" {} / {}  #{} ", view.index + 1, view.total, view.entry.id)
        };

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
