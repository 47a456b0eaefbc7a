use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    OpenDataset,
    Continue,
    Settings,
    Quit,
}

pub struct MenuItem {
    pub key: char,
    pub action: MenuAction,
}

impl MenuItem {
    fn label(&self) -> String {
        match self.action {
            MenuAction::OpenDataset => t!("menu.open").to_string(),
            MenuAction::Continue => t!("menu.continue").to_string(),
            MenuAction::Settings => t!("menu.settings").to_string(),
            MenuAction::Quit => t!("menu.quit").to_string(),
        }
    }

    fn description(&self) -> String {
        match self.action {
            MenuAction::OpenDataset => t!("menu.open_desc").to_string(),
            MenuAction::Continue => t!("menu.continue_desc").to_string(),
            MenuAction::Settings => t!("menu.settings_desc").to_string(),
            MenuAction::Quit => t!("menu.quit_desc").to_string(),
        }
    }
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
    /// Name of the loaded dataset, shown under the title.
    pub loaded: Option<String>,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: vec![
                MenuItem { key: 'o', action: MenuAction::OpenDataset },
                MenuItem { key: 'c', action: MenuAction::Continue },
                MenuItem { key: 's', action: MenuAction::Settings },
                MenuItem { key: 'q', action: MenuAction::Quit },
            ],
            selected: 0,
            theme,
            loaded: None,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_action(&self) -> MenuAction {
        self.items[self.selected].action
    }

    pub fn action_for_key(&self, key: char) -> Option<MenuAction> {
        self.items.iter().find(|item| item.key == key).map(|item| item.action)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let loaded_line = match &self.loaded {
            Some(name) => Line::from(Span::styled(
                t!("menu.loaded", name = name).to_string(),
                Style::default().fg(colors.text_korean()),
            )),
            None => Line::from(Span::styled(
                t!("menu.nothing_loaded").to_string(),
                Style::default().fg(colors.text_masked()),
            )),
        };

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "dictr",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("app.subtitle").to_string(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            loaded_line,
        ];

        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        title.render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let label_style = if is_selected {
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            let lines = vec![
                Line::from(Span::styled(
                    format!(" {indicator} [{}] {}", item.key, item.label()),
                    label_style,
                )),
                Line::from(Span::styled(
                    format!("     {}", item.description()),
                    Style::default().fg(colors.text_masked()),
                )),
            ];

            if let Some(rect) = menu_layout.get(i) {
                Paragraph::new(lines).render(*rect, buf);
            }
        }
    }
}
