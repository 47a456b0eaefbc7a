mod app;
mod config;
mod dataset;
mod engine;
mod event;
mod session;
mod tts;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;
use tracing_subscriber::EnvFilter;

use app::{App, AppScreen, SettingsField, StatusKind};
use config::Config;
use event::{AppEvent, EventHandler};
use ui::components::progress_bar::ProgressBar;
use ui::components::sentence_area::SentenceArea;
use ui::components::session_sidebar::SessionSidebar;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::line_input::{InputResult, LineInput};
use ui::theme::Theme;

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(name = "dictr", version, about = "English dictation trainer for the terminal")]
struct Cli {
    #[arg(help = "Dataset to open (csv, tsv, txt, xlsx, xlsm, xlsb, xls, ods)")]
    file: Option<PathBuf>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Interface language (en, ko)")]
    locale: Option<String>,

    #[arg(long, help = "Start with every character masked")]
    hide_all: bool,

    #[arg(long, help = "Start with every sentence revealed")]
    reveal_all: bool,

    #[arg(long, help = "Mask punctuation as well as letters")]
    hide_punctuation: bool,

    #[arg(long, help = "Mask digits as well as letters")]
    hide_numbers: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = init_logging();

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "config unreadable, using defaults");
        Config::default()
    });
    config.validate(&Theme::available_themes());
    if let Some(locale) = cli.locale {
        config.locale = locale;
        config.validate(&[]);
    }

    let mut app = App::new(config);

    if let Some(theme_name) = cli.theme {
        match Theme::load(&theme_name) {
            Some(theme) => app.set_theme(theme),
            None => tracing::warn!(theme = %theme_name, "unknown theme"),
        }
    }
    if cli.hide_all {
        app.default_toggles.hide_all = true;
        app.default_toggles.reveal_all = false;
    }
    if cli.reveal_all {
        app.default_toggles.toggle_reveal_all();
    }
    if cli.hide_punctuation {
        app.default_toggles.show_punctuation = false;
    }
    if cli.hide_numbers {
        app.default_toggles.show_numbers = false;
    }
    if let Some(file) = cli.file {
        app.open_dataset(&file);
    }

    tracing::info!(log = ?log_path, "dictr starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(?err, "dictr exited with error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Log to `<data dir>/dictr/dictr.log`; stdout belongs to the TUI. Filter with
/// `DICTR_LOG`, e.g. `DICTR_LOG=dictr=debug`.
fn init_logging() -> Option<PathBuf> {
    let dir = dirs::data_dir()?.join("dictr");
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join("dictr.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    let filter = EnvFilter::try_from_env("DICTR_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Some(path)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::OpenDataset => handle_open_key(app, key),
        AppScreen::Dictation => handle_dictation_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => app.run_menu_action(app.menu.selected_action()),
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                app.run_menu_action(action);
            }
        }
        _ => {}
    }
}

fn handle_open_key(app: &mut App, key: KeyEvent) {
    match app.path_input.handle(key) {
        InputResult::Submit => app.submit_path(),
        InputResult::Cancel => app.go_to_menu(),
        InputResult::Continue => {}
    }
}

fn handle_dictation_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Tab => app.request_hint(),
        KeyCode::PageUp => app.prev(),
        KeyCode::PageDown => app.next(),
        KeyCode::Up if ctrl => app.prev(),
        KeyCode::Down if ctrl => app.next(),
        KeyCode::Home if ctrl => app.first(),
        KeyCode::End if ctrl => app.last(),
        KeyCode::Char('p') if ctrl => app.play_audio(),
        KeyCode::F(2) => app.toggle_reveal_all(),
        KeyCode::F(3) => app.toggle_hide_all(),
        KeyCode::F(4) => app.toggle_punctuation(),
        KeyCode::F(5) => app.toggle_numbers(),
        _ => {
            if app.answer.handle(key) == InputResult::Submit {
                app.submit_answer();
            }
        }
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.save_settings();
            app.go_to_menu();
        }
        KeyCode::Up | KeyCode::Char('k') => app.settings_up(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_down(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle_forward(),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle_backward(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::OpenDataset => render_open_dataset(frame, app),
        AppScreen::Dictation => render_dictation(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn header_line<'a>(app: &App, title: &'a str, info: String) -> Paragraph<'a> {
    let colors = &app.theme.colors;
    Paragraph::new(Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default().fg(colors.text_masked()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()))
}

/// Status message if there is one, otherwise packed key hints.
fn footer_lines(app: &App, hints: &[String], width: u16) -> Vec<Line<'static>> {
    let colors = &app.theme.colors;
    if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => colors.accent(),
            StatusKind::Success => colors.success(),
            StatusKind::Error => colors.error(),
        };
        return vec![Line::from(Span::styled(
            format!(" {}", status.text),
            Style::default().fg(color),
        ))];
    }
    pack_hint_lines(hints, width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_masked()))))
        .collect()
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, hints: &[String], area: Rect) {
    let lines = footer_lines(app, hints, area.width);
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let info = match &app.session {
        Some(session) => format!(
            " {} | {}",
            session.dataset().id().display_name(),
            t!(
                "header.solved",
                solved = session.solved_count(),
                total = session.dataset().len()
            )
        ),
        None => String::new(),
    };
    frame.render_widget(header_line(app, " dictr ", info), layout[0]);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    let hints = vec![
        t!("hints.menu_move").to_string(),
        t!("hints.menu_select").to_string(),
        t!("hints.quit").to_string(),
    ];
    render_footer(frame, app, &hints, layout[2]);
}

fn render_line_input(input: &LineInput, app: &App, prompt: &str) -> Line<'static> {
    let colors = &app.theme.colors;
    let (before, cursor_ch, after) = input.render_parts();
    let cursor_style = Style::default()
        .fg(colors.input_cursor_fg())
        .bg(colors.input_cursor_bg());
    Line::from(vec![
        Span::styled(prompt.to_string(), Style::default().fg(colors.accent())),
        Span::styled(before.to_string(), Style::default().fg(colors.fg())),
        Span::styled(cursor_ch.unwrap_or(' ').to_string(), cursor_style),
        Span::styled(after.to_string(), Style::default().fg(colors.fg())),
    ])
}

fn render_open_dataset(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let centered = ui::layout::centered_rect(70, 40, area);

    let block = Block::bordered()
        .title(format!(" {} ", t!("open.title")))
        .border_style(Style::default().fg(colors.border_focused()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let mut lines = vec![
        Line::from(Span::styled(
            t!("open.help").to_string(),
            Style::default().fg(colors.text_masked()),
        )),
        Line::from(""),
        render_line_input(&app.path_input, app, "> "),
    ];
    if app.path_input.completion_error {
        lines.push(Line::from(Span::styled(
            t!("open.completion_error").to_string(),
            Style::default().fg(colors.warning()),
        )));
    }
    Paragraph::new(lines).render(inner, frame.buffer_mut());

    let footer_area = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
    let hints = vec![
        t!("hints.open_complete").to_string(),
        t!("hints.open_submit").to_string(),
        t!("hints.back").to_string(),
    ];
    render_footer(frame, app, &hints, footer_area);
}

fn dictation_hints() -> Vec<String> {
    vec![
        t!("hints.submit").to_string(),
        t!("hints.hint").to_string(),
        t!("hints.prev_next").to_string(),
        t!("hints.first_last").to_string(),
        t!("hints.play").to_string(),
        t!("hints.toggles").to_string(),
        t!("hints.back").to_string(),
    ]
}

fn render_dictation(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let Some(session) = app.session.as_ref() else {
        return;
    };
    let Some(view) = session.view() else {
        return;
    };

    let hints = dictation_hints();
    let footer_height = if app.status.is_some() {
        1
    } else {
        pack_hint_lines(&hints, area.width as usize).len().max(1) as u16
    };
    let app_layout = AppLayout::new(area, footer_height);
    let tier = app_layout.tier;

    let name = session.dataset().id().display_name();
    let info = if tier.show_sidebar() {
        String::new()
    } else {
        format!(
            " {} / {} | {} | {}",
            view.index + 1,
            view.total,
            t!("header.solved", solved = view.solved_count, total = view.total),
            t!("header.hint", level = view.hint_level, max = view.max_hint_level)
        )
    };
    frame.render_widget(header_line(app, &format!(" {name} "), info), app_layout.header);

    let show_progress = tier.show_progress_bar(area.height);
    let mut constraints = vec![Constraint::Min(5), Constraint::Length(3)];
    if show_progress {
        constraints.push(Constraint::Length(3));
    }
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(app_layout.main);

    frame.render_widget(SentenceArea::new(&view, app.theme), main_layout[0]);

    let answer_block = Block::bordered()
        .title(format!(" {} ", t!("dictation.answer")))
        .border_style(Style::default().fg(colors.border_focused()));
    let answer_inner = answer_block.inner(main_layout[1]);
    answer_block.render(main_layout[1], frame.buffer_mut());
    Paragraph::new(render_line_input(&app.answer, app, ""))
        .render(answer_inner, frame.buffer_mut());

    if show_progress {
        let bar = ProgressBar::new(
            &t!("dictation.progress"),
            session.progress(),
            format!("{} / {}", view.index + 1, view.total),
            app.theme,
        );
        frame.render_widget(bar, main_layout[2]);
    }

    if let Some(sidebar_area) = app_layout.sidebar {
        let sidebar = SessionSidebar::new(&view, session.toggles(), app.audio_state(), app.theme);
        frame.render_widget(sidebar, sidebar_area);
    }

    render_footer(frame, app, &hints, app_layout.footer);
}

fn settings_label(field: SettingsField) -> String {
    match field {
        SettingsField::Theme => t!("settings.theme").to_string(),
        SettingsField::Locale => t!("settings.locale").to_string(),
        SettingsField::ShowPunctuation => t!("options.punctuation").to_string(),
        SettingsField::ShowNumbers => t!("options.numbers").to_string(),
        SettingsField::HideAll => t!("options.hide_all").to_string(),
        SettingsField::Tts => t!("settings.tts").to_string(),
    }
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 80, area);

    let block = Block::bordered()
        .title(format!(" {} ", t!("settings.title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let fields = SettingsField::ALL;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    Paragraph::new(Line::from(Span::styled(
        format!("  {}", t!("settings.help")),
        Style::default().fg(colors.text_masked()),
    )))
    .render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = if is_selected {
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        let value_style = Style::default().fg(if is_selected {
            colors.text_hint()
        } else {
            colors.text_masked()
        });

        let lines = vec![
            Line::from(Span::styled(
                format!("{indicator}{}:", settings_label(*field)),
                label_style,
            )),
            Line::from(Span::styled(
                format!("  < {} >", app.settings_value(*field)),
                value_style,
            )),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let footer = Paragraph::new(footer_lines(
        app,
        &[t!("hints.settings").to_string()],
        layout[3].width,
    ));
    footer.render(layout[3], frame.buffer_mut());
}
