use std::io::{self, Write};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use scoreboard_terminal::config::Config;
use scoreboard_terminal::countdown::format_time;
use scoreboard_terminal::logging;
use scoreboard_terminal::notify::{Notice, Notifier, confirm_message};
use scoreboard_terminal::persist::{FileStore, MemoryStore};
use scoreboard_terminal::score::{Pair, Sport, Team};
use scoreboard_terminal::state::{
    Action, AppState, Prompt, Screen, Theme, apply_action, ask_label,
};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if self.state.prompt().is_some() {
            self.on_prompt_key(key);
            return;
        }
        if key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }
        if let Some(action) = key_action(self.state.screen, key.code) {
            apply_action(&mut self.state, action, now);
        }
    }

    fn on_prompt_key(&mut self, key: KeyEvent) {
        let is_input = matches!(self.state.prompt(), Some(Prompt::Input { .. }));
        match key.code {
            KeyCode::Enter => self.state.accept_prompt(),
            KeyCode::Esc => self.state.cancel_prompt(),
            KeyCode::Backspace if is_input => self.state.prompt_backspace(),
            KeyCode::Char(ch) if is_input => self.state.prompt_input(ch),
            KeyCode::Char('y') | KeyCode::Char('Y') => self.state.accept_prompt(),
            KeyCode::Char('n') | KeyCode::Char('N') => self.state.cancel_prompt(),
            _ => {}
        }
    }
}

fn key_action(screen: Screen, code: KeyCode) -> Option<Action> {
    let global = match code {
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('T') => Some(Action::ToggleTheme),
        _ => None,
    };
    if global.is_some() {
        return global;
    }

    if screen == Screen::Menu {
        return match code {
            KeyCode::Char('1') | KeyCode::Char('v') => Some(Action::Open(Screen::Volleyball)),
            KeyCode::Char('2') | KeyCode::Char('f') => Some(Action::Open(Screen::Futsal)),
            _ => None,
        };
    }

    let action = match code {
        KeyCode::Esc | KeyCode::Char('b') => Action::Back,
        KeyCode::Char('a') => Action::Score(Team::A),
        KeyCode::Char('z') => Action::Unscore(Team::A),
        KeyCode::Char('k') => Action::Score(Team::B),
        KeyCode::Char('m') => Action::Unscore(Team::B),
        KeyCode::Char('u') => Action::Undo,
        KeyCode::Char('r') => Action::Reset,
        KeyCode::Char('e') => Action::Rename(Team::A),
        KeyCode::Char('i') => Action::Rename(Team::B),
        KeyCode::Char('s') if screen == Screen::Futsal => Action::Foul(Team::A),
        KeyCode::Char('x') if screen == Screen::Futsal => Action::Unfoul(Team::A),
        KeyCode::Char('j') if screen == Screen::Futsal => Action::Foul(Team::B),
        KeyCode::Char('n') if screen == Screen::Futsal => Action::Unfoul(Team::B),
        KeyCode::Char(' ') if screen == Screen::Futsal => Action::ToggleTimer,
        KeyCode::Char('t') if screen == Screen::Futsal => Action::SetTime,
        _ => return None,
    };
    Some(action)
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = Config::from_env();
    if let Err(err) = logging::init(config.data_dir.as_deref(), &config.log_filter) {
        eprintln!("warning: logging disabled: {err:#}");
    }
    tracing::info!(?config, "starting scoreboard");

    let (notifier, rx) = Notifier::channel();
    let state = match (&config.data_dir, config.ephemeral) {
        (Some(dir), false) => {
            AppState::new(FileStore::in_dir(dir), notifier, config.period_secs())
        }
        _ => AppState::new(MemoryStore::new(), notifier, config.period_secs()),
    };
    let mut app = App {
        state,
        should_quit: false,
    };

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &rx, config.tick);
    app.state.suspend();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(%err, "terminal loop failed");
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &Receiver<Notice>,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        app.state.drain(rx);
        if std::mem::take(&mut app.state.bell_pending) {
            let mut out = io::stdout();
            out.write_all(b"\x07")?;
            out.flush()?;
        }

        terminal.draw(|f| ui(f, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.on_key(key, Instant::now());
                }
                Event::FocusLost => app.state.suspend(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.state.futsal.tick(Instant::now());
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    dim: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            fg: Color::White,
            bg: Color::Black,
            accent: Color::Yellow,
            dim: Color::DarkGray,
        },
        Theme::Light => Palette {
            fg: Color::Black,
            bg: Color::White,
            accent: Color::Blue,
            dim: Color::Gray,
        },
    }
}

fn ui(frame: &mut Frame, state: &AppState) {
    let colors = palette(state.theme);
    let base = Style::default().fg(colors.fg).bg(colors.bg);
    frame.render_widget(Block::default().style(base), frame.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(format!(" {}", state.title().to_uppercase()))
        .style(base.fg(colors.accent).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match state.screen {
        Screen::Menu => render_menu(frame, chunks[1], &colors),
        Screen::Volleyball => render_volleyball(frame, chunks[1], state, &colors),
        Screen::Futsal => render_futsal(frame, chunks[1], state, &colors),
    }

    let log_lines: Vec<&str> = state.logs.iter().rev().take(2).map(String::as_str).collect();
    let logs = Paragraph::new(log_lines.join("\n"))
        .style(base.fg(colors.dim))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(logs, chunks[2]);

    let footer = Paragraph::new(footer_text(state.screen))
        .style(base.fg(colors.dim))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
    if let Some(prompt) = state.prompt() {
        render_prompt(frame, frame.size(), prompt, state);
    }
}

fn footer_text(screen: Screen) -> &'static str {
    match screen {
        Screen::Menu => "1 Volleyball | 2 Futsal | T Theme | ? Help | q Quit",
        Screen::Volleyball => {
            "a/z A +/- | k/m B +/- | u Undo | r Reset | e/i Rename | Esc Back | ? Help | q Quit"
        }
        Screen::Futsal => {
            "a/z k/m Goals | s/x j/n Fouls | Space Clock | t Time | u Undo | r Reset | Esc Back | ? Help"
        }
    }
}

fn render_menu(frame: &mut Frame, area: Rect, colors: &Palette) {
    let text = [
        "",
        "Choose a sport",
        "",
        "[1] Volleyball",
        "[2] Futsal",
    ]
    .join("\n");
    let menu = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors.fg).bg(colors.bg));
    frame.render_widget(menu, area);
}

fn render_volleyball(frame: &mut Frame, area: Rect, state: &AppState, colors: &Palette) {
    let game = state.volleyball.state();
    let names = state.names.for_sport(Sport::Volleyball);
    let sides = team_columns(area);

    for (team, side) in [(Team::A, sides[0]), (Team::B, sides[1])] {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                game.scores[team].to_string(),
                Style::default()
                    .fg(colors.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Sets: {}", game.sets[team])),
        ];
        render_team(frame, side, &names[team], lines, colors);
    }

    let status = if game.is_tie_break() {
        format!("Tie-break to {}", game.point_limit())
    } else {
        format!("Set {} to {}", game.sets.total() + 1, game.point_limit())
    };
    frame.render_widget(
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .style(Style::default().fg(colors.dim).bg(colors.bg)),
        sides[2],
    );
}

fn render_futsal(frame: &mut Frame, area: Rect, state: &AppState, colors: &Palette) {
    let futsal = &state.futsal;
    let names = state.names.for_sport(Sport::Futsal);
    let sides = team_columns(area);

    for (team, side) in [(Team::A, sides[0]), (Team::B, sides[1])] {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                futsal.scores()[team].to_string(),
                Style::default()
                    .fg(colors.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            foul_line(futsal.fouls(), team, colors),
        ];
        render_team(frame, side, &names[team], lines, colors);
    }

    let clock_style = if futsal.is_paused() {
        Style::default().fg(colors.dim).bg(colors.bg)
    } else {
        Style::default()
            .fg(colors.accent)
            .bg(colors.bg)
            .add_modifier(Modifier::BOLD)
    };
    let suffix = if futsal.is_paused() { " (paused)" } else { "" };
    frame.render_widget(
        Paragraph::new(format!("{}{suffix}", format_time(futsal.timer())))
            .alignment(Alignment::Center)
            .style(clock_style),
        sides[2],
    );
}

fn foul_line(fouls: Pair<u32>, team: Team, colors: &Palette) -> Line<'static> {
    let count = fouls[team];
    let style = if count >= 5 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors.fg)
    };
    Line::from(Span::styled(format!("Fouls: {count}"), style))
}

fn team_columns(area: Rect) -> Vec<Rect> {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    vec![cols[0], cols[1], rows[1]]
}

fn render_team(frame: &mut Frame, area: Rect, name: &str, lines: Vec<Line>, colors: &Palette) {
    let block = Block::default()
        .title(format!(" {name} "))
        .borders(Borders::ALL)
        .style(Style::default().fg(colors.fg).bg(colors.bg));
    let body = Paragraph::new(lines).alignment(Alignment::Center).block(block);
    frame.render_widget(body, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, prompt: &Prompt, state: &AppState) {
    let popup_area = centered_rect(50, 30, area);
    frame.render_widget(Clear, popup_area);

    let (title, text) = match prompt {
        Prompt::Alert(msg) => ("Notice", format!("{msg}\n\n[Enter] OK")),
        Prompt::Confirm(confirm) => (
            "Confirm",
            format!("{}\n\n[y] Yes   [n] No", confirm_message(*confirm)),
        ),
        Prompt::Input { ask, buffer } => (
            "Input",
            format!(
                "{}\n\n> {buffer}_\n\n[Enter] OK   [Esc] Cancel",
                ask_label(*ask, &state.names)
            ),
        ),
    };
    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(popup, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Scoreboard - Help",
        "",
        "Global:",
        "  1 / 2        Volleyball / Futsal (menu)",
        "  b / Esc      Back to menu",
        "  T            Toggle theme",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Match:",
        "  a / z        Team A +1 / -1",
        "  k / m        Team B +1 / -1",
        "  e / i        Rename team A / B",
        "  u            Undo",
        "  r            Reset match",
        "",
        "Futsal:",
        "  s / x        Team A foul +1 / -1",
        "  j / n        Team B foul +1 / -1",
        "  Space        Start / pause clock",
        "  t            Set period length",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
