use std::collections::VecDeque;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::futsal::Futsal;
use crate::notify::{Alert, Ask, Confirm, Cue, Feedback, Notice, Notifier, alert_message};
use crate::persist::{self, Store};
use crate::score::{Pair, Sport, Team, sport_label};
use crate::volleyball::Volleyball;

const THEME_KEY: &str = "theme";
const NAMES_KEY: &str = "names";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Volleyball,
    Futsal,
}

impl Screen {
    pub fn sport(self) -> Option<Sport> {
        match self {
            Screen::Menu => None,
            Screen::Volleyball => Some(Sport::Volleyball),
            Screen::Futsal => Some(Sport::Futsal),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Alert(String),
    Confirm(Confirm),
    Input { ask: Ask, buffer: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamNames {
    pub volleyball: Pair<String>,
    pub futsal: Pair<String>,
}

impl Default for TeamNames {
    fn default() -> Self {
        let pair = || Pair::new("Team A".to_string(), "Team B".to_string());
        Self {
            volleyball: pair(),
            futsal: pair(),
        }
    }
}

impl TeamNames {
    pub fn for_sport(&self, sport: Sport) -> &Pair<String> {
        match sport {
            Sport::Volleyball => &self.volleyball,
            Sport::Futsal => &self.futsal,
        }
    }

    fn for_sport_mut(&mut self, sport: Sport) -> &mut Pair<String> {
        match sport {
            Sport::Volleyball => &mut self.volleyball,
            Sport::Futsal => &mut self.futsal,
        }
    }
}

/// User intents, already mapped from keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open(Screen),
    Back,
    ToggleTheme,
    ToggleHelp,
    Score(Team),
    Unscore(Team),
    Foul(Team),
    Unfoul(Team),
    ToggleTimer,
    SetTime,
    Rename(Team),
    Reset,
    Undo,
}

pub struct AppState {
    pub screen: Screen,
    pub theme: Theme,
    pub names: TeamNames,
    pub prompts: VecDeque<Prompt>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub bell_pending: bool,
    pub volleyball: Volleyball,
    pub futsal: Futsal,
    store: Box<dyn Store>,
}

impl AppState {
    pub fn new<S>(store: S, notifier: Notifier, period_secs: u32) -> Self
    where
        S: Store + Clone + 'static,
    {
        let theme = persist::load::<Theme>(&store, THEME_KEY).unwrap_or(Theme::Dark);
        let names = persist::load::<TeamNames>(&store, NAMES_KEY).unwrap_or_default();
        let volleyball = Volleyball::load(Box::new(store.clone()), notifier.clone());
        let futsal = Futsal::load(Box::new(store.clone()), notifier, period_secs);
        Self {
            screen: Screen::Menu,
            theme,
            names,
            prompts: VecDeque::new(),
            logs: VecDeque::new(),
            help_overlay: false,
            bell_pending: false,
            volleyball,
            futsal,
            store: Box::new(store),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.screen.sport() {
            Some(sport) => sport_label(sport),
            None => "Scoreboard",
        }
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompts.front()
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn drain(&mut self, rx: &Receiver<Notice>) {
        while let Ok(notice) = rx.try_recv() {
            apply_notice(self, notice);
        }
    }

    pub fn open(&mut self, screen: Screen) {
        if self.screen == Screen::Futsal && screen != Screen::Futsal {
            self.futsal.suspend();
        }
        self.screen = screen;
    }

    /// Called when the scoreboard is hidden or about to exit.
    pub fn suspend(&mut self) {
        self.futsal.suspend();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
        persist::save_or_warn(self.store.as_ref(), THEME_KEY, &self.theme);
    }

    pub fn accept_prompt(&mut self) {
        let Some(prompt) = self.prompts.pop_front() else {
            return;
        };
        match prompt {
            Prompt::Alert(_) => {}
            Prompt::Confirm(Confirm::ResetVolleyball) => {
                self.volleyball.reset();
                self.push_log("[INFO] Volleyball match reset");
            }
            Prompt::Confirm(Confirm::ResetFutsal) => {
                self.futsal.reset();
                self.push_log("[INFO] Futsal match reset");
            }
            Prompt::Input { ask, buffer } => {
                if buffer.trim().is_empty() {
                    // Nothing typed yet; keep asking.
                    self.prompts.push_front(Prompt::Input { ask, buffer });
                    return;
                }
                self.answer(ask, &buffer);
            }
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.prompts.pop_front();
    }

    pub fn prompt_input(&mut self, ch: char) {
        if let Some(Prompt::Input { ask, buffer }) = self.prompts.front_mut() {
            let accepted = match ask {
                Ask::Minutes { .. } => ch.is_ascii_digit(),
                Ask::TeamName { .. } => !ch.is_control(),
            };
            if accepted && buffer.chars().count() < 24 {
                buffer.push(ch);
            }
        }
    }

    pub fn prompt_backspace(&mut self) {
        if let Some(Prompt::Input { buffer, .. }) = self.prompts.front_mut() {
            buffer.pop();
        }
    }

    pub fn report(&mut self, err: MatchError) {
        tracing::debug!(%err, "operation rejected");
        self.show_alert(Alert::Rejected(err));
    }

    fn show_alert(&mut self, alert: Alert) {
        let msg = alert_message(&alert);
        self.push_log(format!("[INFO] {msg}"));
        self.prompts.push_back(Prompt::Alert(msg));
    }

    fn answer(&mut self, ask: Ask, input: &str) {
        match ask {
            Ask::Minutes { .. } => match self.futsal.set_time(input) {
                Ok(()) => self.push_log(format!("[INFO] Clock set to {} min", input.trim())),
                Err(err) => self.report(err),
            },
            Ask::TeamName { sport, team } => {
                let name = input.trim();
                if name.is_empty() {
                    return;
                }
                self.names.for_sport_mut(sport)[team] = name.to_string();
                persist::save_or_warn(self.store.as_ref(), NAMES_KEY, &self.names);
            }
        }
    }
}

pub fn apply_action(state: &mut AppState, action: Action, now: Instant) {
    match action {
        Action::Open(screen) => state.open(screen),
        Action::Back => state.open(Screen::Menu),
        Action::ToggleTheme => state.toggle_theme(),
        Action::ToggleHelp => state.help_overlay = !state.help_overlay,
        Action::Rename(team) => {
            if let Some(sport) = state.screen.sport() {
                state.prompts.push_back(Prompt::Input {
                    ask: Ask::TeamName { sport, team },
                    buffer: String::new(),
                });
            }
        }
        _ => match state.screen {
            Screen::Menu => {}
            Screen::Volleyball => apply_volleyball(state, action),
            Screen::Futsal => apply_futsal(state, action, now),
        },
    }
}

fn apply_volleyball(state: &mut AppState, action: Action) {
    match action {
        Action::Score(team) => {
            state.volleyball.add_point(team);
        }
        Action::Unscore(team) => state.volleyball.rem_point(team),
        Action::Reset => state.volleyball.request_reset(),
        Action::Undo => {
            if let Err(err) = state.volleyball.undo() {
                state.report(err);
            }
        }
        _ => {}
    }
}

fn apply_futsal(state: &mut AppState, action: Action, now: Instant) {
    let result = match action {
        Action::Score(team) => {
            state.futsal.add_goal(team);
            Ok(())
        }
        Action::Unscore(team) => {
            state.futsal.rem_goal(team);
            Ok(())
        }
        Action::Foul(team) => {
            state.futsal.add_foul(team);
            Ok(())
        }
        Action::Unfoul(team) => {
            state.futsal.rem_foul(team);
            Ok(())
        }
        Action::ToggleTimer => {
            state.futsal.toggle_timer(now);
            Ok(())
        }
        Action::SetTime => state.futsal.request_set_time(),
        Action::Reset => {
            state.futsal.request_reset();
            Ok(())
        }
        Action::Undo => state.futsal.undo(),
        _ => Ok(()),
    };
    if let Err(err) = result {
        state.report(err);
    }
}

pub fn apply_notice(state: &mut AppState, notice: Notice) {
    match notice {
        Notice::Changed(sport) => tracing::trace!(?sport, "changed"),
        Notice::Alert(alert) => state.show_alert(alert),
        Notice::Confirm(confirm) => state.prompts.push_back(Prompt::Confirm(confirm)),
        Notice::Ask(ask) => state.prompts.push_back(Prompt::Input {
            ask,
            buffer: String::new(),
        }),
        Notice::Feedback(Feedback::Cue(Cue::Success | Cue::Alert)) => state.bell_pending = true,
        // Terminals have no haptics.
        Notice::Feedback(Feedback::Tick) => {}
    }
}

pub fn ask_label(ask: Ask, names: &TeamNames) -> String {
    match ask {
        Ask::Minutes { default } => format!("Time in minutes (default {default}):"),
        Ask::TeamName { sport, team } => {
            format!("New name for {}:", names.for_sport(sport)[team])
        }
    }
}
