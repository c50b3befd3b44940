use std::sync::mpsc::{self, Receiver, Sender};

use crate::error::MatchError;
use crate::score::{Sport, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Success,
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Short haptic pulse on every score change.
    Tick,
    Cue(Cue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    SetWon {
        winner: Team,
        winner_points: u32,
        loser_points: u32,
    },
    DirectFreeKick {
        team: Team,
    },
    TimeExpired,
    Rejected(MatchError),
}

/// Questions that need a yes/no from the user before the core acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    ResetVolleyball,
    ResetFutsal,
}

/// Questions that need a typed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ask {
    Minutes { default: u32 },
    TeamName { sport: Sport, team: Team },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Changed(Sport),
    Alert(Alert),
    Confirm(Confirm),
    Ask(Ask),
    Feedback(Feedback),
}

/// Sending half of the notice channel. A dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Sender<Notice>,
}

impl Notifier {
    pub fn new(tx: Sender<Notice>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, Receiver<Notice>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }

    pub fn send(&self, notice: Notice) {
        let _ = self.tx.send(notice);
    }

    pub fn changed(&self, sport: Sport) {
        self.send(Notice::Changed(sport));
    }

    pub fn alert(&self, alert: Alert) {
        self.send(Notice::Alert(alert));
    }

    pub fn feedback(&self, feedback: Feedback) {
        self.send(Notice::Feedback(feedback));
    }
}

pub fn alert_message(alert: &Alert) -> String {
    match alert {
        Alert::SetWon {
            winner,
            winner_points,
            loser_points,
        } => format!(
            "{} won the set! {winner_points} x {loser_points}",
            crate::score::team_label(*winner)
        ),
        Alert::DirectFreeKick { team } => format!(
            "6th foul for {}! Direct free kick.",
            crate::score::team_label(*team)
        ),
        Alert::TimeExpired => "Time's up!".to_string(),
        Alert::Rejected(err) => capitalize(&err.to_string()),
    }
}

pub fn confirm_message(confirm: Confirm) -> &'static str {
    match confirm {
        Confirm::ResetVolleyball => "Reset the volleyball match?",
        Confirm::ResetFutsal => "Reset the futsal match?",
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
