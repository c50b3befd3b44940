use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::history::History;
use crate::notify::{Alert, Confirm, Cue, Feedback, Notice, Notifier};
use crate::persist::{self, Store};
use crate::score::{Pair, Sport, Team, sport_key};

pub const SET_POINTS: u32 = 25;
pub const TIE_BREAK_POINTS: u32 = 15;
pub const MIN_LEAD: u32 = 2;
const TIE_BREAK_AFTER_SETS: u32 = 4;

/// Everything that survives a restart and everything undo restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VolleyballState {
    pub scores: Pair<u32>,
    pub sets: Pair<u32>,
}

impl VolleyballState {
    pub fn is_tie_break(&self) -> bool {
        self.sets.total() == TIE_BREAK_AFTER_SETS
    }

    pub fn point_limit(&self) -> u32 {
        if self.is_tie_break() {
            TIE_BREAK_POINTS
        } else {
            SET_POINTS
        }
    }

    /// The team that has closed out the current set, if any.
    pub fn set_winner(&self) -> Option<Team> {
        let top = self.scores.a.max(self.scores.b);
        if top >= self.point_limit() && self.scores.margin() >= MIN_LEAD {
            self.scores.leader()
        } else {
            None
        }
    }
}

pub struct Volleyball {
    state: VolleyballState,
    history: History<VolleyballState>,
    store: Box<dyn Store>,
    notifier: Notifier,
}

impl Volleyball {
    /// Restores the last saved record, or starts from 0-0.
    pub fn load(store: Box<dyn Store>, notifier: Notifier) -> Self {
        let state = persist::load::<VolleyballState>(store.as_ref(), sport_key(Sport::Volleyball))
            .unwrap_or_default();
        tracing::info!(?state, "volleyball restored");
        Self {
            state,
            history: History::new(),
            store,
            notifier,
        }
    }

    pub fn state(&self) -> &VolleyballState {
        &self.state
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn add_point(&mut self, team: Team) -> Option<Team> {
        self.history.push(self.state);
        self.state.scores[team] += 1;
        tracing::debug!(?team, scores = ?self.state.scores, "point");
        self.commit();
        self.notifier.feedback(Feedback::Tick);
        self.check_set_winner()
    }

    pub fn rem_point(&mut self, team: Team) {
        if self.state.scores[team] == 0 {
            return;
        }
        self.history.push(self.state);
        self.state.scores[team] -= 1;
        tracing::debug!(?team, scores = ?self.state.scores, "point removed");
        self.commit();
    }

    /// Awards the set when the current score closes it out.
    pub fn check_set_winner(&mut self) -> Option<Team> {
        let winner = self.state.set_winner()?;
        let winner_points = self.state.scores[winner];
        let loser_points = self.state.scores[winner.other()];

        self.state.sets[winner] += 1;
        self.state.scores = Pair::default();
        tracing::info!(?winner, winner_points, loser_points, sets = ?self.state.sets, "set won");
        self.commit();
        self.notifier.alert(Alert::SetWon {
            winner,
            winner_points,
            loser_points,
        });
        self.notifier.feedback(Feedback::Cue(Cue::Success));
        Some(winner)
    }

    /// Asks the user to confirm; [`Volleyball::reset`] runs on acceptance.
    pub fn request_reset(&self) {
        self.notifier.send(Notice::Confirm(Confirm::ResetVolleyball));
    }

    pub fn reset(&mut self) {
        self.history.push(self.state);
        self.state = VolleyballState::default();
        tracing::info!("volleyball reset");
        self.commit();
    }

    pub fn undo(&mut self) -> Result<(), MatchError> {
        let previous = self.history.pop().ok_or(MatchError::NothingToUndo)?;
        self.state = previous;
        tracing::debug!(state = ?self.state, "volleyball undo");
        self.commit();
        Ok(())
    }

    fn commit(&self) {
        persist::save_or_warn(self.store.as_ref(), sport_key(Sport::Volleyball), &self.state);
        self.notifier.changed(Sport::Volleyball);
    }
}
