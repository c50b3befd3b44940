use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::countdown::{Countdown, Tick};
use crate::error::MatchError;
use crate::history::History;
use crate::notify::{Alert, Ask, Confirm, Cue, Feedback, Notice, Notifier};
use crate::persist::{self, Store};
use crate::score::{Pair, Sport, Team, sport_key};

pub const DEFAULT_PERIOD_SECS: u32 = 10 * 60;
/// The accumulated foul that earns the opponent a direct free kick.
pub const FOUL_LIMIT: u32 = 6;

/// Counters covered by undo. The clock is deliberately not part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FutsalCounters {
    pub scores: Pair<u32>,
    pub fouls: Pair<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutsalRecord {
    pub scores: Pair<u32>,
    pub fouls: Pair<u32>,
    pub timer: u32,
}

pub struct Futsal {
    counters: FutsalCounters,
    clock: Countdown,
    period_secs: u32,
    history: History<FutsalCounters>,
    store: Box<dyn Store>,
    notifier: Notifier,
}

impl Futsal {
    /// Restores the last saved record. The clock always comes back paused.
    pub fn load(store: Box<dyn Store>, notifier: Notifier, period_secs: u32) -> Self {
        let record = persist::load::<FutsalRecord>(store.as_ref(), sport_key(Sport::Futsal));
        let (counters, timer) = match record {
            Some(r) => (
                FutsalCounters {
                    scores: r.scores,
                    fouls: r.fouls,
                },
                r.timer,
            ),
            None => (FutsalCounters::default(), period_secs),
        };
        tracing::info!(?counters, timer, "futsal restored");
        Self {
            counters,
            clock: Countdown::new(timer),
            period_secs,
            history: History::new(),
            store,
            notifier,
        }
    }

    pub fn scores(&self) -> Pair<u32> {
        self.counters.scores
    }

    pub fn fouls(&self) -> Pair<u32> {
        self.counters.fouls
    }

    pub fn timer(&self) -> u32 {
        self.clock.remaining()
    }

    pub fn is_paused(&self) -> bool {
        !self.clock.is_running()
    }

    pub fn period_secs(&self) -> u32 {
        self.period_secs
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn record(&self) -> FutsalRecord {
        FutsalRecord {
            scores: self.counters.scores,
            fouls: self.counters.fouls,
            timer: self.clock.remaining(),
        }
    }

    pub fn add_goal(&mut self, team: Team) {
        self.history.push(self.counters);
        self.counters.scores[team] += 1;
        tracing::debug!(?team, scores = ?self.counters.scores, "goal");
        self.commit();
        self.notifier.feedback(Feedback::Tick);
    }

    pub fn rem_goal(&mut self, team: Team) {
        if self.counters.scores[team] == 0 {
            return;
        }
        self.history.push(self.counters);
        self.counters.scores[team] -= 1;
        tracing::debug!(?team, scores = ?self.counters.scores, "goal removed");
        self.commit();
    }

    pub fn add_foul(&mut self, team: Team) {
        self.history.push(self.counters);
        self.counters.fouls[team] += 1;
        let fouls = self.counters.fouls[team];
        tracing::debug!(?team, fouls, "foul");
        if fouls == FOUL_LIMIT {
            tracing::info!(?team, "direct free kick");
            self.notifier.alert(Alert::DirectFreeKick { team });
            self.notifier.feedback(Feedback::Cue(Cue::Alert));
        }
        self.commit();
    }

    pub fn rem_foul(&mut self, team: Team) {
        if self.counters.fouls[team] == 0 {
            return;
        }
        self.history.push(self.counters);
        self.counters.fouls[team] -= 1;
        self.commit();
    }

    /// Asks for a new period length in minutes, unless the clock is running.
    pub fn request_set_time(&self) -> Result<(), MatchError> {
        if !self.is_paused() {
            return Err(MatchError::ClockRunning);
        }
        self.notifier.send(Notice::Ask(Ask::Minutes {
            default: self.period_secs / 60,
        }));
        Ok(())
    }

    pub fn set_time(&mut self, input: &str) -> Result<(), MatchError> {
        if !self.is_paused() {
            return Err(MatchError::ClockRunning);
        }
        let minutes = parse_minutes(input)?;
        self.clock.set(minutes * 60);
        tracing::info!(minutes, "clock set");
        self.commit();
        Ok(())
    }

    pub fn toggle_timer(&mut self, now: Instant) {
        if self.clock.is_running() {
            self.stop();
        } else {
            self.clock.start(now);
            tracing::debug!(remaining = self.clock.remaining(), "clock started");
            self.notifier.changed(Sport::Futsal);
        }
    }

    /// Advances a running clock. Call it often; only whole seconds count.
    pub fn tick(&mut self, now: Instant) -> Tick {
        let tick = self.clock.tick(now);
        match tick {
            Tick::Advanced(_) => self.notifier.changed(Sport::Futsal),
            Tick::Expired => {
                tracing::info!("time expired");
                self.commit();
                self.notifier.alert(Alert::TimeExpired);
                self.notifier.feedback(Feedback::Cue(Cue::Alert));
            }
            Tick::Idle | Tick::Pending => {}
        }
        tick
    }

    /// Persists the remaining time without touching the clock, for when the
    /// scoreboard goes out of view.
    pub fn suspend(&self) {
        persist::save_or_warn(self.store.as_ref(), sport_key(Sport::Futsal), &self.record());
    }

    pub fn request_reset(&self) {
        self.notifier.send(Notice::Confirm(Confirm::ResetFutsal));
    }

    pub fn reset(&mut self) {
        self.clock.pause();
        self.history.push(self.counters);
        self.counters = FutsalCounters::default();
        self.clock.set(self.period_secs);
        tracing::info!("futsal reset");
        self.commit();
    }

    /// Restores scores and fouls. The clock keeps its current value.
    pub fn undo(&mut self) -> Result<(), MatchError> {
        let previous = self.history.pop().ok_or(MatchError::NothingToUndo)?;
        self.counters = previous;
        tracing::debug!(counters = ?self.counters, "futsal undo");
        self.commit();
        Ok(())
    }

    fn stop(&mut self) {
        self.clock.pause();
        tracing::debug!(remaining = self.clock.remaining(), "clock paused");
        self.commit();
    }

    fn commit(&self) {
        persist::save_or_warn(self.store.as_ref(), sport_key(Sport::Futsal), &self.record());
        self.notifier.changed(Sport::Futsal);
    }
}

fn parse_minutes(input: &str) -> Result<u32, MatchError> {
    let trimmed = input.trim();
    match trimmed.parse::<u32>() {
        Ok(minutes) if minutes > 0 && minutes <= u32::MAX / 60 => Ok(minutes),
        _ => Err(MatchError::InvalidDuration(trimmed.to_string())),
    }
}
