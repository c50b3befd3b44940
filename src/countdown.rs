use std::time::{Duration, Instant};

/// What a single [`Countdown::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Clock is paused.
    Idle,
    /// Running, but less than a whole second has passed since the anchor.
    Pending,
    /// This many whole seconds were taken off the clock.
    Advanced(u32),
    /// The clock reached zero and paused itself.
    Expired,
}

/// Drift-corrected countdown in whole seconds.
///
/// The clock measures elapsed wall time against an anchor instead of counting
/// ticks, so late ticks catch up rather than lose time. The anchor moves
/// forward by whole seconds only; any sub-second remainder carries into the
/// next tick.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u32,
    anchor: Option<Instant>,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            anchor: None,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    /// Overwrites the remaining time. Caller must pause first.
    pub fn set(&mut self, seconds: u32) {
        self.remaining = seconds;
    }

    pub fn start(&mut self, now: Instant) {
        if self.anchor.is_none() {
            self.anchor = Some(now);
        }
    }

    pub fn pause(&mut self) {
        self.anchor = None;
    }

    pub fn tick(&mut self, now: Instant) -> Tick {
        let Some(anchor) = self.anchor else {
            return Tick::Idle;
        };
        if self.remaining == 0 {
            self.anchor = None;
            return Tick::Expired;
        }

        let whole = now.saturating_duration_since(anchor).as_secs();
        if whole == 0 {
            return Tick::Pending;
        }

        let taken = whole.min(u64::from(self.remaining)) as u32;
        self.remaining -= taken;
        self.anchor = Some(anchor + Duration::from_secs(whole));

        if self.remaining == 0 {
            self.anchor = None;
            Tick::Expired
        } else {
            Tick::Advanced(taken)
        }
    }
}

pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
