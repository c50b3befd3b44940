use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn other(self) -> Self {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Volleyball,
    Futsal,
}

/// A value per team, stored as `{ "a": .., "b": .. }` on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pair<T> {
    pub a: T,
    pub b: T,
}

impl<T> Pair<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }
}

impl<T> Index<Team> for Pair<T> {
    type Output = T;

    fn index(&self, team: Team) -> &T {
        match team {
            Team::A => &self.a,
            Team::B => &self.b,
        }
    }
}

impl<T> IndexMut<Team> for Pair<T> {
    fn index_mut(&mut self, team: Team) -> &mut T {
        match team {
            Team::A => &mut self.a,
            Team::B => &mut self.b,
        }
    }
}

impl Pair<u32> {
    pub fn total(&self) -> u32 {
        self.a + self.b
    }

    pub fn leader(&self) -> Option<Team> {
        if self.a > self.b {
            Some(Team::A)
        } else if self.b > self.a {
            Some(Team::B)
        } else {
            None
        }
    }

    pub fn margin(&self) -> u32 {
        self.a.abs_diff(self.b)
    }
}

pub fn team_label(team: Team) -> &'static str {
    match team {
        Team::A => "Team A",
        Team::B => "Team B",
    }
}

pub fn sport_label(sport: Sport) -> &'static str {
    match sport {
        Sport::Volleyball => "Volleyball",
        Sport::Futsal => "Futsal",
    }
}

pub fn sport_key(sport: Sport) -> &'static str {
    match sport {
        Sport::Volleyball => "volleyball",
        Sport::Futsal => "futsal",
    }
}
