use std::fmt;

use chrono::{Datelike, NaiveDateTime};

pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchResult {
    Winner,
    Loser,
    Draw,
    Unknown,
}

impl MatchResult {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchResult::Winner => "winner",
            MatchResult::Loser => "loser",
            MatchResult::Draw => "draw",
            MatchResult::Unknown => "unknown",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            MatchResult::Winner => MatchResult::Loser,
            MatchResult::Loser => MatchResult::Winner,
            other => other,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Home,
    Away,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Home => "home",
            Position::Away => "away",
        }
    }
}

/// One physical match in the shape every reader converges on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalMatchRecord {
    pub datetime: Option<NaiveDateTime>,
    pub stage: String,
    pub city: String,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub home_result: MatchResult,
    pub away_result: MatchResult,
}

impl CanonicalMatchRecord {
    /// `YYYY-MM-DD HH:MM:SS`, or `None` when the source had no usable date.
    pub fn datetime_key(&self) -> Option<String> {
        self.datetime
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    pub fn date_parts(&self) -> Option<(u32, u32, i32)> {
        self.datetime.map(|dt| (dt.day(), dt.month(), dt.year()))
    }

    pub fn side(&self, position: Position) -> (&str, Option<u32>, MatchResult) {
        match position {
            Position::Home => (&self.home_team, self.home_goals, self.home_result),
            Position::Away => (&self.away_team, self.away_goals, self.away_result),
        }
    }
}
