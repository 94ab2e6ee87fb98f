use serde::{Deserialize, Serialize};
use std::ops::Add;
use std::str::FromStr;
use thiserror::Error;

pub const DAY_MINUTES: u64 = 1440;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time of day '{0}', expected HH:MM")]
pub struct FormatError(pub String);

/// Time of day, in minutes past midnight.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Time(pub u64);

impl Time {
    pub const MIDNIGHT: Time = Time(0);
    /// Latest minute a leg may arrive at.
    pub const LAST_MINUTE: Time = Time(23 * 60 + 59);

    pub fn to_percent(self) -> f64 {
        to_percent(self.0)
    }
}

/// Parses a strict `HH:MM` clock time into minutes past midnight.
pub fn to_minutes(time: &str) -> Result<u64, FormatError> {
    let invalid = || FormatError(time.to_string());
    let (hours, minutes) = time.split_once(':').ok_or_else(invalid)?;
    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_number(hours) || !is_number(minutes) {
        return Err(invalid());
    }
    let hours: u64 = hours.parse().map_err(|_| invalid())?;
    let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
    if hours >= 24 || minutes >= 60 {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}

pub fn to_percent(minutes: u64) -> f64 {
    minutes as f64 / DAY_MINUTES as f64 * 100.0
}

impl FromStr for Time {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        to_minutes(s).map(Time)
    }
}

impl TryFrom<String> for Time {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Time> for String {
    fn from(time: Time) -> Self {
        time.to_string()
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Add<u64> for Time {
    type Output = Self;

    fn add(self, rhs: u64) -> Self::Output {
        Time(self.0 + rhs)
    }
}
