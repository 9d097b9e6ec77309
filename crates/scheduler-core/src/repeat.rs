//! The recurrence grammar.
//!
//! Two forms are accepted:
//!
//! - `y`: every year on the same month and day
//! - `d <N>`: every `N` days, `1 <= N <= 400`
//!
//! An empty string means "no recurrence" and is handled by callers before
//! parsing; the parser itself rejects it.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Largest accepted day interval.
pub const MAX_DAILY_INTERVAL: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatRule {
    Daily { interval: u32 },
    Yearly,
}

impl RepeatRule {
    pub fn parse(repeat: &str) -> Result<Self, CoreError> {
        match repeat.chars().next() {
            None => Err(CoreError::invalid_rule(repeat, "rule is empty")),
            Some('y') => {
                if repeat.len() != 1 {
                    return Err(CoreError::invalid_rule(repeat, "expected exactly 'y'"));
                }
                Ok(RepeatRule::Yearly)
            }
            Some('d') => Self::parse_daily(repeat),
            Some(_) => Err(CoreError::invalid_rule(repeat, "unsupported rule")),
        }
    }

    fn parse_daily(repeat: &str) -> Result<Self, CoreError> {
        let parts: Vec<&str> = repeat.split(' ').collect();
        let [kind, days] = parts.as_slice() else {
            return Err(CoreError::invalid_rule(repeat, "expected 'd <days>'"));
        };
        if *kind != "d" {
            return Err(CoreError::invalid_rule(repeat, "expected 'd <days>'"));
        }

        let days: i64 = days
            .parse()
            .map_err(|_| CoreError::invalid_rule(repeat, "day interval is not a number"))?;
        if days <= 0 {
            return Err(CoreError::invalid_rule(repeat, "day interval must be positive"));
        }
        if days > i64::from(MAX_DAILY_INTERVAL) {
            return Err(CoreError::invalid_rule(repeat, "day interval exceeds 400"));
        }

        Ok(RepeatRule::Daily {
            interval: days as u32,
        })
    }
}

impl FromStr for RepeatRule {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepeatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatRule::Daily { interval } => write!(f, "d {}", interval),
            RepeatRule::Yearly => write!(f, "y"),
        }
    }
}
