//! Turning raw form fields into a [`TimerConfig`].
//!
//! Input is forgiving: anything unparsable counts as zero and values are
//! clamped into range instead of rejected.

use crate::timer::TimerConfig;

pub const MAX_MINUTES: u64 = 99;
pub const MAX_SECONDS: u64 = 59;
pub const MIN_ROUNDS: u32 = 1;
pub const MAX_ROUNDS: u32 = 99;
pub const MAX_BREAK_SECS: u64 = 99 * 60 + 59;
/// Minutes used when both the minutes and seconds fields are left empty.
pub const DEFAULT_MINUTES: u64 = 5;

/// Raw user-entered fields. `None` and blank strings are both "empty".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerInput {
    pub minutes: Option<String>,
    pub seconds: Option<String>,
    pub rounds: Option<String>,
    pub break_secs: Option<String>,
}

fn is_empty(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Leading-digits parse: "12abc" is 12, "abc" and "" are 0, negatives are 0.
fn parse_lenient(field: &Option<String>) -> u64 {
    let Some(raw) = field.as_deref() else {
        return 0;
    };
    let digits: String = raw
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse::<u64>().unwrap_or(if digits.is_empty() { 0 } else { u64::MAX })
}

impl TimerInput {
    pub fn new(
        minutes: impl Into<String>,
        seconds: impl Into<String>,
        rounds: impl Into<String>,
    ) -> Self {
        Self {
            minutes: Some(minutes.into()),
            seconds: Some(seconds.into()),
            rounds: Some(rounds.into()),
            break_secs: None,
        }
    }

    pub fn with_break(mut self, break_secs: impl Into<String>) -> Self {
        self.break_secs = Some(break_secs.into());
        self
    }

    pub fn minutes(&self) -> u64 {
        if is_empty(&self.minutes) && is_empty(&self.seconds) {
            return DEFAULT_MINUTES;
        }
        parse_lenient(&self.minutes).min(MAX_MINUTES)
    }

    pub fn seconds(&self) -> u64 {
        parse_lenient(&self.seconds).min(MAX_SECONDS)
    }

    pub fn rounds(&self) -> u32 {
        if is_empty(&self.rounds) {
            return MIN_ROUNDS;
        }
        let rounds = parse_lenient(&self.rounds).clamp(MIN_ROUNDS as u64, MAX_ROUNDS as u64);
        rounds as u32
    }

    pub fn break_secs(&self) -> u64 {
        parse_lenient(&self.break_secs).min(MAX_BREAK_SECS)
    }

    pub fn to_config(&self) -> TimerConfig {
        TimerConfig {
            duration_secs: self.minutes() * 60 + self.seconds(),
            round_count: self.rounds(),
            break_duration_secs: self.break_secs(),
        }
    }
}

impl From<&TimerInput> for TimerConfig {
    fn from(input: &TimerInput) -> Self {
        input.to_config()
    }
}
