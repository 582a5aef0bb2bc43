use serde::{Deserialize, Serialize};

use super::engine::Phase;
use crate::error::ValidationError;

/// What to run: a work duration, repeated `round_count` times with a fixed
/// break between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub duration_secs: u64,
    pub round_count: u32,
    #[serde(default)]
    pub break_duration_secs: u64,
}

impl TimerConfig {
    /// # Errors
    /// Returns an error if `round_count` is zero.
    pub fn new(
        duration_secs: u64,
        round_count: u32,
        break_duration_secs: u64,
    ) -> Result<Self, ValidationError> {
        if round_count == 0 {
            return Err(ValidationError::InvalidValue {
                field: "round_count".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(Self {
            duration_secs,
            round_count,
            break_duration_secs,
        })
    }

    /// A one-round countdown.
    pub fn single(duration_secs: u64) -> Self {
        Self {
            duration_secs,
            round_count: 1,
            break_duration_secs: 0,
        }
    }

    /// Wall-clock length of the whole session, breaks included.
    pub fn session_secs(&self) -> u64 {
        let rounds = u64::from(self.round_count.max(1));
        self.duration_secs
            .saturating_mul(rounds)
            .saturating_add(self.break_duration_secs.saturating_mul(rounds - 1))
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::single(5 * 60)
    }
}

/// Point-in-time view of a countdown session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub current_round: u32,
    pub round_count: u32,
    pub is_break: bool,
}

impl TimerState {
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            remaining_secs: 0,
            total_secs: 0,
            current_round: 1,
            round_count: 1,
            is_break: false,
        }
    }

    pub fn progress_pct(&self) -> f64 {
        super::format::progress_pct(self.remaining_secs, self.total_secs)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::idle()
    }
}
