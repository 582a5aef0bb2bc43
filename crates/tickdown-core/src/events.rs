use serde::{Deserialize, Serialize};

use crate::timer::Checkpoint;

/// Every state change of a countdown produces an Event.
///
/// Commands and ticks return the events they caused, in order; the
/// presentation layer receives them through a [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A fresh session started from Idle.
    Started {
        total_secs: u64,
        round_count: u32,
    },
    Paused {
        remaining_secs: u64,
    },
    Resumed {
        remaining_secs: u64,
    },
    /// Displayed remaining time changed.
    TimeChanged {
        remaining_secs: u64,
        total_secs: u64,
    },
    HalfTime,
    LeadTime,
    Completion,
    /// A work round finished and more rounds follow.
    RoundComplete {
        round: u32,
    },
    /// A work round started after a break.
    RoundStarted {
        round: u32,
    },
    BreakStarted {
        duration_secs: u64,
    },
    /// The final work round finished. Emitted once per session.
    SessionComplete {
        rounds: u32,
    },
    /// Timer returned to Idle; collaborators should stop audio and visuals.
    Reset,
    /// The clock could not be read; the countdown paused itself.
    ClockFault {
        remaining_secs: u64,
    },
}

impl Event {
    /// Short machine name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Started { .. } => "started",
            Event::Paused { .. } => "paused",
            Event::Resumed { .. } => "resumed",
            Event::TimeChanged { .. } => "time_changed",
            Event::HalfTime => "half_time",
            Event::LeadTime => "lead_time",
            Event::Completion => "completion",
            Event::RoundComplete { .. } => "round_complete",
            Event::RoundStarted { .. } => "round_started",
            Event::BreakStarted { .. } => "break_started",
            Event::SessionComplete { .. } => "session_complete",
            Event::Reset => "reset",
            Event::ClockFault { .. } => "clock_fault",
        }
    }
}

impl From<Checkpoint> for Event {
    fn from(checkpoint: Checkpoint) -> Self {
        match checkpoint {
            Checkpoint::HalfTime => Event::HalfTime,
            Checkpoint::LeadTime => Event::LeadTime,
            Checkpoint::Completion => Event::Completion,
        }
    }
}
