//! Checkpoint evaluation.
//!
//! A checkpoint fires when the remaining time *crosses* its threshold between
//! two consecutive observations (`previous > threshold && current <= threshold`).
//! Polls can skip seconds under load, so an equality test against a single
//! sample would miss thresholds.

use serde::{Deserialize, Serialize};

/// Default seconds before zero at which the lead-time cue fires.
pub const DEFAULT_LEAD_TIME_SECS: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Checkpoint {
    HalfTime,
    LeadTime,
    Completion,
}

/// One-shot flags for the checkpoints of a single segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointFlags {
    pub half_time_fired: bool,
    pub lead_time_fired: bool,
    pub completion_fired: bool,
}

impl CheckpointFlags {
    pub fn is_fired(&self, checkpoint: Checkpoint) -> bool {
        match checkpoint {
            Checkpoint::HalfTime => self.half_time_fired,
            Checkpoint::LeadTime => self.lead_time_fired,
            Checkpoint::Completion => self.completion_fired,
        }
    }

    /// Record a checkpoint as fired. Flags never go back to false here.
    pub fn mark(&mut self, checkpoint: Checkpoint) {
        match checkpoint {
            Checkpoint::HalfTime => self.half_time_fired = true,
            Checkpoint::LeadTime => self.lead_time_fired = true,
            Checkpoint::Completion => self.completion_fired = true,
        }
    }

    pub fn any_fired(&self) -> bool {
        self.half_time_fired || self.lead_time_fired || self.completion_fired
    }
}

/// Which checkpoints apply to a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointPolicy {
    /// Seconds before zero for the lead-time cue. Zero disables it.
    pub lead_time_secs: u64,
    /// Half-time and lead-time are evaluated only when set. Completion is
    /// always evaluated.
    pub interim: bool,
}

impl CheckpointPolicy {
    pub fn work(lead_time_secs: u64) -> Self {
        Self {
            lead_time_secs,
            interim: true,
        }
    }

    pub fn rest(lead_time_secs: u64) -> Self {
        Self {
            lead_time_secs,
            interim: false,
        }
    }
}

impl Default for CheckpointPolicy {
    fn default() -> Self {
        Self::work(DEFAULT_LEAD_TIME_SECS)
    }
}

/// Half-time threshold for a segment, or `None` when the segment is too
/// short to have one.
pub fn half_time_threshold(total_secs: u64) -> Option<u64> {
    let half = total_secs / 2;
    (half > 0).then_some(half)
}

fn crossed(previous: u64, current: u64, threshold: u64) -> bool {
    previous > threshold && current <= threshold
}

/// Checkpoints newly crossed between `previous` and `current`, in firing
/// order. Checkpoints already marked in `flags` are never returned.
pub fn evaluate(
    previous: u64,
    current: u64,
    total_secs: u64,
    policy: CheckpointPolicy,
    flags: CheckpointFlags,
) -> Vec<Checkpoint> {
    let mut out = Vec::new();
    if total_secs == 0 {
        return out;
    }

    if policy.interim {
        if let Some(half) = half_time_threshold(total_secs) {
            if !flags.is_fired(Checkpoint::HalfTime) && crossed(previous, current, half) {
                out.push(Checkpoint::HalfTime);
            }
        }

        let lead = policy.lead_time_secs;
        if lead > 0
            && total_secs > lead
            && !flags.is_fired(Checkpoint::LeadTime)
            && crossed(previous, current, lead)
        {
            out.push(Checkpoint::LeadTime);
        }
    }

    if current == 0 && !flags.is_fired(Checkpoint::Completion) {
        out.push(Checkpoint::Completion);
    }

    out
}
