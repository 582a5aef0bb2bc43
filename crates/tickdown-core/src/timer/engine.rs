//! Countdown engine implementation.
//!
//! The engine is a wall-clock-based state machine for a single segment. It
//! does not use internal threads; the caller is responsible for calling
//! `tick()` periodically.
//!
//! Remaining time is never accumulated from tick deltas. While running, the
//! engine keeps an [`Anchor`] (the instant the segment hits zero) and derives
//! the remaining seconds from it, so late or skipped polls cannot drift.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused -> Running)* -> Completed
//!   ^___________________ reset ____________________|
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new(SystemClock, DEFAULT_LEAD_TIME_SECS);
//! engine.start(90);
//! // In a loop:
//! for event in engine.tick() { /* ... */ }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::checkpoint::{self, CheckpointFlags, CheckpointPolicy};
use crate::clock::Clock;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Work,
    Break,
}

/// Instant (epoch ms) at which the running segment reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub end_ms: u64,
}

impl Anchor {
    pub fn after(now_ms: u64, remaining_secs: u64) -> Self {
        Self {
            end_ms: now_ms.saturating_add(remaining_secs.saturating_mul(1000)),
        }
    }

    /// Whole seconds left at `now_ms`, rounded up and clamped at zero.
    pub fn remaining_secs(&self, now_ms: u64) -> u64 {
        self.end_ms.saturating_sub(now_ms).div_ceil(1000)
    }
}

/// Single-segment countdown.
///
/// Operates on wall-clock reads from `C` -- no internal thread.
#[derive(Debug, Clone)]
pub struct CountdownEngine<C> {
    clock: C,
    lead_time_secs: u64,
    phase: Phase,
    kind: SegmentKind,
    /// Last observed remaining seconds. Doubles as the "previous" value for
    /// checkpoint crossing on the next tick.
    remaining_secs: u64,
    total_secs: u64,
    anchor: Option<Anchor>,
    /// End instant of the last completed segment, for chaining the next one.
    completed_at_ms: Option<u64>,
    flags: CheckpointFlags,
}

impl<C: Clock> CountdownEngine<C> {
    pub fn new(clock: C, lead_time_secs: u64) -> Self {
        Self {
            clock,
            lead_time_secs,
            phase: Phase::Idle,
            kind: SegmentKind::Work,
            remaining_secs: 0,
            total_secs: 0,
            anchor: None,
            completed_at_ms: None,
            flags: CheckpointFlags::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn segment_kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn flags(&self) -> CheckpointFlags {
        self.flags
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    /// Wall-clock instant (epoch ms) at which the last segment reached zero.
    /// `None` unless the engine is Completed.
    pub fn completed_at_ms(&self) -> Option<u64> {
        self.completed_at_ms
    }

    pub fn lead_time_secs(&self) -> u64 {
        self.lead_time_secs
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn policy(&self) -> CheckpointPolicy {
        match self.kind {
            SegmentKind::Work => CheckpointPolicy::work(self.lead_time_secs),
            SegmentKind::Break => CheckpointPolicy::rest(self.lead_time_secs),
        }
    }

    /// 0.0 .. 100.0 elapsed share of the current segment.
    pub fn progress_pct(&self) -> f64 {
        super::format::progress_pct(self.remaining_secs, self.total_secs)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a fresh work segment of `total_secs` from Idle, or resume from
    /// Paused (in which case `total_secs` is ignored and the checkpoint
    /// flags are kept). No-op while Running or Completed, and for a zero
    /// duration.
    pub fn start(&mut self, total_secs: u64) -> Vec<Event> {
        match self.phase {
            Phase::Idle => {
                if total_secs == 0 {
                    debug!("ignoring start with zero duration");
                    return Vec::new();
                }
                self.arm(total_secs, SegmentKind::Work)
            }
            Phase::Paused => {
                let now = match self.clock.now_ms() {
                    Ok(now) => now,
                    Err(e) => {
                        warn!("cannot resume, clock unavailable: {e}");
                        return Vec::new();
                    }
                };
                self.anchor = Some(Anchor::after(now, self.remaining_secs));
                self.phase = Phase::Running;
                debug!(remaining_secs = self.remaining_secs, "resumed");
                vec![Event::Resumed {
                    remaining_secs: self.remaining_secs,
                }]
            }
            Phase::Running | Phase::Completed => Vec::new(),
        }
    }

    /// Begin a new segment now, whatever the current phase.
    ///
    /// Clears the checkpoint flags. A zero duration returns the engine to
    /// Idle. If the clock cannot be read the segment is armed Paused at its
    /// full length and a `ClockFault` follows the `TimeChanged`.
    pub fn arm(&mut self, total_secs: u64, kind: SegmentKind) -> Vec<Event> {
        if total_secs == 0 {
            return self.arm_at(0, total_secs, kind);
        }
        match self.clock.now_ms() {
            Ok(now) => self.arm_at(now, total_secs, kind),
            Err(e) => {
                warn!("clock unavailable while arming segment, holding paused: {e}");
                self.load_segment(total_secs, kind);
                self.phase = Phase::Paused;
                vec![
                    Event::TimeChanged {
                        remaining_secs: total_secs,
                        total_secs,
                    },
                    Event::ClockFault {
                        remaining_secs: total_secs,
                    },
                ]
            }
        }
    }

    /// Begin a new segment that started at `start_ms` (epoch ms), which may
    /// lie in the past. Used by the round controller to chain segments
    /// end-to-end so a late poll at a boundary does not push later segments
    /// back; the next `tick()` catches up.
    pub fn arm_at(&mut self, start_ms: u64, total_secs: u64, kind: SegmentKind) -> Vec<Event> {
        self.load_segment(total_secs, kind);
        if total_secs == 0 {
            self.phase = Phase::Idle;
            return Vec::new();
        }
        self.anchor = Some(Anchor::after(start_ms, total_secs));
        self.phase = Phase::Running;
        debug!(total_secs, ?kind, start_ms, "segment armed");
        vec![Event::TimeChanged {
            remaining_secs: total_secs,
            total_secs,
        }]
    }

    fn load_segment(&mut self, total_secs: u64, kind: SegmentKind) {
        self.kind = kind;
        self.total_secs = total_secs;
        self.remaining_secs = total_secs;
        self.anchor = None;
        self.completed_at_ms = None;
        self.flags = CheckpointFlags::default();
    }

    /// Freeze the countdown. No-op unless Running.
    ///
    /// The remaining time is brought up to date first, so a pause that lands
    /// on zero completes the segment instead of pausing it.
    pub fn pause(&mut self) -> Vec<Event> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        let mut events = self.tick();
        if self.phase == Phase::Running {
            self.anchor = None;
            self.phase = Phase::Paused;
            debug!(remaining_secs = self.remaining_secs, "paused");
            events.push(Event::Paused {
                remaining_secs: self.remaining_secs,
            });
        }
        events
    }

    pub fn reset(&mut self) -> Vec<Event> {
        self.phase = Phase::Idle;
        self.kind = SegmentKind::Work;
        self.remaining_secs = 0;
        self.total_secs = 0;
        self.anchor = None;
        self.completed_at_ms = None;
        self.flags = CheckpointFlags::default();
        debug!("reset");
        vec![Event::Reset]
    }

    /// Call periodically. Returns the time change and any checkpoints
    /// crossed since the previous observation.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        let Some(anchor) = self.anchor else {
            return Vec::new();
        };

        let now = match self.clock.now_ms() {
            Ok(now) => now,
            Err(e) => {
                // Fail closed: hold the last observed value until the clock
                // comes back and the caller resumes.
                warn!("clock unavailable, pausing countdown: {e}");
                self.anchor = None;
                self.phase = Phase::Paused;
                return vec![Event::ClockFault {
                    remaining_secs: self.remaining_secs,
                }];
            }
        };

        let previous = self.remaining_secs;
        let mut current = anchor.remaining_secs(now);
        if current > previous {
            // Wall clock stepped backwards; never hand time back.
            self.anchor = Some(Anchor::after(now, previous));
            current = previous;
        }

        let mut events = Vec::new();
        if current != previous {
            self.remaining_secs = current;
            events.push(Event::TimeChanged {
                remaining_secs: current,
                total_secs: self.total_secs,
            });
        }

        for crossed in checkpoint::evaluate(
            previous,
            current,
            self.total_secs,
            self.policy(),
            self.flags,
        ) {
            self.flags.mark(crossed);
            debug!(?crossed, remaining_secs = current, "checkpoint");
            events.push(crossed.into());
        }

        if current == 0 {
            self.phase = Phase::Completed;
            self.completed_at_ms = self.anchor.take().map(|a| a.end_ms);
            debug!(kind = ?self.kind, "segment completed");
        }
        events
    }
}
