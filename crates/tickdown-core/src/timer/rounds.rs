//! Multi-round sessions.
//!
//! [`RoundController`] owns a [`CountdownEngine`] and chains segments:
//! work, break, work, ... Each segment gets fresh checkpoint flags. The
//! session-complete notice has its own one-shot flag so it fires once per
//! session no matter how many segments completed before it.

use tracing::{debug, info};

use super::engine::{CountdownEngine, Phase, SegmentKind};
use super::state::{TimerConfig, TimerState};
use crate::clock::Clock;
use crate::events::Event;

#[derive(Debug, Clone)]
pub struct RoundController<C> {
    engine: CountdownEngine<C>,
    /// Config of the session in progress; `None` while Idle.
    config: Option<TimerConfig>,
    current_round: u32,
    is_break: bool,
    session_complete_fired: bool,
}

impl<C: Clock> RoundController<C> {
    pub fn new(clock: C, lead_time_secs: u64) -> Self {
        Self::from_engine(CountdownEngine::new(clock, lead_time_secs))
    }

    pub fn from_engine(engine: CountdownEngine<C>) -> Self {
        Self {
            engine,
            config: None,
            current_round: 1,
            is_break: false,
            session_complete_fired: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &CountdownEngine<C> {
        &self.engine
    }

    pub fn config(&self) -> Option<TimerConfig> {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn is_break(&self) -> bool {
        self.is_break
    }

    pub fn is_session_complete(&self) -> bool {
        self.session_complete_fired
    }

    pub fn snapshot(&self) -> TimerState {
        TimerState {
            phase: self.engine.phase(),
            remaining_secs: self.engine.remaining_secs(),
            total_secs: self.engine.total_secs(),
            current_round: self.current_round,
            round_count: self.config.map(|c| c.round_count).unwrap_or(1),
            is_break: self.is_break,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a session from Idle, or resume a paused one.
    ///
    /// On resume `config` is ignored: a session's config is fixed once it
    /// starts. No-op for a zero duration, while running, or once complete.
    pub fn start(&mut self, config: TimerConfig) -> Vec<Event> {
        match self.engine.phase() {
            Phase::Idle => {
                if config.duration_secs == 0 || config.round_count == 0 {
                    debug!(?config, "ignoring start with empty config");
                    return Vec::new();
                }
                let mut events = vec![Event::Started {
                    total_secs: config.duration_secs,
                    round_count: config.round_count,
                }];
                events.extend(self.engine.start(config.duration_secs));
                self.config = Some(config);
                self.current_round = 1;
                self.is_break = false;
                self.session_complete_fired = false;
                info!(
                    duration_secs = config.duration_secs,
                    rounds = config.round_count,
                    break_secs = config.break_duration_secs,
                    "session started"
                );
                events
            }
            Phase::Paused => self.engine.start(0),
            Phase::Running | Phase::Completed => Vec::new(),
        }
    }

    /// Resume a paused session with its own config.
    pub fn resume(&mut self) -> Vec<Event> {
        if self.engine.phase() != Phase::Paused {
            return Vec::new();
        }
        self.engine.start(0)
    }

    pub fn pause(&mut self) -> Vec<Event> {
        let was_running = self.engine.is_running();
        let events = self.engine.pause();
        self.follow_engine(was_running, events)
    }

    pub fn reset(&mut self) -> Vec<Event> {
        self.config = None;
        self.current_round = 1;
        self.is_break = false;
        self.session_complete_fired = false;
        self.engine.reset()
    }

    pub fn tick(&mut self) -> Vec<Event> {
        let was_running = self.engine.is_running();
        let events = self.engine.tick();
        self.follow_engine(was_running, events)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// A late poll can cover several segment boundaries. Each next segment
    /// is anchored at the previous one's end and ticked again until the
    /// engine catches up with the clock.
    fn follow_engine(&mut self, was_running: bool, mut events: Vec<Event>) -> Vec<Event> {
        if !was_running {
            return events;
        }
        while self.engine.phase() == Phase::Completed {
            let Some(boundary_ms) = self.engine.completed_at_ms() else {
                break;
            };
            if !self.on_segment_complete(boundary_ms, &mut events) {
                break;
            }
            events.extend(self.engine.tick());
        }
        events
    }

    /// Returns `true` when another segment was armed.
    fn on_segment_complete(&mut self, boundary_ms: u64, events: &mut Vec<Event>) -> bool {
        let Some(config) = self.config else {
            return false;
        };

        if self.is_break {
            self.start_work_round(config, boundary_ms, events);
            return true;
        }

        if self.current_round < config.round_count {
            info!(round = self.current_round, "round complete");
            events.push(Event::RoundComplete {
                round: self.current_round,
            });
            self.current_round += 1;
            self.is_break = true;
            events.extend(self.engine.arm_at(
                boundary_ms,
                config.break_duration_secs,
                SegmentKind::Break,
            ));
            events.push(Event::BreakStarted {
                duration_secs: config.break_duration_secs,
            });
            if config.break_duration_secs == 0 {
                self.start_work_round(config, boundary_ms, events);
            }
            return true;
        }

        if !self.session_complete_fired {
            self.session_complete_fired = true;
            info!(rounds = config.round_count, "session complete");
            events.push(Event::SessionComplete {
                rounds: config.round_count,
            });
        }
        false
    }

    fn start_work_round(&mut self, config: TimerConfig, start_ms: u64, events: &mut Vec<Event>) {
        self.is_break = false;
        events.extend(
            self.engine
                .arm_at(start_ms, config.duration_secs, SegmentKind::Work),
        );
        info!(round = self.current_round, "round started");
        events.push(Event::RoundStarted {
            round: self.current_round,
        });
    }
}
