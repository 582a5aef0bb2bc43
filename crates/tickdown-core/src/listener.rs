//! Presentation-layer callbacks.
//!
//! Front ends implement [`TimerListener`] and register with a [`Dispatcher`].
//! The dispatcher isolates every callback: an error or a panic in one
//! listener is logged and skipped, and never stops the countdown or the
//! remaining listeners.

use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::error::ListenerError;
use crate::events::Event;

pub type ListenerResult = Result<(), ListenerError>;

/// Callback surface for timer events. Every method defaults to a no-op.
pub trait TimerListener {
    /// Name used in log lines when this listener fails.
    fn name(&self) -> &str {
        "listener"
    }

    /// Entry point used by the dispatcher. Routes to the typed callbacks;
    /// override to handle events generically.
    fn on_event(&mut self, event: &Event) -> ListenerResult {
        match *event {
            Event::Started {
                total_secs,
                round_count,
            } => self.on_started(total_secs, round_count),
            Event::Paused { remaining_secs } => self.on_paused(remaining_secs),
            Event::Resumed { remaining_secs } => self.on_resumed(remaining_secs),
            Event::TimeChanged {
                remaining_secs,
                total_secs,
            } => self.on_time_changed(remaining_secs, total_secs),
            Event::HalfTime => self.on_half_time(),
            Event::LeadTime => self.on_lead_time(),
            Event::Completion => self.on_completion(),
            Event::RoundComplete { round } => self.on_round_complete(round),
            Event::RoundStarted { round } => self.on_round_started(round),
            Event::BreakStarted { duration_secs } => self.on_break_started(duration_secs),
            Event::SessionComplete { rounds } => self.on_session_complete(rounds),
            Event::Reset => self.on_reset(),
            Event::ClockFault { remaining_secs } => self.on_clock_fault(remaining_secs),
        }
    }

    fn on_started(&mut self, _total_secs: u64, _round_count: u32) -> ListenerResult {
        Ok(())
    }

    fn on_paused(&mut self, _remaining_secs: u64) -> ListenerResult {
        Ok(())
    }

    fn on_resumed(&mut self, _remaining_secs: u64) -> ListenerResult {
        Ok(())
    }

    fn on_time_changed(&mut self, _remaining_secs: u64, _total_secs: u64) -> ListenerResult {
        Ok(())
    }

    fn on_half_time(&mut self) -> ListenerResult {
        Ok(())
    }

    fn on_lead_time(&mut self) -> ListenerResult {
        Ok(())
    }

    fn on_completion(&mut self) -> ListenerResult {
        Ok(())
    }

    fn on_round_complete(&mut self, _round: u32) -> ListenerResult {
        Ok(())
    }

    fn on_round_started(&mut self, _round: u32) -> ListenerResult {
        Ok(())
    }

    fn on_break_started(&mut self, _duration_secs: u64) -> ListenerResult {
        Ok(())
    }

    fn on_session_complete(&mut self, _rounds: u32) -> ListenerResult {
        Ok(())
    }

    fn on_reset(&mut self) -> ListenerResult {
        Ok(())
    }

    fn on_clock_fault(&mut self, _remaining_secs: u64) -> ListenerResult {
        Ok(())
    }
}

/// Listener backed by a closure that sees every event.
pub struct FnListener<F> {
    name: String,
    f: F,
}

impl<F> FnListener<F>
where
    F: FnMut(&Event) -> ListenerResult,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> TimerListener for FnListener<F>
where
    F: FnMut(&Event) -> ListenerResult,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&mut self, event: &Event) -> ListenerResult {
        (self.f)(event)
    }
}

/// Fans events out to registered listeners.
#[derive(Default)]
pub struct Dispatcher {
    listeners: Vec<Box<dyn TimerListener + Send>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl TimerListener + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver `events` in order to every listener. Returns the number of
    /// callbacks that failed.
    pub fn dispatch(&mut self, events: &[Event]) -> usize {
        let mut failures = 0;
        for event in events {
            for listener in &mut self.listeners {
                let outcome =
                    panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(event)));
                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        failures += 1;
                        warn!(event = event.name(), "listener failed: {e}");
                    }
                    Err(_) => {
                        failures += 1;
                        warn!(
                            event = event.name(),
                            listener = listener.name(),
                            "listener panicked"
                        );
                    }
                }
            }
        }
        failures
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.listeners.iter().map(|l| l.name()).collect();
        f.debug_struct("Dispatcher").field("listeners", &names).finish()
    }
}
