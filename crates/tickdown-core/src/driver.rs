//! Async poll loop.
//!
//! The [`Driver`] owns the round controller and is the only thing that
//! mutates it. Ticks come from a tokio interval, commands from an mpsc
//! channel, and both are handled inside one `select!` loop, so a tick never
//! overlaps a command or another tick.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::events::Event;
use crate::listener::Dispatcher;
use crate::timer::{RoundController, TimerConfig, TimerState};

/// Default poll interval. Short enough that the display never visibly
/// stalls on a second boundary.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start from Idle, or resume when paused.
    Start(TimerConfig),
    Pause,
    Resume,
    Reset,
    Shutdown,
}

#[derive(Debug, Clone, Copy)]
pub struct DriverOptions {
    pub poll_interval: Duration,
    /// Stop the loop once the session completes.
    pub exit_on_complete: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            exit_on_complete: false,
        }
    }
}

#[derive(Debug)]
pub struct Driver<C> {
    controller: RoundController<C>,
    dispatcher: Dispatcher,
    options: DriverOptions,
}

impl<C: Clock> Driver<C> {
    pub fn new(controller: RoundController<C>, dispatcher: Dispatcher, options: DriverOptions) -> Self {
        Self {
            controller,
            dispatcher,
            options,
        }
    }

    pub fn controller(&self) -> &RoundController<C> {
        &self.controller
    }

    pub fn snapshot(&self) -> TimerState {
        self.controller.snapshot()
    }

    /// Apply one command. Returns `false` when the loop should stop.
    pub fn handle(&mut self, command: Command) -> bool {
        debug!(?command, "command");
        let events = match command {
            Command::Start(config) => self.controller.start(config),
            Command::Pause => self.controller.pause(),
            Command::Resume => self.controller.resume(),
            Command::Reset => self.controller.reset(),
            Command::Shutdown => return false,
        };
        self.emit(&events);
        true
    }

    /// One poll of the clock.
    pub fn poll(&mut self) {
        let events = self.controller.tick();
        self.emit(&events);
    }

    fn emit(&mut self, events: &[Event]) {
        if events.is_empty() {
            return;
        }
        let failures = self.dispatcher.dispatch(events);
        if failures > 0 {
            debug!(failures, "some listener callbacks failed");
        }
    }

    fn finished(&self) -> bool {
        self.options.exit_on_complete && self.controller.is_session_complete()
    }

    /// Run until `Shutdown`, until every command sender is dropped, or (with
    /// `exit_on_complete`) until the session completes. Returns the final
    /// state.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> TimerState {
        let mut interval = tokio::time::interval(self.options.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_ms = self.options.poll_interval.as_millis() as u64, "driver running");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.poll();
                    if self.finished() {
                        break;
                    }
                }
                command = commands.recv() => {
                    let keep_going = match command {
                        Some(command) => self.handle(command),
                        None => false,
                    };
                    if !keep_going || self.finished() {
                        break;
                    }
                }
            }
        }

        info!("driver stopped");
        self.controller.snapshot()
    }
}

impl<C: Clock + Send + 'static> Driver<C> {
    /// Run the driver on the current tokio runtime.
    pub fn spawn(self) -> (DriverHandle, JoinHandle<TimerState>) {
        let (tx, rx) = mpsc::channel(32);
        let join = tokio::spawn(self.run(rx));
        (DriverHandle { tx }, join)
    }
}

/// Sending side of a running driver.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    tx: mpsc::Sender<Command>,
}

impl DriverHandle {
    /// Returns `false` if the driver has already stopped.
    pub async fn send(&self, command: Command) -> bool {
        self.tx.send(command).await.is_ok()
    }

    pub async fn start(&self, config: TimerConfig) -> bool {
        self.send(Command::Start(config)).await
    }

    pub async fn pause(&self) -> bool {
        self.send(Command::Pause).await
    }

    pub async fn resume(&self) -> bool {
        self.send(Command::Resume).await
    }

    pub async fn reset(&self) -> bool {
        self.send(Command::Reset).await
    }

    pub async fn shutdown(&self) -> bool {
        self.send(Command::Shutdown).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, MonotonicClock};
    use crate::listener::FnListener;
    use crate::timer::Phase;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Dispatcher, Arc<Mutex<Vec<Event>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut dispatcher = Dispatcher::new();
        dispatcher.subscribe(FnListener::new("recorder", move |event: &Event| {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        }));
        (dispatcher, seen)
    }

    #[test]
    fn handle_and_poll_dispatch_events() {
        let clock = ManualClock::new(0);
        let (dispatcher, seen) = recorder();
        let mut driver = Driver::new(
            RoundController::new(clock.clone(), 4),
            dispatcher,
            DriverOptions::default(),
        );

        assert!(driver.handle(Command::Start(TimerConfig::single(2))));
        clock.advance_secs(2);
        driver.poll();
        assert!(!driver.handle(Command::Shutdown));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.first().map(Event::name), Some("started"));
        assert_eq!(seen.last(), Some(&Event::SessionComplete { rounds: 1 }));
    }

    #[tokio::test(start_paused = true)]
    async fn runs_session_to_completion() {
        let (dispatcher, seen) = recorder();
        let driver = Driver::new(
            RoundController::new(MonotonicClock::new(), 4),
            dispatcher,
            DriverOptions {
                exit_on_complete: true,
                ..DriverOptions::default()
            },
        );
        let (handle, join) = driver.spawn();
        assert!(handle.start(TimerConfig::new(3, 2, 1).unwrap()).await);

        let state = join.await.unwrap();
        assert_eq!(state.phase, Phase::Completed);
        assert_eq!(state.current_round, 2);

        let seen = seen.lock().unwrap();
        let completions = seen.iter().filter(|e| **e == Event::SessionComplete { rounds: 2 }).count();
        assert_eq!(completions, 1);
        assert!(seen.contains(&Event::RoundStarted { round: 2 }));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_driver() {
        let (dispatcher, _) = recorder();
        let driver = Driver::new(
            RoundController::new(MonotonicClock::new(), 4),
            dispatcher,
            DriverOptions::default(),
        );
        let (handle, join) = driver.spawn();
        handle.start(TimerConfig::single(60)).await;
        handle.pause().await;
        drop(handle);

        let state = join.await.unwrap();
        assert_eq!(state.phase, Phase::Paused);
        assert_eq!(state.remaining_secs, 60);
    }
}
