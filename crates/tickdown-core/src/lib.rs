//! # tickdown Core Library
//!
//! Core logic for the tickdown countdown timer. Front ends (the bundled CLI,
//! or anything else) stay thin: they feed commands in and render the events
//! that come out.
//!
//! ## Architecture
//!
//! - **Clock**: source of epoch milliseconds, swappable for a manual clock
//!   in tests
//! - **Checkpoint evaluator**: pure crossing rules for half-time, lead-time
//!   and completion cues
//! - **Countdown engine**: anchor-based single-segment state machine; the
//!   caller invokes `tick()` periodically
//! - **Round controller**: chains work rounds and breaks on top of the engine
//! - **Driver**: tokio poll loop that serializes ticks and commands
//! - **Storage**: TOML-based user settings
//!
//! ## Key Components
//!
//! - [`RoundController`]: what a front end normally drives
//! - [`TimerListener`] / [`Dispatcher`]: presentation callbacks
//! - [`Driver`]: ready-made async loop
//! - [`Config`]: user settings

pub mod clock;
pub mod driver;
pub mod error;
pub mod events;
pub mod input;
pub mod listener;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock};
pub use driver::{Command, Driver, DriverHandle, DriverOptions};
pub use error::{ClockError, ConfigError, ListenerError, ValidationError};
pub use events::Event;
pub use input::TimerInput;
pub use listener::{Dispatcher, FnListener, ListenerResult, TimerListener};
pub use storage::Config;
pub use timer::{
    CountdownEngine, Phase, RoundController, SegmentKind, TimerConfig, TimerState,
    DEFAULT_LEAD_TIME_SECS,
};
