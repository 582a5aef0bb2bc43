mod checkpoint;
mod engine;
mod format;
mod rounds;
mod state;

pub use checkpoint::{
    evaluate, half_time_threshold, Checkpoint, CheckpointFlags, CheckpointPolicy,
    DEFAULT_LEAD_TIME_SECS,
};
pub use engine::{Anchor, CountdownEngine, Phase, SegmentKind};
pub use format::{format_clock, progress_pct, status_label};
pub use rounds::RoundController;
pub use state::{TimerConfig, TimerState};
