use std::time::Duration;

use clap::Args;
use tickdown_core::timer::format_clock;
use tickdown_core::{
    Command, Config, Dispatcher, Driver, DriverHandle, DriverOptions, RoundController, SystemClock,
    TimerConfig, TimerInput,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::terminal::{JsonListener, TerminalListener};

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Minutes (0-99)
    #[arg(short, long)]
    pub minutes: Option<String>,
    /// Seconds (0-59)
    #[arg(short, long)]
    pub seconds: Option<String>,
    /// Number of work rounds (1-99)
    #[arg(short, long)]
    pub rounds: Option<String>,
    /// Break between rounds, in seconds
    #[arg(short, long = "break")]
    pub break_secs: Option<String>,
    /// Seconds before zero for the "almost done" cue
    #[arg(long)]
    pub lead: Option<u64>,
    /// Poll interval in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,
    /// No terminal bell
    #[arg(short, long)]
    pub quiet: bool,
    /// Print events as JSON lines instead of the status display
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    fn has_timer_input(&self) -> bool {
        self.minutes.is_some()
            || self.seconds.is_some()
            || self.rounds.is_some()
            || self.break_secs.is_some()
    }

    /// Session config: explicit flags go through input validation, otherwise
    /// the stored defaults are used.
    pub fn timer_config(&self, config: &Config) -> TimerConfig {
        if !self.has_timer_input() {
            return config.timer_config();
        }
        let input = TimerInput {
            minutes: self.minutes.clone(),
            seconds: self.seconds.clone(),
            rounds: self.rounds.clone(),
            break_secs: Some(
                self.break_secs
                    .clone()
                    .unwrap_or_else(|| config.timer.break_secs.to_string()),
            ),
        };
        input.to_config()
    }
}

/// Map a line typed on stdin to a driver command. Start doubles as resume:
/// the controller ignores the config when a session is paused.
fn parse_key(line: &str, timer_config: TimerConfig) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "pause" => Some(Command::Pause),
        "s" | "r" | "start" | "resume" => Some(Command::Start(timer_config)),
        "x" | "reset" => Some(Command::Reset),
        "q" | "quit" => Some(Command::Shutdown),
        _ => None,
    }
}

/// Send a command, noting when the driver has already stopped.
async fn forward(handle: &DriverHandle, command: Command) -> bool {
    let delivered = handle.send(command).await;
    if !delivered {
        debug!(?command, "driver already stopped, command dropped");
    }
    delivered
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if args.quiet {
        config.notifications.bell = false;
    }
    let timer_config = args.timer_config(&config);
    if timer_config.duration_secs == 0 {
        return Err("duration must be greater than zero".into());
    }
    let lead_time = args.lead.unwrap_or(config.checkpoints.lead_time_secs);
    let poll_interval = args
        .interval_ms
        .map(|ms| Duration::from_millis(ms.max(10)))
        .unwrap_or_else(|| config.poll_interval());

    let mut dispatcher = Dispatcher::new();
    if args.json {
        dispatcher.subscribe(JsonListener);
    } else {
        dispatcher.subscribe(TerminalListener::new(config.notifications.clone()));
        println!(
            "{} x{} (break {})  [p] pause  [s] resume  [x] reset  [q] quit",
            format_clock(timer_config.duration_secs),
            timer_config.round_count,
            format_clock(timer_config.break_duration_secs),
        );
    }

    let driver = Driver::new(
        RoundController::new(SystemClock, lead_time),
        dispatcher,
        DriverOptions {
            poll_interval,
            exit_on_complete: true,
        },
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let state = runtime.block_on(async move {
        let (handle, mut join) = driver.spawn();
        forward(&handle, Command::Start(timer_config)).await;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;
        loop {
            tokio::select! {
                state = &mut join => return state,
                line = lines.next_line(), if stdin_open => match line {
                    Ok(Some(line)) => {
                        if let Some(command) = parse_key(&line, timer_config) {
                            debug!(?command, "key");
                            forward(&handle, command).await;
                        }
                    }
                    Ok(None) | Err(_) => stdin_open = false,
                },
            }
        }
    });
    // Stdin reads block a worker thread; don't wait on them.
    runtime.shutdown_timeout(Duration::from_millis(100));

    let state = state?;
    debug!(?state, "session ended");
    if !args.json {
        println!();
    }
    Ok(())
}
