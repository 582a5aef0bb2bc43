//! Terminal presentation: a status line, bell cues, toasts and confetti.

use std::io::{self, Write};

use tickdown_core::storage::NotificationsConfig;
use tickdown_core::timer::{format_clock, progress_pct, status_label};
use tickdown_core::{Event, ListenerError, ListenerResult, Phase, TimerListener};

const BAR_WIDTH: usize = 24;
const BELL: &str = "\x07";
const CLEAR_LINE: &str = "\r\x1b[2K";

const CONFETTI: &[&str] = &[
    r"  *  .  ' *   .  *  '  .  *",
    r" .  \o/  .  *  \o/  .   ' ",
    r"  '  |  *  '  .  |  *  .  ",
    r" *  / \   .  *  / \   '  *",
];

fn io_failure(e: io::Error) -> ListenerError {
    ListenerError::new("terminal", e.to_string())
}

fn paused_notice(remaining_secs: u64) -> String {
    format!(
        "{} at {}. [s] resume  [x] reset  [q] quit",
        status_label(Phase::Paused),
        format_clock(remaining_secs)
    )
}

/// Human-readable output on stdout.
pub struct TerminalListener {
    notifications: NotificationsConfig,
    round: u32,
    round_count: u32,
    on_break: bool,
}

impl TerminalListener {
    pub fn new(notifications: NotificationsConfig) -> Self {
        Self {
            notifications,
            round: 1,
            round_count: 1,
            on_break: false,
        }
    }

    fn write(&self, text: &str) -> ListenerResult {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes()).map_err(io_failure)?;
        out.flush().map_err(io_failure)
    }

    fn bell(&self) -> ListenerResult {
        if self.notifications.bell {
            self.write(BELL)?;
        }
        Ok(())
    }

    fn toast(&self, message: &str) -> ListenerResult {
        if self.notifications.toasts {
            self.write(&format!("{CLEAR_LINE}>> {message}\n"))?;
        }
        Ok(())
    }

    fn status_line(&self, remaining_secs: u64, total_secs: u64) -> String {
        let pct = progress_pct(remaining_secs, total_secs);
        let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
        let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)));
        let label = if self.on_break { "break" } else { "round" };
        let rounds = if self.round_count > 1 {
            format!("  {label} {}/{}", self.round, self.round_count)
        } else {
            String::new()
        };
        format!("{CLEAR_LINE}{}  [{bar}] {pct:>3.0}%{rounds}", format_clock(remaining_secs))
    }
}

impl TimerListener for TerminalListener {
    fn name(&self) -> &str {
        "terminal"
    }

    fn on_started(&mut self, _total_secs: u64, round_count: u32) -> ListenerResult {
        self.round = 1;
        self.round_count = round_count;
        self.on_break = false;
        Ok(())
    }

    fn on_time_changed(&mut self, remaining_secs: u64, total_secs: u64) -> ListenerResult {
        self.write(&self.status_line(remaining_secs, total_secs))
    }

    fn on_paused(&mut self, remaining_secs: u64) -> ListenerResult {
        self.toast(&paused_notice(remaining_secs))
    }

    fn on_resumed(&mut self, _remaining_secs: u64) -> ListenerResult {
        self.toast("Resumed")
    }

    fn on_half_time(&mut self) -> ListenerResult {
        self.bell()?;
        self.toast("Half-time!")
    }

    fn on_lead_time(&mut self) -> ListenerResult {
        self.bell()?;
        self.toast("Almost done...")
    }

    fn on_completion(&mut self) -> ListenerResult {
        self.bell()
    }

    fn on_round_complete(&mut self, round: u32) -> ListenerResult {
        self.toast(&format!("Round {round} complete"))
    }

    fn on_break_started(&mut self, duration_secs: u64) -> ListenerResult {
        self.on_break = true;
        self.round += 1;
        self.toast(&format!("Break: {}", format_clock(duration_secs)))
    }

    fn on_round_started(&mut self, round: u32) -> ListenerResult {
        self.on_break = false;
        self.round = round;
        self.toast(&format!("Round {round} of {} started", self.round_count))
    }

    fn on_session_complete(&mut self, rounds: u32) -> ListenerResult {
        self.toast(&format!("Done! {rounds} round(s) finished"))?;
        if self.notifications.confetti {
            self.write(&format!("{}\n", CONFETTI.join("\n")))?;
        }
        Ok(())
    }

    fn on_reset(&mut self) -> ListenerResult {
        self.round = 1;
        self.on_break = false;
        self.write(CLEAR_LINE)?;
        self.toast(&format!("{}. [s] start  [q] quit", status_label(Phase::Idle)))
    }

    fn on_clock_fault(&mut self, remaining_secs: u64) -> ListenerResult {
        self.toast(&format!("Clock unavailable. {}", paused_notice(remaining_secs)))
    }
}

/// One JSON object per event, for scripting.
pub struct JsonListener;

impl TimerListener for JsonListener {
    fn name(&self) -> &str {
        "json"
    }

    fn on_event(&mut self, event: &Event) -> ListenerResult {
        let line = serde_json::to_string(event)
            .map_err(|e| ListenerError::new("json", e.to_string()))?;
        let mut out = io::stdout().lock();
        writeln!(out, "{line}").map_err(io_failure)?;
        out.flush().map_err(io_failure)
    }
}
