//! Display helpers shared by every front end.

use super::engine::Phase;

/// `MM:SS`, zero padded. Minutes are not wrapped into hours.
pub fn format_clock(total_secs: u64) -> String {
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{mins:02}:{secs:02}")
}

/// Elapsed share of a segment as 0.0 ..= 100.0. Zero when `total_secs` is 0.
pub fn progress_pct(remaining_secs: u64, total_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    let elapsed = total_secs.saturating_sub(remaining_secs) as f64;
    (elapsed / total_secs as f64 * 100.0).clamp(0.0, 100.0)
}

pub fn status_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Idle",
        Phase::Running => "Running",
        Phase::Paused => "Paused",
        Phase::Completed => "Completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(5 * 60), "05:00");
        assert_eq!(format_clock(99 * 60 + 59), "99:59");
        assert_eq!(format_clock(100 * 60 + 1), "100:01");
    }

    #[test]
    fn progress_bounds() {
        assert_eq!(progress_pct(0, 0), 0.0);
        assert_eq!(progress_pct(10, 10), 0.0);
        assert_eq!(progress_pct(5, 10), 50.0);
        assert_eq!(progress_pct(0, 10), 100.0);
        assert_eq!(progress_pct(20, 10), 0.0);
    }

    #[test]
    fn labels() {
        assert_eq!(status_label(Phase::Paused), "Paused");
        assert_eq!(status_label(Phase::Completed), "Completed");
    }
}
