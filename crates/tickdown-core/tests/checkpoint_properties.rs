//! Property tests: checkpoints fire exactly as often as they should no
//! matter how irregular the polling is.

use proptest::prelude::*;
use tickdown_core::{Event, ManualClock, RoundController, TimerConfig};

const LEAD: u64 = 4;

fn count(events: &[Event], wanted: &Event) -> usize {
    events.iter().filter(|e| *e == wanted).count()
}

fn time_changes(events: &[Event]) -> Vec<u64> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::TimeChanged { remaining_secs, .. } => Some(*remaining_secs),
            _ => None,
        })
        .collect()
}

/// Run a single-round session, polling with the given gaps (cycled), and
/// pausing for `pause_ms` after every `pause_every`-th poll.
///
/// A pause freezes the remaining time rounded up to the whole second, so a
/// pause only happens once at least a second has run since the last resume.
/// Otherwise a session paused every few milliseconds would never finish.
fn simulate(total: u64, gaps: &[u64], pause_every: usize, pause_ms: u64) -> Vec<Event> {
    let clock = ManualClock::new(0);
    let mut ctl = RoundController::new(clock.clone(), LEAD);
    let config = TimerConfig::single(total);
    let mut events = ctl.start(config);

    let mut polls = 0usize;
    let mut running_ms = 0u64;
    while !ctl.is_session_complete() && polls < 1_000_000 {
        let gap = gaps[polls % gaps.len()];
        clock.advance_ms(gap);
        running_ms += gap;
        events.extend(ctl.tick());
        polls += 1;
        if pause_every > 0 && polls % pause_every == 0 && running_ms >= 1_000 {
            events.extend(ctl.pause());
            clock.advance_ms(pause_ms);
            events.extend(ctl.start(config));
            running_ms = 0;
        }
    }
    events
}

proptest! {
    #[test]
    fn prop_completion_fires_exactly_once(
        total in 1u64..400,
        gaps in prop::collection::vec(50u64..3_000, 1..8),
    ) {
        let events = simulate(total, &gaps, 0, 0);
        prop_assert_eq!(count(&events, &Event::Completion), 1);
        prop_assert_eq!(count(&events, &Event::SessionComplete { rounds: 1 }), 1);
    }

    #[test]
    fn prop_time_changes_strictly_decrease_to_zero(
        total in 1u64..400,
        gaps in prop::collection::vec(50u64..3_000, 1..8),
    ) {
        let changes = time_changes(&simulate(total, &gaps, 0, 0));
        prop_assert_eq!(changes.first().copied(), Some(total));
        prop_assert_eq!(changes.last().copied(), Some(0));
        prop_assert!(changes.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn prop_half_and_lead_fire_iff_reachable(
        total in 1u64..400,
        gaps in prop::collection::vec(50u64..3_000, 1..8),
    ) {
        let events = simulate(total, &gaps, 0, 0);
        let expect_half = usize::from(total / 2 > 0);
        let expect_lead = usize::from(total > LEAD);
        prop_assert_eq!(count(&events, &Event::HalfTime), expect_half);
        prop_assert_eq!(count(&events, &Event::LeadTime), expect_lead);
    }

    #[test]
    fn prop_pauses_do_not_change_checkpoint_counts(
        total in 1u64..200,
        gaps in prop::collection::vec(50u64..2_000, 1..6),
        pause_every in 1usize..5,
        pause_ms in 0u64..10_000,
    ) {
        let events = simulate(total, &gaps, pause_every, pause_ms);
        prop_assert_eq!(count(&events, &Event::Completion), 1);
        prop_assert_eq!(count(&events, &Event::HalfTime), usize::from(total / 2 > 0));
        prop_assert_eq!(count(&events, &Event::LeadTime), usize::from(total > LEAD));
        let changes = time_changes(&events);
        prop_assert!(changes.windows(2).all(|w| w[0] > w[1]));
    }
}
