//! Integration tests for single-segment countdowns.
//!
//! Drives the round controller with a manual clock the way a front end's
//! poll loop would, and checks the event stream it produces.

use tickdown_core::{Event, ManualClock, Phase, RoundController, TimerConfig};

const LEAD: u64 = 4;

fn setup() -> (RoundController<ManualClock>, ManualClock) {
    let clock = ManualClock::new(1_700_000_000_000);
    (RoundController::new(clock.clone(), LEAD), clock)
}

/// Poll every `step_ms` until the session completes.
fn run_to_end(
    ctl: &mut RoundController<ManualClock>,
    clock: &ManualClock,
    step_ms: u64,
) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..100_000 {
        if ctl.is_session_complete() {
            break;
        }
        clock.advance_ms(step_ms);
        events.extend(ctl.tick());
    }
    events
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

fn count(events: &[Event], wanted: &Event) -> usize {
    events.iter().filter(|e| *e == wanted).count()
}

/// Remaining value announced by the last `TimeChanged` before `index`.
fn remaining_before(events: &[Event], index: usize) -> Option<u64> {
    events[..index].iter().rev().find_map(|e| match e {
        Event::TimeChanged { remaining_secs, .. } => Some(*remaining_secs),
        _ => None,
    })
}

#[test]
fn ten_second_countdown_fires_each_checkpoint_once() {
    let (mut ctl, clock) = setup();
    let mut events = ctl.start(TimerConfig::single(10));
    events.extend(run_to_end(&mut ctl, &clock, 250));

    assert_eq!(time_changes(&events), (0..=10).rev().collect::<Vec<_>>());
    assert_eq!(count(&events, &Event::HalfTime), 1);
    assert_eq!(count(&events, &Event::LeadTime), 1);
    assert_eq!(count(&events, &Event::Completion), 1);

    let half = events.iter().position(|e| *e == Event::HalfTime).unwrap();
    assert_eq!(remaining_before(&events, half), Some(5));
    assert_eq!(remaining_before(&events, half - 1), Some(6));

    let lead = events.iter().position(|e| *e == Event::LeadTime).unwrap();
    assert_eq!(remaining_before(&events, lead), Some(4));
    assert_eq!(remaining_before(&events, lead - 1), Some(5));

    let done = events.iter().position(|e| *e == Event::Completion).unwrap();
    assert_eq!(remaining_before(&events, done), Some(0));
    assert_eq!(events.last(), Some(&Event::SessionComplete { rounds: 1 }));
    assert_eq!(ctl.phase(), Phase::Completed);
}

#[test]
fn two_second_countdown_skips_lead_time() {
    let (mut ctl, clock) = setup();
    let mut events = ctl.start(TimerConfig::single(2));
    events.extend(run_to_end(&mut ctl, &clock, 250));

    assert_eq!(time_changes(&events), vec![2, 1, 0]);
    assert_eq!(count(&events, &Event::LeadTime), 0);
    assert_eq!(count(&events, &Event::HalfTime), 1);
    assert_eq!(count(&events, &Event::Completion), 1);
}

#[test]
fn one_second_countdown_has_no_half_time() {
    let (mut ctl, clock) = setup();
    let mut events = ctl.start(TimerConfig::single(1));
    events.extend(run_to_end(&mut ctl, &clock, 250));

    assert_eq!(count(&events, &Event::HalfTime), 0);
    assert_eq!(count(&events, &Event::LeadTime), 0);
    assert_eq!(count(&events, &Event::Completion), 1);
}

#[test]
fn coarse_polling_still_fires_skipped_checkpoints() {
    let (mut ctl, clock) = setup();
    let mut events = ctl.start(TimerConfig::single(10));
    // 3.7s polls jump straight over 5 and 4.
    events.extend(run_to_end(&mut ctl, &clock, 3_700));

    assert_eq!(count(&events, &Event::HalfTime), 1);
    assert_eq!(count(&events, &Event::LeadTime), 1);
    assert_eq!(count(&events, &Event::Completion), 1);
    assert_eq!(time_changes(&events).last(), Some(&0));
}

#[test]
fn long_suspension_completes_on_next_poll() {
    let (mut ctl, clock) = setup();
    ctl.start(TimerConfig::single(60));
    clock.advance_secs(3_600);
    let events = ctl.tick();
    assert_eq!(
        events,
        vec![
            Event::TimeChanged {
                remaining_secs: 0,
                total_secs: 60
            },
            Event::HalfTime,
            Event::LeadTime,
            Event::Completion,
            Event::SessionComplete { rounds: 1 },
        ]
    );
    assert!(ctl.tick().is_empty());
}

#[test]
fn pause_then_resume_preserves_remaining() {
    let (mut ctl, clock) = setup();
    ctl.start(TimerConfig::single(30));
    clock.advance_ms(12_300);
    ctl.tick();
    ctl.pause();
    let remaining = ctl.snapshot().remaining_secs;
    assert_eq!(remaining, 18);

    clock.advance_secs(500);
    ctl.start(TimerConfig::single(30));
    assert!(ctl.tick().is_empty());
    assert_eq!(ctl.snapshot().remaining_secs, remaining);

    let events = run_to_end(&mut ctl, &clock, 250);
    assert_eq!(count(&events, &Event::Completion), 1);
    assert_eq!(time_changes(&events), (0..18).rev().collect::<Vec<_>>());
}

#[test]
fn repeated_pauses_never_refire_checkpoints() {
    let (mut ctl, clock) = setup();
    let mut events = ctl.start(TimerConfig::single(12));
    // Each run leg must exceed a second: a pause freezes the remaining
    // time rounded up, so shorter legs would never reach zero.
    while !ctl.is_session_complete() {
        clock.advance_ms(1_700);
        events.extend(ctl.tick());
        events.extend(ctl.pause());
        clock.advance_secs(2);
        events.extend(ctl.start(TimerConfig::single(12)));
    }

    assert_eq!(count(&events, &Event::HalfTime), 1);
    assert_eq!(count(&events, &Event::LeadTime), 1);
    assert_eq!(count(&events, &Event::Completion), 1);
    let changes = time_changes(&events);
    assert!(changes.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn reset_from_every_phase_returns_to_idle() {
    let (mut ctl, clock) = setup();
    let config = TimerConfig::new(10, 2, 5).unwrap();

    type Prepare = Box<dyn Fn(&mut RoundController<ManualClock>)>;
    let phases: Vec<Prepare> = vec![
        Box::new(|_: &mut RoundController<ManualClock>| {}),
        Box::new(move |c: &mut RoundController<ManualClock>| {
            c.start(config);
        }),
        Box::new(move |c: &mut RoundController<ManualClock>| {
            c.start(config);
            c.pause();
        }),
    ];

    for prepare in phases {
        prepare(&mut ctl);
        clock.advance_secs(6);
        ctl.tick();
        assert_eq!(ctl.reset(), vec![Event::Reset]);
        let snap = ctl.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.remaining_secs, 0);
        assert_eq!(snap.total_secs, 0);
        assert!(!ctl.engine().flags().any_fired());
    }

    ctl.start(TimerConfig::single(1));
    clock.advance_secs(1);
    ctl.tick();
    assert_eq!(ctl.phase(), Phase::Completed);
    ctl.reset();
    assert_eq!(ctl.phase(), Phase::Idle);
    assert!(!ctl.is_session_complete());
}
