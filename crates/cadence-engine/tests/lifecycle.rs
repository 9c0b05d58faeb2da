use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use cadence_engine::platform::headless::{HeadlessControl, Journal};
use cadence_engine::time::{frame_budget, Clock, ManualClock, MAX_DELTA};
use cadence_engine::{is_engine_live, Color, Engine, EngineConfig, InitError, Subsystems};

static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

struct Rig {
    control: HeadlessControl,
    journal: Journal,
    clock: ManualClock,
    engine: Engine,
}

fn rig() -> Rig {
    let control = HeadlessControl::new();
    let journal = Journal::new();
    let clock = ManualClock::new();
    let engine = Engine::new(
        Subsystems::headless(&control, &journal)
            .with_clock(clock.clone())
            .with_suspender(clock.clone()),
    );
    Rig {
        control,
        journal,
        clock,
        engine,
    }
}

#[test]
fn second_init_fails_and_keeps_the_first_state() {
    let _guard = serial();
    let mut r = rig();

    r.engine
        .init(EngineConfig::default().with_size(800, 600).with_target_fps(30))
        .unwrap();
    r.engine.update();

    let err = r
        .engine
        .init(EngineConfig::default().with_size(320, 200))
        .unwrap_err();

    assert!(matches!(err, InitError::AlreadyInitialized));
    assert!(r.engine.is_window_ready());
    assert_eq!(r.engine.window_size(), (800, 600));
    assert_eq!(r.engine.target_fps(), 30);
    assert_eq!(r.engine.frame_count(), 1);
    assert_eq!(r.journal.filtered("window.create").len(), 1);
}

#[test]
fn only_one_engine_is_live_per_process() {
    let _guard = serial();
    let mut first = rig();
    let mut second = rig();

    first.engine.init(EngineConfig::default()).unwrap();
    assert!(is_engine_live());

    assert!(matches!(
        second.engine.init(EngineConfig::default()),
        Err(InitError::AlreadyInitialized)
    ));
    assert!(second.journal.entries().is_empty());

    first.engine.shutdown();
    assert!(!is_engine_live());

    second.engine.init(EngineConfig::default()).unwrap();
    assert!(second.engine.is_window_ready());
    second.engine.shutdown();
}

#[test]
fn shutdown_without_init_is_a_no_op() {
    let _guard = serial();
    let mut r = rig();

    r.engine.shutdown();
    r.engine.shutdown();

    assert!(r.journal.entries().is_empty());
    assert!(!r.engine.is_window_ready());
}

#[test]
fn delta_time_stays_within_bounds() {
    let _guard = serial();
    let mut r = rig();
    r.engine.init(EngineConfig::default()).unwrap();

    let max = MAX_DELTA.as_secs_f32();
    for jump_ms in [0, 1, 16, 50, 99, 100, 101, 250, 10_000, 3_600_000] {
        r.clock.advance(Duration::from_millis(jump_ms));
        r.engine.update();

        let dt = r.engine.delta_time();
        assert!((0.0..=max).contains(&dt), "dt {dt} after a {jump_ms}ms jump");
    }

    assert_eq!(r.engine.frame_time(), max);
}

#[test]
fn capped_update_waits_out_the_frame_budget() {
    let _guard = serial();
    let mut r = rig();
    r.engine.init(EngineConfig::default().with_target_fps(60)).unwrap();
    let budget = frame_budget(60).unwrap();

    for _ in 0..5 {
        let before = r.clock.now();
        r.engine.update();
        let spent = r.clock.now() - before;
        assert!(spent >= budget, "tick returned after {spent:?}");
        assert!(spent < budget + Duration::from_millis(1));
    }

    assert!(r.clock.sleeps() >= 5);
    assert!(r.clock.yields() > 0);
}

#[test]
fn late_tick_is_not_delayed() {
    let _guard = serial();
    let mut r = rig();
    r.engine.init(EngineConfig::default().with_target_fps(60)).unwrap();
    r.engine.update();
    let sleeps = r.clock.sleeps();

    r.clock.advance(Duration::from_millis(40));
    r.engine.update();

    assert_eq!(r.clock.sleeps(), sleeps);
    assert_eq!(r.engine.frame_time(), 0.04);
}

#[test]
fn resize_is_reported_on_exactly_one_tick() {
    let _guard = serial();
    let mut r = rig();
    r.engine.init(EngineConfig::default().with_size(800, 600)).unwrap();

    r.engine.update();
    assert!(!r.engine.is_window_resized());

    r.control.set_size(1024, 768);
    r.engine.update();
    assert!(r.engine.is_window_resized());
    assert_eq!((r.engine.screen_width(), r.engine.screen_height()), (1024, 768));

    r.engine.update();
    assert!(!r.engine.is_window_resized());
}

#[test]
fn thirty_ticks_a_second_read_as_thirty_fps() {
    let _guard = serial();
    let mut r = rig();
    r.engine.init(EngineConfig::default()).unwrap();
    let step = Duration::from_secs_f64(1.0 / 30.0);

    for tick in 1..=30 {
        r.clock.advance(step);
        r.engine.update();
        if tick < 30 {
            assert_eq!(r.engine.fps(), 0, "published early on tick {tick}");
        }
    }

    assert_eq!(r.engine.fps(), 30);
}

#[test]
fn frame_count_grows_by_one_per_update() {
    let _guard = serial();
    let mut r = rig();
    r.engine.init(EngineConfig::default()).unwrap();

    for expected in 1..=10 {
        r.clock.advance(Duration::from_millis(5));
        r.engine.update();
        assert_eq!(r.engine.frame_count(), expected);
    }
}

#[test]
fn time_counts_from_init() {
    let _guard = serial();
    let mut r = rig();
    r.clock.advance(Duration::from_secs(7));
    r.engine.init(EngineConfig::default()).unwrap();

    r.clock.advance(Duration::from_millis(2500));

    assert!((r.engine.time() - 2.5).abs() < 1e-9);
}

#[test]
fn queries_return_defaults_outside_a_lifetime() {
    let _guard = serial();
    let mut r = rig();

    let check = |e: &Engine| {
        assert_eq!(e.frame_count(), 0);
        assert_eq!(e.fps(), 0);
        assert_eq!(e.frame_time(), 0.0);
        assert_eq!(e.time(), 0.0);
        assert_eq!(e.target_fps(), 0);
        assert_eq!(e.window_size(), (0, 0));
        assert!(!e.window_should_close());
        assert!(!e.is_window_ready());
        assert_eq!(e.mouse_position(), (0.0, 0.0));
        assert!(e.assets().is_none());
    };

    check(&r.engine);
    assert_eq!(r.engine.random_value(1, 6), 0);

    r.engine.init(EngineConfig::default().with_target_fps(60)).unwrap();
    r.engine.update();
    r.engine.shutdown();

    check(&r.engine);
}

#[test]
fn loop_ends_when_the_window_asks_to_close() {
    let _guard = serial();
    let mut r = rig();
    r.engine.init(EngineConfig::default().with_target_fps(120)).unwrap();

    let mut ticks = 0;
    while !r.engine.window_should_close() {
        r.engine.update();
        ticks += 1;
        if ticks == 12 {
            r.control.request_close();
        }
    }
    r.engine.shutdown();

    assert_eq!(ticks, 12);
    assert_eq!(r.control.polls(), 12);
    assert!(!r.control.is_open());
}

#[test]
fn seeded_random_values_repeat() {
    let _guard = serial();
    let mut r = rig();

    r.engine.init(EngineConfig::default().with_seed(42)).unwrap();
    let first: Vec<i32> = (0..16).map(|_| r.engine.random_value(-100, 100)).collect();
    r.engine.shutdown();

    r.engine.init(EngineConfig::default().with_seed(42)).unwrap();
    let second: Vec<i32> = (0..16).map(|_| r.engine.random_value(-100, 100)).collect();

    assert_eq!(first, second);
    assert!(first.iter().all(|v| (-100..=100).contains(v)));

    r.engine.set_random_seed(42);
    let third: Vec<i32> = (0..16).map(|_| r.engine.random_value(-100, 100)).collect();
    assert_eq!(first, third);
}

#[test]
fn random_bounds_are_inclusive_in_either_order() {
    let _guard = serial();
    let mut r = rig();
    r.engine.init(EngineConfig::default().with_seed(7)).unwrap();

    assert_eq!(r.engine.random_value(5, 5), 5);
    for _ in 0..200 {
        let v = r.engine.random_value(10, 1);
        assert!((1..=10).contains(&v));
    }
}

#[test]
fn reinit_after_shutdown_starts_fresh_statistics() {
    let _guard = serial();
    let mut r = rig();

    r.engine.init(EngineConfig::default()).unwrap();
    for _ in 0..3 {
        r.clock.advance(Duration::from_millis(10));
        r.engine.update();
    }
    r.engine.shutdown();

    r.engine.init(EngineConfig::default()).unwrap();
    assert_eq!(r.engine.frame_count(), 0);
    assert_eq!(r.engine.fps(), 0);
    assert_eq!(
        r.journal.filtered("window.create").len(),
        2,
        "each lifetime gets its own window"
    );
}

#[test]
fn long_run_with_disabled_journal_keeps_no_entries() {
    let _guard = serial();
    let control = HeadlessControl::new();
    let journal = Journal::disabled();
    let clock = ManualClock::new();
    let mut engine = Engine::new(
        Subsystems::headless(&control, &journal)
            .with_clock(clock.clone())
            .with_suspender(clock.clone()),
    );
    engine.init(EngineConfig::default().with_target_fps(0)).unwrap();

    for _ in 0..5_000 {
        clock.advance(Duration::from_millis(1));
        engine.update();
        engine.present(Color::rgba(0.0, 0.0, 0.0, 1.0)).unwrap();
    }
    engine.shutdown();

    assert!(journal.is_empty());
    assert_eq!(control.polls(), 5_000);
}
