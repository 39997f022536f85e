use std::cell::RefCell;
use std::rc::Rc;

use fxshader_wasm::frame::{CancelToken, FrameLoop, PointerPosition, PointerTracker, RenderClock};

#[test]
fn clock_adds_seed_to_elapsed_seconds() {
    let clock = RenderClock::new(0.25, 1_000.0);
    assert_eq!(clock.time(1_000.0), 0.25);
    assert_eq!(clock.time(3_500.0), 2.75);
}

#[test]
fn instances_with_different_seeds_diverge_on_the_same_clock() {
    let a = RenderClock::new(0.1, 0.0);
    let b = RenderClock::new(0.9, 0.0);
    assert_ne!(a.time(5_000.0), b.time(5_000.0));
}

#[test]
fn pointer_is_normalised_by_window_size() {
    let p = PointerPosition::from_client(200.0, 150.0, 800.0, 600.0).expect("window has area");
    assert_eq!(p, PointerPosition { x: 0.25, y: 0.25 });

    // Outside the viewport is reported as-is.
    let outside =
        PointerPosition::from_client(-80.0, 1200.0, 800.0, 600.0).expect("window has area");
    assert_eq!(outside, PointerPosition { x: -0.1, y: 2.0 });
}

#[test]
fn pointer_tracker_starts_centred_and_ignores_empty_windows() {
    let tracker = PointerTracker::default();
    assert_eq!(tracker.get(), PointerPosition { x: 0.5, y: 0.5 });

    tracker.observe(10.0, 10.0, 0.0, 600.0);
    assert_eq!(tracker.get(), PointerPosition { x: 0.5, y: 0.5 });

    let shared = tracker.clone();
    shared.observe(400.0, 0.0, 800.0, 600.0);
    assert_eq!(tracker.get(), PointerPosition { x: 0.5, y: 0.0 });
}

#[test]
fn frame_loop_runs_until_cancelled() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let token = CancelToken::new();
    let mut frames = {
        let seen = Rc::clone(&seen);
        FrameLoop::new(move |now| seen.borrow_mut().push(now), token.clone())
    };

    for now in [16.0, 32.0, 48.0] {
        assert!(frames.tick(now));
    }
    token.cancel();
    assert!(!frames.tick(64.0));
    assert!(frames.token().is_cancelled());

    assert_eq!(frames.frames(), 3);
    assert_eq!(*seen.borrow(), vec![16.0, 32.0, 48.0]);
}
