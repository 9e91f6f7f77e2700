use super::*;

use podslider_core::{DefaultScheduler, Runtime, NANOS_PER_MILLI};
use std::cell::{Cell, RefCell};
use std::sync::Arc;

const FRAME: u64 = 16 * NANOS_PER_MILLI;

struct Harness {
    runtime: Runtime,
    time: Cell<u64>,
}

impl Harness {
    fn new() -> Self {
        Self {
            runtime: Runtime::new(Arc::new(DefaultScheduler)),
            time: Cell::new(0),
        }
    }

    fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    fn slider(&self, initial: f32, low: i32, high: i32) -> SliderState {
        let range = TickRange::new(low, high).expect("valid range");
        SliderState::new(self.handle(), initial, range)
    }

    fn frame(&self) {
        let next = self.time.get() + FRAME;
        self.time.set(next);
        self.handle().run_frame(next);
    }

    fn frames(&self, count: usize) {
        for _ in 0..count {
            self.frame();
        }
    }

    fn decay(
        &self,
        state: &SliderState,
        velocity: f32,
        hint: f32,
    ) -> Rc<RefCell<Option<AnimationResult>>> {
        let result = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&result);
        let state = state.clone();
        self.handle().spawn_ui(async move {
            let outcome = state.decay_to(velocity, hint).await;
            *slot.borrow_mut() = Some(outcome);
        });
        self.handle().drain_ui();
        result
    }

    fn settle(&self, state: &SliderState, velocity: f32, hint: f32) -> AnimationResult {
        let result = self.decay(state, velocity, hint);
        let mut frames = 0;
        while result.borrow().is_none() && frames < 2_000 {
            self.frame();
            frames += 1;
        }
        let outcome = result.borrow().expect("settle finished");
        outcome
    }
}

#[test]
fn new_clamps_initial_value() {
    let harness = Harness::new();
    assert_eq!(harness.slider(42.0, 5, 30).current_value(), 30.0);
    assert_eq!(harness.slider(-1.0, 5, 30).current_value(), 5.0);
    assert_eq!(harness.slider(12.5, 5, 30).current_value(), 12.5);
}

#[test]
fn snap_to_clamps_with_no_residual_motion() {
    let harness = Harness::new();
    let state = harness.slider(10.0, 5, 30);

    for (input, expected) in [(17.3, 17.3), (40.0, 30.0), (-2.0, 5.0), (5.0, 5.0)] {
        state.snap_to(input);
        assert_eq!(state.current_value(), expected, "snap_to({input})");
        assert_eq!(state.phase(), MotionPhase::Idle);
    }

    harness.frames(10);
    assert_eq!(state.current_value(), 5.0);
}

#[test]
fn snap_to_non_finite_stays_in_range() {
    let harness = Harness::new();
    let state = harness.slider(10.0, 5, 30);

    state.snap_to(f32::NAN);
    assert!(state.current_value().is_finite());
    assert!(state.range().contains(state.current_value()));

    state.snap_to(f32::INFINITY);
    assert_eq!(state.current_value(), 30.0);
    state.snap_to(f32::NEG_INFINITY);
    assert_eq!(state.current_value(), 5.0);
}

mod snap_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_snap_to_clamps_into_range(
            v in -1.0e6f32..1.0e6,
            low in -1_000i32..1_000,
            span in 0i32..1_000,
        ) {
            let harness = Harness::new();
            let high = low + span;
            let state = harness.slider(low as f32, low, high);

            state.snap_to(v);

            prop_assert_eq!(state.current_value(), v.clamp(low as f32, high as f32));
            prop_assert_eq!(state.phase(), MotionPhase::Idle);
            harness.frames(2);
            prop_assert_eq!(state.current_value(), v.clamp(low as f32, high as f32));
        }

        #[test]
        fn prop_snap_to_any_input_stays_in_range(
            v in proptest::num::f32::ANY,
            low in -1_000i32..1_000,
            span in 0i32..1_000,
        ) {
            let harness = Harness::new();
            let state = harness.slider(low as f32, low, low + span);

            state.snap_to(v);

            let value = state.current_value();
            prop_assert!(value.is_finite());
            prop_assert!(state.range().contains(value), "snap_to({}) gave {}", v, value);
        }
    }
}

#[test]
fn decay_settles_on_rounded_clamped_hint() {
    let harness = Harness::new();
    let state = harness.slider(10.0, 5, 30);

    let cases = [
        (0.0, 22.4, 22.0),
        (0.0, 22.5, 23.0),
        (-15.0, 3.7, 5.0),
        (30.0, 99.0, 30.0),
        (-40.0, 17.6, 18.0),
        (0.0, f32::MAX, 30.0),
    ];
    for (velocity, hint, expected) in cases {
        let result = harness.settle(&state, velocity, hint);
        assert_eq!(result.end_reason, AnimationEndReason::Finished);
        assert_eq!(state.current_value(), expected, "hint {hint}");
        assert_eq!(state.phase(), MotionPhase::Idle);
    }
}

#[test]
fn decay_never_leaves_the_range() {
    let harness = Harness::new();
    let state = harness.slider(28.0, 5, 30);
    let observed = state.value_state();

    let result = harness.decay(&state, 120.0, 30.0);
    let mut frames = 0;
    while result.borrow().is_none() && frames < 2_000 {
        harness.frame();
        assert!((5.0..=30.0).contains(&observed.get()));
        frames += 1;
    }
    assert_eq!(state.current_value(), 30.0);
}

#[test]
fn decay_with_non_finite_hint_settles_near_current_value() {
    let harness = Harness::new();
    let state = harness.slider(12.2, 5, 30);

    harness.settle(&state, f32::NAN, f32::NAN);

    assert_eq!(state.current_value(), 12.0);
}

#[test]
fn decay_reports_decaying_until_rest() {
    let harness = Harness::new();
    let state = harness.slider(10.0, 5, 30);

    let result = harness.decay(&state, 0.0, 20.0);
    assert_eq!(state.phase(), MotionPhase::Decaying);
    harness.frames(3);
    assert_eq!(state.phase(), MotionPhase::Decaying);
    assert!(result.borrow().is_none());
}

#[test]
fn stop_during_decay_freezes_value() {
    let harness = Harness::new();
    let state = harness.slider(10.0, 5, 30);

    let result = harness.decay(&state, 0.0, 25.0);
    harness.frames(6);
    state.stop();
    let frozen = state.current_value();
    assert!(frozen > 10.0 && frozen < 25.0);
    assert_eq!(state.phase(), MotionPhase::Idle);

    harness.frames(20);
    assert_eq!(state.current_value(), frozen);
    let result = result.borrow().expect("decay returned");
    assert_eq!(result.end_reason, AnimationEndReason::Interrupted);

    state.snap_to(7.0);
    assert_eq!(state.current_value(), 7.0);
}

#[test]
fn snap_interrupts_a_running_decay() {
    let harness = Harness::new();
    let state = harness.slider(10.0, 5, 30);

    let result = harness.decay(&state, 0.0, 25.0);
    harness.frames(4);
    state.snap_to(6.0);
    harness.frames(20);

    assert_eq!(state.current_value(), 6.0);
    assert_eq!(state.phase(), MotionPhase::Idle);
    let result = result.borrow().expect("decay returned");
    assert_eq!(result.end_reason, AnimationEndReason::Interrupted);
}

#[test]
fn new_decay_replaces_the_running_one() {
    let harness = Harness::new();
    let state = harness.slider(10.0, 5, 30);

    let first = harness.decay(&state, 0.0, 25.0);
    harness.frames(4);
    let second = harness.decay(&state, 0.0, 8.0);
    assert_eq!(state.phase(), MotionPhase::Decaying);

    let mut frames = 0;
    while second.borrow().is_none() && frames < 2_000 {
        harness.frame();
        frames += 1;
    }

    let first = first.borrow().expect("first decay returned");
    assert_eq!(first.end_reason, AnimationEndReason::Interrupted);
    assert_eq!(state.current_value(), 8.0);
    assert_eq!(state.phase(), MotionPhase::Idle);
}

#[test]
fn dropping_a_decay_future_returns_to_idle() {
    let harness = Harness::new();
    let state = harness.slider(10.0, 5, 30);

    let task_state = state.clone();
    let task = harness
        .handle()
        .spawn_ui(async move {
            task_state.decay_to(0.0, 25.0).await;
        })
        .expect("runtime alive");
    harness.handle().drain_ui();
    harness.frames(3);
    assert_eq!(state.phase(), MotionPhase::Decaying);

    task.cancel();

    assert_eq!(state.phase(), MotionPhase::Idle);
    let frozen = state.current_value();
    harness.frames(5);
    assert_eq!(state.current_value(), frozen);
}

#[test]
fn enqueued_snaps_apply_latest_on_drain() {
    let harness = Harness::new();
    let state = harness.slider(10.0, 5, 30);

    state.enqueue_snap(12.0);
    state.enqueue_snap(14.0);
    state.enqueue_snap(40.0);
    assert_eq!(state.phase(), MotionPhase::Snapping);
    assert_eq!(state.current_value(), 10.0);
    assert_eq!(state.latest_value(), 30.0);

    harness.handle().drain_ui();

    assert_eq!(state.current_value(), 30.0);
    assert_eq!(state.phase(), MotionPhase::Idle);
    assert!(!state.apply_pending_snap());
}

#[test]
fn stop_discards_a_queued_snap() {
    let harness = Harness::new();
    let state = harness.slider(10.0, 5, 30);

    state.enqueue_snap(20.0);
    state.stop();
    harness.handle().drain_ui();

    assert_eq!(state.current_value(), 10.0);
    assert_eq!(state.phase(), MotionPhase::Idle);
    assert_eq!(state.latest_value(), 10.0);
}

#[test]
fn enqueue_after_drain_schedules_again() {
    let harness = Harness::new();
    let state = harness.slider(10.0, 5, 30);

    state.enqueue_snap(11.0);
    harness.handle().drain_ui();
    state.enqueue_snap(13.5);
    harness.handle().drain_ui();

    assert_eq!(state.current_value(), 13.5);
}

#[test]
fn pinned_range_holds_its_value() {
    let harness = Harness::new();
    let state = harness.slider(3.0, 10, 10);
    assert_eq!(state.current_value(), 10.0);

    state.snap_to(25.0);
    assert_eq!(state.current_value(), 10.0);
    state.enqueue_snap(-4.0);
    harness.handle().drain_ui();
    assert_eq!(state.current_value(), 10.0);

    let result = harness.settle(&state, 80.0, 18.0);
    assert_eq!(result.end_reason, AnimationEndReason::Finished);
    assert_eq!(state.current_value(), 10.0);
}

#[test]
fn current_tick_rounds_the_value() {
    let harness = Harness::new();
    let state = harness.slider(12.5, 5, 30);
    assert_eq!(state.current_tick(), 13);
    state.snap_to(12.49);
    assert_eq!(state.current_tick(), 12);
}

#[test]
fn save_then_restore_reproduces_value_and_range() {
    let harness = Harness::new();
    let state = harness.slider(10.0, 5, 30);
    state.snap_to(17.3);

    let saved = state.save();
    assert_eq!(
        saved,
        SavedSliderState {
            value: 17.3,
            range_low: 5,
            range_high: 30,
        }
    );

    let restored = SliderState::restore(harness.handle(), saved).expect("valid state");
    assert_eq!(restored.current_value(), 17.3);
    assert_eq!(restored.range(), state.range());
    assert_eq!(restored.phase(), MotionPhase::Idle);
    harness.frames(5);
    assert_eq!(restored.current_value(), 17.3);
}

#[test]
fn restore_rejects_invalid_triples() {
    let harness = Harness::new();

    let inverted = SliderState::restore(harness.handle(), (10.0, 30, 5).into());
    assert_eq!(
        inverted.unwrap_err(),
        SliderError::InvalidRange { low: 30, high: 5 }
    );

    let outside = SliderState::restore(harness.handle(), (31.0, 5, 30).into());
    assert_eq!(
        outside.unwrap_err(),
        SliderError::ValueOutOfRange {
            value: 31.0,
            low: 5,
            high: 30,
        }
    );

    let nan = SliderState::restore(harness.handle(), (f32::NAN, 5, 30).into());
    assert!(matches!(
        nan.unwrap_err(),
        SliderError::NonFiniteValue { .. }
    ));
}

#[test]
fn from_config_uses_configured_spring() {
    let harness = Harness::new();
    let spring = SpringSpec::new(1.0, 400.0);
    let config = SliderConfig::default()
        .with_initial_value(12.0)
        .with_spring(spring);

    let state = SliderState::from_config(harness.handle(), &config);

    assert_eq!(state.current_value(), 12.0);
    assert_eq!(state.range(), TickRange::DEFAULT);
    assert_eq!(state.spring(), spring);
}

#[test]
fn value_state_tracks_motion() {
    let harness = Harness::new();
    let state = harness.slider(10.0, 5, 30);
    let observed = state.value_state();
    let version = observed.version();

    state.snap_to(21.0);

    assert_eq!(observed.get(), 21.0);
    assert!(observed.version() > version);
}
