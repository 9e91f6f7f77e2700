use super::*;

use podslider_core::{DefaultScheduler, Runtime, NANOS_PER_MILLI};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
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

    fn frame(&self) {
        let next = self.time.get() + FRAME;
        self.time.set(next);
        self.handle().run_frame(next);
    }

    fn launch(
        &self,
        animatable: &Animatable,
        target: f32,
        velocity: f32,
    ) -> Rc<RefCell<Option<AnimationResult>>> {
        let result = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&result);
        let animatable = animatable.clone();
        self.handle().spawn_ui(async move {
            let outcome = animatable
                .animate_to(target, SpringSpec::low_bouncy(), velocity)
                .await;
            *slot.borrow_mut() = Some(outcome);
        });
        self.handle().drain_ui();
        result
    }

    fn run_until(&self, done: impl Fn() -> bool, max_frames: usize) {
        let mut frames = 0;
        while !done() && frames < max_frames {
            self.frame();
            frames += 1;
        }
    }
}

#[test]
fn animate_to_settles_exactly_on_target() {
    let harness = Harness::new();
    let animatable = Animatable::new(10.0, harness.handle());

    let result = harness.launch(&animatable, 22.0, 0.0);
    assert!(animatable.is_running());
    harness.run_until(|| result.borrow().is_some(), 1_000);

    let result = result.borrow().expect("animation finished");
    assert_eq!(result.end_reason, AnimationEndReason::Finished);
    assert_eq!(result.end_value, 22.0);
    assert_eq!(animatable.value(), 22.0);
    assert_eq!(animatable.velocity(), 0.0);
    assert!(!animatable.is_running());
}

#[test]
fn first_frame_is_only_the_time_reference() {
    let harness = Harness::new();
    let animatable = Animatable::new(0.0, harness.handle());

    let _result = harness.launch(&animatable, 10.0, 0.0);
    harness.frame();
    assert_eq!(animatable.value(), 0.0);

    harness.frame();
    assert!(animatable.value() > 0.0);
}

#[test]
fn new_animation_interrupts_the_previous_one() {
    let harness = Harness::new();
    let animatable = Animatable::new(0.0, harness.handle());

    let first = harness.launch(&animatable, 20.0, 0.0);
    harness.frame();
    harness.frame();
    let second = harness.launch(&animatable, -5.0, 0.0);
    harness.run_until(|| second.borrow().is_some(), 1_000);

    let first = first.borrow().expect("first animation returned");
    assert_eq!(first.end_reason, AnimationEndReason::Interrupted);
    let second = second.borrow().expect("second animation returned");
    assert_eq!(second.end_reason, AnimationEndReason::Finished);
    assert_eq!(animatable.value(), -5.0);
}

#[test]
fn snap_to_cancels_and_jumps() {
    let harness = Harness::new();
    let animatable = Animatable::new(0.0, harness.handle());

    let result = harness.launch(&animatable, 20.0, 0.0);
    harness.frame();
    harness.frame();
    animatable.snap_to(7.5);
    assert_eq!(animatable.value(), 7.5);
    assert!(!animatable.is_running());

    harness.frame();
    let result = result.borrow().expect("animation returned");
    assert_eq!(result.end_reason, AnimationEndReason::Interrupted);
    assert_eq!(animatable.value(), 7.5);
}

#[test]
fn stop_freezes_value_in_place() {
    let harness = Harness::new();
    let animatable = Animatable::new(0.0, harness.handle());

    let _result = harness.launch(&animatable, 20.0, 0.0);
    for _ in 0..4 {
        harness.frame();
    }
    animatable.stop();
    let frozen = animatable.value();
    for _ in 0..10 {
        harness.frame();
    }

    assert_eq!(animatable.value(), frozen);
    assert_eq!(animatable.target(), frozen);
    assert_eq!(animatable.velocity(), 0.0);
}

#[test]
fn bounds_absorb_overshoot() {
    let harness = Harness::new();
    let animatable = Animatable::new(20.0, harness.handle());
    animatable.update_bounds(5.0, 30.0);

    let state = animatable.state();
    let observed = Rc::new(RefCell::new(Vec::new()));
    let result = harness.launch(&animatable, 5.0, -40.0);
    harness.run_until(
        || {
            observed.borrow_mut().push(state.get());
            result.borrow().is_some()
        },
        1_000,
    );

    assert!(observed.borrow().iter().all(|v| (5.0..=30.0).contains(v)));
    assert_eq!(animatable.value(), 5.0);
}

#[test]
fn target_outside_bounds_is_clamped() {
    let harness = Harness::new();
    let animatable = Animatable::new(10.0, harness.handle());
    animatable.update_bounds(5.0, 30.0);

    let result = harness.launch(&animatable, 3.7, 0.0);
    assert_eq!(animatable.target(), 5.0);
    harness.run_until(|| result.borrow().is_some(), 1_000);

    assert_eq!(animatable.value(), 5.0);
}

#[test]
fn already_resting_animation_finishes_without_frames() {
    let harness = Harness::new();
    let animatable = Animatable::new(12.0, harness.handle());

    let result = harness.launch(&animatable, 12.0, 0.0);

    let result = result.borrow().expect("finished immediately");
    assert_eq!(result.end_reason, AnimationEndReason::Finished);
    assert!(!animatable.is_running());
}

#[test]
fn cancelling_the_task_clears_the_job() {
    let harness = Harness::new();
    let handle = harness.handle();
    let animatable = Animatable::new(0.0, handle.clone());

    let task_animatable = animatable.clone();
    let task = handle
        .spawn_ui(async move {
            task_animatable
                .animate_to(10.0, SpringSpec::low_bouncy(), 0.0)
                .await;
        })
        .expect("runtime alive");
    handle.drain_ui();
    assert!(animatable.is_running());

    task.cancel();

    assert!(!animatable.is_running());
}

#[test]
fn non_finite_inputs_are_ignored() {
    let harness = Harness::new();
    let animatable = Animatable::new(8.0, harness.handle());

    animatable.snap_to(f32::NAN);
    assert_eq!(animatable.value(), 8.0);

    let _result = harness.launch(&animatable, f32::NAN, f32::INFINITY);
    assert_eq!(animatable.target(), 8.0);
    assert_eq!(animatable.velocity(), 0.0);
}
