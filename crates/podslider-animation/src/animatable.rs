use crate::spring::SpringSpec;
use log::trace;
use podslider_core::{CancelToken, MutableState, RuntimeHandle, State};
use std::cell::RefCell;
use std::rc::Rc;

const NANOS_PER_SEC: f32 = 1_000_000_000.0;

/// Why an animation returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEndReason {
    /// The animation reached its target and came to rest.
    Finished,
    /// A snap, a stop, or a newer animation took over.
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationResult {
    pub end_reason: AnimationEndReason,
    pub end_value: f32,
}

/// A float that animates toward targets on frame time.
///
/// Starting an animation, snapping, or stopping implicitly cancels the
/// animation in flight. The value is always kept inside the bounds: a bound
/// behaves as an inelastic stop that absorbs velocity heading into it.
#[derive(Clone)]
pub struct Animatable {
    inner: Rc<RefCell<AnimatableInner>>,
    runtime: RuntimeHandle,
}

struct AnimatableInner {
    value: MutableState<f32>,
    velocity: f32,
    target: f32,
    lower_bound: f32,
    upper_bound: f32,
    job: Option<CancelToken>,
}

impl AnimatableInner {
    fn clamp(&self, value: f32) -> f32 {
        value.max(self.lower_bound).min(self.upper_bound)
    }

    fn cancel_job(&mut self) {
        if let Some(job) = self.job.take() {
            job.cancel();
        }
    }
}

impl Animatable {
    pub fn new(initial: f32, runtime: RuntimeHandle) -> Self {
        let inner = AnimatableInner {
            value: MutableState::new(initial),
            velocity: 0.0,
            target: initial,
            lower_bound: f32::NEG_INFINITY,
            upper_bound: f32::INFINITY,
            job: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
            runtime,
        }
    }

    pub fn value(&self) -> f32 {
        self.inner.borrow().value.get()
    }

    /// Read-only observable view of the value.
    pub fn state(&self) -> State<f32> {
        self.inner.borrow().value.as_state()
    }

    pub fn velocity(&self) -> f32 {
        self.inner.borrow().velocity
    }

    pub fn target(&self) -> f32 {
        self.inner.borrow().target
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().job.is_some()
    }

    pub fn bounds(&self) -> (f32, f32) {
        let inner = self.inner.borrow();
        (inner.lower_bound, inner.upper_bound)
    }

    /// Sets the bounds the value is kept within. The current value is pulled
    /// inside if it lies outside.
    pub fn update_bounds(&self, lower: f32, upper: f32) {
        let mut inner = self.inner.borrow_mut();
        inner.lower_bound = lower.min(upper);
        inner.upper_bound = upper.max(lower);
        let value = inner.value.get();
        let clamped = inner.clamp(value);
        if clamped != value {
            inner.value.set(clamped);
        }
    }

    /// Cancels any running animation and jumps to `value`.
    pub fn snap_to(&self, value: f32) {
        let mut inner = self.inner.borrow_mut();
        inner.cancel_job();
        let value = if value.is_finite() {
            inner.clamp(value)
        } else {
            inner.value.get()
        };
        inner.value.set(value);
        inner.target = value;
        inner.velocity = 0.0;
    }

    /// Cancels any running animation, leaving the value where it is.
    pub fn stop(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.cancel_job();
        inner.target = inner.value.get();
        inner.velocity = 0.0;
    }

    /// Springs toward `target`, starting with `initial_velocity` units per
    /// second.
    ///
    /// The first frame after the call is the time reference; motion starts
    /// on the frame after it. Completes with [`AnimationEndReason::Finished`]
    /// once the spring rests, with the value set exactly to the (clamped)
    /// target.
    pub async fn animate_to(
        &self,
        target: f32,
        spec: SpringSpec,
        initial_velocity: f32,
    ) -> AnimationResult {
        let token = self.begin(target, initial_velocity);
        let _guard = JobGuard {
            inner: Rc::clone(&self.inner),
            token: token.clone(),
        };

        if self.settle_if_at_rest(&spec) {
            return self.result(AnimationEndReason::Finished);
        }

        let clock = self.runtime.frame_clock();
        let mut last_frame: Option<u64> = None;
        loop {
            let now = clock.next_frame().await;
            if token.is_cancelled() {
                return self.result(AnimationEndReason::Interrupted);
            }
            let Some(previous) = last_frame.replace(now) else {
                continue;
            };
            let dt_secs = now.saturating_sub(previous) as f32 / NANOS_PER_SEC;
            if self.advance(&spec, dt_secs) {
                return self.result(AnimationEndReason::Finished);
            }
        }
    }

    fn begin(&self, target: f32, initial_velocity: f32) -> CancelToken {
        let mut inner = self.inner.borrow_mut();
        inner.cancel_job();
        let target = if target.is_finite() {
            inner.clamp(target)
        } else {
            inner.value.get()
        };
        inner.target = target;
        inner.velocity = if initial_velocity.is_finite() {
            initial_velocity
        } else {
            0.0
        };
        let token = CancelToken::new();
        inner.job = Some(token.clone());
        trace!(
            "animate {} -> {} (v = {})",
            inner.value.get(),
            target,
            inner.velocity
        );
        token
    }

    fn settle_if_at_rest(&self, spec: &SpringSpec) -> bool {
        let mut inner = self.inner.borrow_mut();
        let displacement = inner.value.get() - inner.target;
        if !spec.is_at_rest(displacement, inner.velocity) {
            return false;
        }
        let target = inner.target;
        inner.value.set(target);
        inner.velocity = 0.0;
        inner.job = None;
        true
    }

    /// Steps the spring by `dt_secs`. Returns `true` once it has come to rest.
    fn advance(&self, spec: &SpringSpec, dt_secs: f32) -> bool {
        let mut inner = self.inner.borrow_mut();
        let target = inner.target;
        let motion = spec.step(inner.value.get() - target, inner.velocity, dt_secs);
        let mut next = target + motion.displacement;
        let mut velocity = motion.velocity;

        if next <= inner.lower_bound {
            next = inner.lower_bound;
            velocity = velocity.max(0.0);
        } else if next >= inner.upper_bound {
            next = inner.upper_bound;
            velocity = velocity.min(0.0);
        }

        if spec.is_at_rest(next - target, velocity) {
            inner.value.set(target);
            inner.velocity = 0.0;
            inner.job = None;
            return true;
        }
        inner.value.set(next);
        inner.velocity = velocity;
        false
    }

    fn result(&self, end_reason: AnimationEndReason) -> AnimationResult {
        AnimationResult {
            end_reason,
            end_value: self.value(),
        }
    }
}

/// Clears the job slot when an animation future is dropped before it ends,
/// unless a newer animation already owns the slot.
struct JobGuard {
    inner: Rc<RefCell<AnimatableInner>>,
    token: CancelToken,
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        let owned = inner
            .job
            .as_ref()
            .is_some_and(|job| job.same_token(&self.token));
        if owned {
            inner.job = None;
        }
    }
}

#[cfg(test)]
#[path = "tests/animatable_tests.rs"]
mod tests;
