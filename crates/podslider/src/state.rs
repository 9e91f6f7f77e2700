use crate::config::SliderConfig;
use crate::error::SliderError;
use crate::range::TickRange;
use log::{debug, trace};
use podslider_animation::{Animatable, AnimationEndReason, AnimationResult, SpringSpec};
use podslider_core::{CancelToken, RuntimeHandle, State};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Which motion source currently drives the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionPhase {
    #[default]
    Idle,
    /// A drag snap has been queued and not applied yet.
    Snapping,
    /// A settle spring is running.
    Decaying,
}

/// Persisted form of a slider: the value and its range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedSliderState {
    pub value: f32,
    pub range_low: i32,
    pub range_high: i32,
}

impl From<(f32, i32, i32)> for SavedSliderState {
    fn from((value, range_low, range_high): (f32, i32, i32)) -> Self {
        Self {
            value,
            range_low,
            range_high,
        }
    }
}

impl From<SavedSliderState> for (f32, i32, i32) {
    fn from(saved: SavedSliderState) -> Self {
        (saved.value, saved.range_low, saved.range_high)
    }
}

/// Motion state of one slider.
///
/// Holds the live value, the immutable tick range and the motion that is
/// currently driving the value. Every motion operation cancels whatever was
/// running before applying its own effect. Clones share the same state.
#[derive(Clone)]
pub struct SliderState {
    inner: Rc<SliderStateInner>,
}

struct SliderStateInner {
    runtime: RuntimeHandle,
    range: TickRange,
    animatable: Animatable,
    spring: Cell<SpringSpec>,
    phase: Cell<MotionPhase>,
    pending_snap: Cell<Option<f32>>,
    apply_scheduled: Cell<bool>,
    // Token of the settle spring currently owning the phase.
    active_decay: RefCell<Option<CancelToken>>,
}

impl SliderStateInner {
    fn cancel_motion(&self) {
        if let Some(token) = self.active_decay.borrow_mut().take() {
            token.cancel();
        }
        self.pending_snap.set(None);
        self.phase.set(MotionPhase::Idle);
    }
}

impl SliderState {
    /// Creates a slider at `initial` (clamped into `range`).
    pub fn new(runtime: RuntimeHandle, initial: f32, range: TickRange) -> Self {
        let value = range.clamp_value(initial);
        let animatable = Animatable::new(value, runtime.clone());
        animatable.update_bounds(range.low() as f32, range.high() as f32);
        Self {
            inner: Rc::new(SliderStateInner {
                runtime,
                range,
                animatable,
                spring: Cell::new(SpringSpec::low_bouncy()),
                phase: Cell::new(MotionPhase::Idle),
                pending_snap: Cell::new(None),
                apply_scheduled: Cell::new(false),
                active_decay: RefCell::new(None),
            }),
        }
    }

    pub fn from_config(runtime: RuntimeHandle, config: &SliderConfig) -> Self {
        let state = Self::new(runtime, config.initial_value, config.range);
        state.set_spring(config.spring);
        state
    }

    /// Recreates a slider from a saved triple without replaying any motion.
    pub fn restore(runtime: RuntimeHandle, saved: SavedSliderState) -> Result<Self, SliderError> {
        let range = TickRange::new(saved.range_low, saved.range_high)?;
        if !saved.value.is_finite() {
            return Err(SliderError::NonFiniteValue { value: saved.value });
        }
        if !range.contains(saved.value) {
            return Err(SliderError::ValueOutOfRange {
                value: saved.value,
                low: range.low(),
                high: range.high(),
            });
        }
        Ok(Self::new(runtime, saved.value, range))
    }

    pub fn save(&self) -> SavedSliderState {
        SavedSliderState {
            value: self.current_value(),
            range_low: self.inner.range.low(),
            range_high: self.inner.range.high(),
        }
    }

    pub fn runtime(&self) -> RuntimeHandle {
        self.inner.runtime.clone()
    }

    pub fn current_value(&self) -> f32 {
        self.inner.animatable.value()
    }

    /// Nearest tick to the current value, as shown by the value indicator.
    pub fn current_tick(&self) -> i32 {
        self.inner.range.clamp_tick(self.current_value().round() as i32)
    }

    /// Observable view of the value for a presentation layer.
    pub fn value_state(&self) -> State<f32> {
        self.inner.animatable.state()
    }

    pub fn range(&self) -> TickRange {
        self.inner.range
    }

    pub fn phase(&self) -> MotionPhase {
        self.inner.phase.get()
    }

    pub fn spring(&self) -> SpringSpec {
        self.inner.spring.get()
    }

    pub fn set_spring(&self, spring: SpringSpec) {
        self.inner.spring.set(spring);
    }

    /// The value the slider is heading to with queued snaps applied.
    pub fn latest_value(&self) -> f32 {
        self.inner
            .pending_snap
            .get()
            .unwrap_or_else(|| self.current_value())
    }

    /// Cancels any motion and jumps to `value`, clamped into the range.
    pub fn snap_to(&self, value: f32) {
        self.inner.cancel_motion();
        self.inner.animatable.snap_to(self.inner.range.clamp_value(value));
    }

    /// Queues a snap to `value` without applying it.
    ///
    /// Only the latest queued value is kept. A single apply step runs on the
    /// next runtime drain, so snaps land in the order they were queued.
    pub fn enqueue_snap(&self, value: f32) {
        let value = self.inner.range.clamp_value(value);
        trace!("queue snap to {value}");
        self.inner.pending_snap.set(Some(value));
        self.inner.phase.set(MotionPhase::Snapping);
        if self.inner.apply_scheduled.replace(true) {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        self.inner.runtime.enqueue_ui_task(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                SliderState { inner }.apply_pending_snap();
            }
        }));
    }

    /// Applies the queued snap, if any. Returns whether a snap was applied.
    pub fn apply_pending_snap(&self) -> bool {
        self.inner.apply_scheduled.set(false);
        match self.inner.pending_snap.get() {
            Some(value) => {
                self.snap_to(value);
                true
            }
            None => false,
        }
    }

    /// Cancels any motion and springs to the tick nearest `target_hint`.
    ///
    /// The target is rounded half away from zero and clamped into the range;
    /// a non-finite hint falls back to the current value. Completes when the
    /// spring rests or another motion operation takes over.
    pub async fn decay_to(&self, velocity: f32, target_hint: f32) -> AnimationResult {
        self.inner.cancel_motion();
        let target = self.settle_target(target_hint);
        let token = CancelToken::new();
        *self.inner.active_decay.borrow_mut() = Some(token.clone());
        self.inner.phase.set(MotionPhase::Decaying);
        debug!(
            "settle from {} to {target} (v = {velocity})",
            self.current_value()
        );

        let _guard = DecayGuard {
            inner: Rc::clone(&self.inner),
            token,
        };
        let result = self
            .inner
            .animatable
            .animate_to(target, self.spring(), velocity)
            .await;
        if result.end_reason == AnimationEndReason::Finished {
            debug!("settled at {}", result.end_value);
        }
        result
    }

    /// Cancels any motion, leaving the value where it is.
    pub fn stop(&self) {
        self.inner.cancel_motion();
        self.inner.animatable.stop();
    }

    fn settle_target(&self, hint: f32) -> f32 {
        let hint = if hint.is_finite() {
            hint
        } else {
            self.current_value()
        };
        // `as` saturates, so huge hints land on the range ends.
        let tick = self.inner.range.clamp_tick(hint.round() as i32);
        tick as f32
    }
}

/// Returns the phase to idle when a settle ends or its future is dropped,
/// unless another motion took over in the meantime.
struct DecayGuard {
    inner: Rc<SliderStateInner>,
    token: CancelToken,
}

impl Drop for DecayGuard {
    fn drop(&mut self) {
        if self.token.is_active() {
            self.token.cancel();
            self.inner.active_decay.borrow_mut().take();
            self.inner.phase.set(MotionPhase::Idle);
        }
    }
}

impl std::fmt::Debug for SliderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliderState")
            .field("value", &self.current_value())
            .field("range", &self.inner.range)
            .field("phase", &self.phase())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
