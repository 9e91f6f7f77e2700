//! Drag loop that turns pointer input into slider motion.
//!
//! Each gesture is a down, any number of horizontal drags and an up. A down
//! stops the slider, drags queue snaps, and the release schedules a delayed
//! settle toward the fling projection.

use crate::config::{SettlePolicy, SliderConfig};
use crate::error::SliderError;
use crate::state::SliderState;
use log::{debug, trace, warn};
use podslider_animation::FloatDecayAnimationSpec;
use podslider_core::TaskHandle;
use podslider_foundation::{
    await_first_down, horizontal_drag, PointerInputChange, PointerInputScope, VelocityTracker,
};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

type SettleTasks = Rc<RefCell<SmallVec<[TaskHandle; 2]>>>;

/// Runs the drag loop for the lifetime of the returned future.
pub async fn slider_drag(scope: PointerInputScope, state: SliderState, config: SliderConfig) {
    drag_loop(scope, state, config, SettleTasks::default()).await;
}

async fn drag_loop(
    scope: PointerInputScope,
    state: SliderState,
    config: SliderConfig,
    settles: SettleTasks,
) {
    let segments = config.segment_count() as f32;
    loop {
        let pointer_id = scope
            .await_pointer_event_scope(|events| async move { await_first_down(&events).await.id })
            .await;

        if config.settle_policy == SettlePolicy::CancelOnNewGesture {
            cancel_settles(&settles);
        }
        state.stop();
        debug!("gesture start, pointer {pointer_id} at {}", state.current_value());

        let mut tracker = VelocityTracker::with_strategy(config.velocity_strategy);
        let drag_state = &state;
        let drag_tracker = &mut tracker;
        let released = scope
            .await_pointer_event_scope(move |events| async move {
                horizontal_drag(&events, pointer_id, |change| {
                    // Measured per change; the widget may be resized mid-gesture.
                    let segment_width = events.size().width / segments;
                    drag_step(drag_state, change, segment_width);
                    drag_tracker.add_position(change.uptime_millis, change.position);
                })
                .await
            })
            .await;

        let measured = match config.max_fling_velocity {
            Some(max) => tracker.calculate_velocity_with_max(max),
            None => tracker.calculate_velocity(),
        };
        let velocity = measured.x / segments;
        let decay = config.decay.spec(scope.density());
        let projected = decay.target_value(state.latest_value(), -velocity);
        debug!(
            "gesture end (released = {released}), velocity {velocity}, projected {projected}"
        );

        schedule_settle(&state, &config, &settles, -velocity, projected);
    }
}

fn drag_step(state: &SliderState, change: &PointerInputChange, segment_width: f32) {
    let usable = segment_width.is_finite() && segment_width > 0.0;
    if !usable {
        warn!("segment width {segment_width} is not positive; drag ignored");
        return;
    }
    let target = state.latest_value() - change.position_change().x / segment_width;
    trace!("drag dx {} -> {target}", change.position_change().x);
    state.enqueue_snap(target);
}

fn schedule_settle(
    state: &SliderState,
    config: &SliderConfig,
    settles: &SettleTasks,
    velocity: f32,
    target_hint: f32,
) {
    let runtime = state.runtime();
    let clock = runtime.frame_clock();
    let delay = config.settle_delay_millis;
    let settle_state = state.clone();
    let task = runtime.spawn_ui(async move {
        clock.delay_millis(delay).await;
        settle_state.decay_to(velocity, target_hint).await;
    });

    let mut settles = settles.borrow_mut();
    settles.retain(|task| task.is_active());
    if let Some(task) = task {
        settles.push(task);
    }
}

fn cancel_settles(settles: &SettleTasks) {
    let pending: SmallVec<[TaskHandle; 2]> = settles.borrow_mut().drain(..).collect();
    for task in pending {
        if task.is_active() {
            debug!("cancel pending settle {}", task.id());
        }
        task.cancel();
    }
}

/// Owns a running drag loop bound to one slider.
///
/// Dropping the controller (or calling [`dispose`](Self::dispose)) cancels
/// the loop, every settle still waiting on its delay, and the slider's
/// motion.
pub struct SliderGestureController {
    scope: PointerInputScope,
    state: SliderState,
    task: Option<TaskHandle>,
    settles: SettleTasks,
}

impl SliderGestureController {
    /// Spawns the drag loop on the slider's runtime.
    pub fn launch(state: SliderState, config: SliderConfig) -> Result<Self, SliderError> {
        let scope = PointerInputScope::new();
        let settles = SettleTasks::default();
        let runtime = state.runtime();
        let task = runtime
            .spawn_ui(drag_loop(
                scope.clone(),
                state.clone(),
                config,
                Rc::clone(&settles),
            ))
            .ok_or(SliderError::RuntimeUnavailable)?;
        runtime.drain_ui();
        Ok(Self {
            scope,
            state,
            task: Some(task),
            settles,
        })
    }

    /// Input side: the host dispatches pointer events and keeps the size
    /// current here.
    pub fn scope(&self) -> &PointerInputScope {
        &self.scope
    }

    pub fn state(&self) -> &SliderState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(TaskHandle::is_active)
    }

    /// Number of settles waiting on their delay or still running.
    pub fn pending_settles(&self) -> usize {
        self.settles
            .borrow()
            .iter()
            .filter(|task| task.is_active())
            .count()
    }

    pub fn dispose(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
            cancel_settles(&self.settles);
            self.state.stop();
        }
    }
}

impl Drop for SliderGestureController {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;
