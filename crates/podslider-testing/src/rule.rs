use log::{debug, trace};
use podslider::{
    MotionPhase, Point, PointerEvent, PointerId, Size, SliderConfig, SliderGestureController,
    SliderState,
};
use podslider_core::{DefaultScheduler, Runtime, RuntimeHandle, NANOS_PER_MILLI};
use std::sync::Arc;

/// Frame interval the rule advances by.
pub const FRAME_MILLIS: u64 = 16;

const DEFAULT_WIDTH: f32 = 1_200.0;
const DEFAULT_HEIGHT: f32 = 48.0;
const POINTER_Y: f32 = DEFAULT_HEIGHT / 2.0;

/// Headless harness for driving a slider with pointer input and frames.
///
/// The rule owns a runtime, a slider and its gesture controller. Frame time
/// and pointer uptime advance together in [`FRAME_MILLIS`] steps, so tests
/// can talk about "500 ms later" and get the same answer every run.
pub struct SliderTestRule {
    // Dropped before the runtime so disposal still reaches live tasks.
    controller: SliderGestureController,
    runtime: Runtime,
    now_millis: u64,
    pointer: Option<(PointerId, Point)>,
    next_pointer_id: PointerId,
}

impl SliderTestRule {
    /// Slider 1200 px wide with the given configuration.
    pub fn new(config: SliderConfig) -> Self {
        let runtime = Runtime::new(Arc::new(DefaultScheduler));
        let state = SliderState::from_config(runtime.handle(), &config);
        let controller =
            SliderGestureController::launch(state, config).expect("runtime is alive");
        controller
            .scope()
            .set_size(Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT));
        let rule = Self {
            controller,
            runtime,
            now_millis: 0,
            pointer: None,
            next_pointer_id: 1,
        };
        rule.pump_until_idle();
        rule
    }

    pub fn with_width(self, width: f32) -> Self {
        self.set_width(width);
        self
    }

    pub fn set_width(&self, width: f32) {
        self.controller
            .scope()
            .set_size(Size::new(width, DEFAULT_HEIGHT));
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn state(&self) -> &SliderState {
        self.controller.state()
    }

    pub fn controller(&self) -> &SliderGestureController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SliderGestureController {
        &mut self.controller
    }

    pub fn value(&self) -> f32 {
        self.state().current_value()
    }

    pub fn phase(&self) -> MotionPhase {
        self.state().phase()
    }

    /// Frame time of the most recent frame, in milliseconds.
    pub fn now_millis(&self) -> u64 {
        self.now_millis
    }

    pub fn press(&mut self, x: f32) {
        let id = self.next_pointer_id;
        self.next_pointer_id += 1;
        let position = Point::new(x, POINTER_Y);
        self.pointer = Some((id, position));
        debug!("press pointer {id} at x={x} t={}ms", self.now_millis);
        self.dispatch(PointerEvent::down(id, position, self.uptime()));
    }

    /// Advances one frame, then moves the pressed pointer to `x`.
    pub fn move_to(&mut self, x: f32) {
        let Some((id, _)) = self.pointer else {
            panic!("move_to without a pressed pointer");
        };
        self.advance_frame();
        let position = Point::new(x, POINTER_Y);
        self.pointer = Some((id, position));
        self.dispatch(PointerEvent::moved(id, position, self.uptime()));
    }

    pub fn move_by(&mut self, dx: f32) {
        let x = self.pointer_x() + dx;
        self.move_to(x);
    }

    /// Moves the pointer by `dx` in `steps` equal moves, one per frame.
    pub fn drag_by(&mut self, dx: f32, steps: u32) {
        let steps = steps.max(1);
        let step = dx / steps as f32;
        for _ in 0..steps {
            self.move_by(step);
        }
    }

    /// Lifts the pressed pointer where it is, without advancing time.
    pub fn release(&mut self) {
        let Some((id, position)) = self.pointer.take() else {
            panic!("release without a pressed pointer");
        };
        debug!(
            "release pointer {id} at x={} t={}ms value={}",
            position.x,
            self.now_millis,
            self.value()
        );
        self.dispatch(PointerEvent::up(id, position, self.uptime()));
    }

    pub fn cancel(&mut self) {
        let Some((id, position)) = self.pointer.take() else {
            panic!("cancel without a pressed pointer");
        };
        debug!("cancel pointer {id} t={}ms", self.now_millis);
        self.dispatch(PointerEvent::cancel(id, position, self.uptime()));
    }

    pub fn advance_frame(&mut self) {
        self.now_millis += FRAME_MILLIS;
        self.runtime
            .handle()
            .run_frame(self.now_millis * NANOS_PER_MILLI);
        trace!(
            "frame t={}ms value={} phase={:?}",
            self.now_millis,
            self.value(),
            self.phase()
        );
    }

    /// Advances whole frames until at least `millis` have passed.
    pub fn advance_millis(&mut self, millis: u64) {
        let deadline = self.now_millis + millis;
        while self.now_millis < deadline {
            self.advance_frame();
        }
    }

    /// Advances frames until `done` holds or `max_millis` elapse. Returns
    /// whether `done` was reached.
    pub fn advance_until(&mut self, max_millis: u64, done: impl Fn(&Self) -> bool) -> bool {
        let deadline = self.now_millis + max_millis;
        while !done(self) {
            if self.now_millis >= deadline {
                return false;
            }
            self.advance_frame();
        }
        true
    }

    /// Advances frames until the slider is idle and nothing waits on a
    /// settle, or `max_millis` elapse.
    pub fn advance_until_settled(&mut self, max_millis: u64) -> bool {
        self.advance_until(max_millis, |rule| {
            rule.phase() == MotionPhase::Idle && rule.controller.pending_settles() == 0
        })
    }

    pub fn pump_until_idle(&self) {
        self.runtime.handle().drain_ui();
    }

    fn dispatch(&self, event: PointerEvent) {
        self.controller.scope().dispatch(event);
        self.pump_until_idle();
    }

    fn pointer_x(&self) -> f32 {
        self.pointer.map(|(_, position)| position.x).unwrap_or(0.0)
    }

    fn uptime(&self) -> i64 {
        self.now_millis as i64
    }
}

#[cfg(test)]
#[path = "tests/rule_tests.rs"]
mod tests;
