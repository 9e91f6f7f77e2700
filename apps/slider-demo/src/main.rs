use log::info;
use podslider::layout::major_tick_label;
use podslider::{
    format_speed, visible_ticks, MotionPhase, Point, PointerEvent, Size, SliderConfig,
    SliderGestureController, SliderState, VisibleTicks, MAX_FLING_VELOCITY,
};
use podslider_core::{DefaultScheduler, Runtime, NANOS_PER_MILLI};
use std::sync::Arc;

const WIDTH_PX: f32 = 1_200.0;
const FRAME_MILLIS: u64 = 16;
const COLUMNS: usize = 61;

/// Drives a slider the way a windowing host would: frames, pointer events
/// and a redraw after every change.
struct Host {
    controller: SliderGestureController,
    runtime: Runtime,
    config: SliderConfig,
    now_millis: u64,
}

impl Host {
    fn new(config: SliderConfig) -> Result<Self, podslider::SliderError> {
        let runtime = Runtime::new(Arc::new(DefaultScheduler));
        let state = SliderState::from_config(runtime.handle(), &config);
        let controller = SliderGestureController::launch(state, config)?;
        controller.scope().set_size(Size::new(WIDTH_PX, 48.0));
        Ok(Self {
            controller,
            runtime,
            config,
            now_millis: 0,
        })
    }

    fn state(&self) -> &SliderState {
        self.controller.state()
    }

    fn frame(&mut self) {
        self.now_millis += FRAME_MILLIS;
        self.runtime
            .handle()
            .run_frame(self.now_millis * NANOS_PER_MILLI);
    }

    fn send(&self, event: PointerEvent) {
        self.controller.scope().dispatch(event);
        self.runtime.handle().drain_ui();
    }

    /// Presses at `from`, moves to `to` over `frames` frames and releases.
    fn swipe(&mut self, from: f32, to: f32, frames: u32) {
        let id = self.now_millis;
        self.send(PointerEvent::down(id, Point::new(from, 24.0), self.uptime()));
        let frames = frames.max(1);
        let step = (to - from) / frames as f32;
        for i in 1..=frames {
            self.frame();
            let x = from + step * i as f32;
            self.send(PointerEvent::moved(id, Point::new(x, 24.0), self.uptime()));
        }
        self.send(PointerEvent::up(id, Point::new(to, 24.0), self.uptime()));
        info!("released at {}", self.state().current_value());
    }

    /// Runs frames until the slider rests, redrawing every few frames.
    fn run_until_idle(&mut self, max_millis: u64) {
        let deadline = self.now_millis + max_millis;
        let mut frames = 0u32;
        while self.now_millis < deadline {
            let busy = self.controller.pending_settles() > 0
                || self.state().phase() != MotionPhase::Idle;
            if !busy {
                break;
            }
            self.frame();
            frames += 1;
            if self.state().phase() == MotionPhase::Decaying && frames % 4 == 0 {
                self.draw();
            }
        }
        self.draw();
    }

    fn draw(&self) {
        let value = self.state().current_value();
        let ticks = visible_ticks(value, self.state().range(), self.config.segments, WIDTH_PX);
        let (bars, labels) = render_ruler(&ticks);
        println!("{:>6} ms  {bars}", self.now_millis);
        println!("{:>6}     {labels}", format_speed(self.state().current_tick()));
    }

    fn uptime(&self) -> i64 {
        self.now_millis as i64
    }
}

fn render_ruler(ticks: &VisibleTicks) -> (String, String) {
    let mut bars = vec![' '; COLUMNS];
    let mut labels = vec![' '; COLUMNS];
    let center = COLUMNS / 2;
    let px_per_column = WIDTH_PX / COLUMNS as f32;

    for placement in &ticks.ticks {
        let column = center as f32 + placement.offset_px / px_per_column;
        if column < 0.0 || column >= COLUMNS as f32 {
            continue;
        }
        let column = column.round() as usize;
        if column >= COLUMNS {
            continue;
        }
        bars[column] = if placement.is_major() { '|' } else { '\'' };
        if let Some(label) = major_tick_label(placement.tick) {
            let begin = column.saturating_sub(label.len() / 2);
            for (slot, ch) in labels.iter_mut().skip(begin).zip(label.chars()) {
                *slot = ch;
            }
        }
    }
    bars[center] = 'v';
    (bars.into_iter().collect(), labels.into_iter().collect())
}

fn main() -> Result<(), podslider::SliderError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = SliderConfig::default()
        .with_settle_delay_millis(600)
        .with_max_fling_velocity(Some(MAX_FLING_VELOCITY));
    let mut host = Host::new(config)?;
    host.draw();

    info!("slow drag toward faster speeds");
    host.swipe(900.0, 300.0, 40);
    host.run_until_idle(5_000);

    info!("quick fling back");
    host.swipe(300.0, 700.0, 4);
    host.run_until_idle(5_000);

    let saved = host.state().save();
    info!("saved {saved:?}");
    let restored = SliderState::restore(host.runtime.handle(), saved)?;
    info!(
        "restored at {} ({})",
        restored.current_value(),
        format_speed(restored.current_tick())
    );
    Ok(())
}
