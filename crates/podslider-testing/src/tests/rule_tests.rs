use super::*;

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, Once};

struct CapturingLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("podslider_testing")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut lines) = self.lines.lock() {
                lines.push((record.level(), record.args().to_string()));
            }
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    lines: Mutex::new(Vec::new()),
};
static INIT: Once = Once::new();

fn captured() -> &'static CapturingLogger {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger installed");
        log::set_max_level(LevelFilter::Trace);
    });
    &LOGGER
}

fn logged(logger: &CapturingLogger, level: Level, needle: &str) -> bool {
    logger
        .lines
        .lock()
        .expect("logger lock")
        .iter()
        .any(|(at, line)| *at == level && line.contains(needle))
}

#[test]
fn gestures_and_frames_are_logged() {
    let logger = captured();
    let mut rule = SliderTestRule::new(SliderConfig::default());

    rule.press(600.0);
    rule.move_by(-100.0);
    rule.release();

    assert!(logged(logger, Level::Debug, "press pointer 1 at x=600"));
    assert!(logged(logger, Level::Trace, "frame t=16ms"));
    assert!(logged(logger, Level::Debug, "release pointer 1 at x=500 t=16ms value=11"));
}

#[test]
fn frames_advance_pointer_uptime_together() {
    let mut rule = SliderTestRule::new(SliderConfig::default());

    rule.press(600.0);
    rule.drag_by(-300.0, 3);

    assert_eq!(rule.now_millis(), 3 * FRAME_MILLIS);
    assert_eq!(rule.value(), 13.0);

    rule.cancel();
    assert_eq!(rule.controller().pending_settles(), 1);
}
