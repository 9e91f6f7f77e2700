use crate::geometry::Point;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// Raw pointer event as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub position: Point,
    /// Host uptime in milliseconds. Only differences are meaningful.
    pub uptime_millis: i64,
}

impl PointerEvent {
    pub fn new(id: PointerId, kind: PointerEventKind, position: Point, uptime_millis: i64) -> Self {
        Self {
            id,
            kind,
            position,
            uptime_millis,
        }
    }

    pub fn down(id: PointerId, position: Point, uptime_millis: i64) -> Self {
        Self::new(id, PointerEventKind::Down, position, uptime_millis)
    }

    pub fn moved(id: PointerId, position: Point, uptime_millis: i64) -> Self {
        Self::new(id, PointerEventKind::Move, position, uptime_millis)
    }

    pub fn up(id: PointerId, position: Point, uptime_millis: i64) -> Self {
        Self::new(id, PointerEventKind::Up, position, uptime_millis)
    }

    pub fn cancel(id: PointerId, position: Point, uptime_millis: i64) -> Self {
        Self::new(id, PointerEventKind::Cancel, position, uptime_millis)
    }
}

/// A pointer event paired with the previous state of the same pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInputChange {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub position: Point,
    pub uptime_millis: i64,
    pub previous_position: Point,
    pub previous_uptime_millis: i64,
    pub pressed: bool,
    pub previous_pressed: bool,
}

impl PointerInputChange {
    /// Movement since the previous event of this pointer. Zero for a down.
    pub fn position_change(&self) -> Point {
        self.position - self.previous_position
    }

    pub fn changed_to_down(&self) -> bool {
        self.pressed && !self.previous_pressed
    }

    pub fn changed_to_up(&self) -> bool {
        !self.pressed && self.previous_pressed
    }
}
